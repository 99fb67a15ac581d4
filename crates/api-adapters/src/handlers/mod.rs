//! Request handlers, one module per page area.
//!
//! Every handler takes the wall lock once, performs its action, and either
//! renders a page from the resulting state or redirects (303) to one.

pub mod admin;
pub mod history;
pub mod uploads;
pub mod wall;

use axum::response::Html;
use ui::Template;

use crate::error::ApiError;

pub(crate) fn render<T: Template>(view: &T) -> Result<Html<String>, ApiError> {
    Ok(Html(view.render()?))
}
