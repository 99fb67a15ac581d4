//! The notification history panel.

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use ui::HistoryView;

use super::render;
use crate::error::ApiError;
use crate::router::AppState;

const HISTORY_PATH: &str = "/history";

#[derive(Debug, Default, Deserialize)]
pub struct ReturnTo {
    /// Only `/history` is honoured; anything else goes to the wall.
    #[serde(default)]
    pub back: String,
}

impl ReturnTo {
    fn target(&self) -> &'static str {
        if self.back == HISTORY_PATH {
            HISTORY_PATH
        } else {
            "/"
        }
    }
}

/// Renders the log as it was, then marks every entry read.
pub async fn show_history(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut wall = state.wall.lock().await;
    let entries = wall.open_history();
    render(&HistoryView::project(&entries))
}

pub async fn read_all(State(state): State<AppState>, Form(form): Form<ReturnTo>) -> Redirect {
    state.wall.lock().await.mark_history_read();
    Redirect::to(form.target())
}

pub async fn clear(State(state): State<AppState>) -> Redirect {
    state.wall.lock().await.clear_history();
    Redirect::to(HISTORY_PATH)
}
