//! # api-adapters
//!
//! The HTTP surface of the confession wall: an axum router that turns
//! form posts and page loads into [`services::Wall`] actions and renders
//! the `ui` views.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
mod router;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use router::{build_router, AppState};
