//! # ui
//!
//! Pure projections from wall state to view models, and the askama
//! templates that render them. Every interpolated value is HTML-escaped.

pub mod admin;
pub mod format;
pub mod history;
pub mod wall;

pub use admin::{AdminRow, AdminView, DetailView, LoginView};
pub use askama::Template;
pub use format::{format_file_size, format_kib};
pub use history::{HistoryItem, HistoryView};
pub use wall::{CardView, GalleryView, WallView};
