//! # services
//!
//! The confession wall's application logic: the post repository, the
//! attachment handler, the notification history, the admin session guard
//! and the [`Wall`] that ties them together. Everything here talks to the
//! outside world only through the ports in `domains`.

pub mod attachments;
pub mod history;
pub mod persistence;
pub mod posts;
pub mod sample;
pub mod session;
pub mod wall;

#[cfg(test)]
mod test_support;

pub use attachments::{AttachmentBatch, AttachmentHandler, EncodedBatch, IncomingFile};
pub use history::HistoryLog;
pub use persistence::{keys, Mutation, PersistentStore};
pub use posts::{export_file_name, PostRepository};
pub use session::AdminSession;
pub use wall::{ExportedFile, StageOutcome, Wall, WallSettings};
