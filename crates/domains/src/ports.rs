//! # Ports
//!
//! Any adapter must implement these traits to be wired into the binary.

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::errors::Result;

/// Whole-blob key-value persistence, the wall's only durability layer.
///
/// Every `set` overwrites the complete value for the key.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Staging area for uploaded files between selection and submission.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns a media id for the staged file.
    async fn save_upload(&self, data: Vec<u8>, content_type: &str) -> Result<String>;
    /// Reads a staged file back.
    async fn load_upload(&self, media_id: &str) -> Result<Vec<u8>>;
    /// Drops a staged file. Unknown ids are ignored.
    async fn discard_upload(&self, media_id: &str) -> Result<()>;
    /// Renders a small PNG preview of a staged image as a data URL.
    async fn thumbnail(&self, media_id: &str) -> Result<String>;
}

/// Admin credential check.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AuthProvider: Send + Sync {
    fn verify_admin_password(&self, password: &str) -> bool;
}

/// Source of "now" for ids, timestamps and session expiry.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
