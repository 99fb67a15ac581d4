//! # DomainError
//!
//! Centralized error handling for the confession wall.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// Why a selected file was refused. Rejections are per-file and never
/// abort the rest of a selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("file \"{name}\" exceeds the {limit_mib}MB limit")]
    TooLarge {
        name: String,
        size: u64,
        limit_mib: u64,
    },

    #[error("unsupported image format: {0}")]
    UnsupportedImage(String),

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
}

/// The primary error type for all domain and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource not found (e.g. a post id that was deleted)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// A required form field was left blank
    #[error("please fill in the {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    AttachmentRejected(#[from] RejectionReason),

    /// Reading a staged file back failed while building the post
    #[error("failed to process file \"{name}\": {reason}")]
    AttachmentUnreadable { name: String, reason: String },

    /// The key-value store refused the write because it is full
    #[error("storage quota exceeded while writing \"{key}\"")]
    QuotaExceeded { key: String },

    /// Infrastructure failure in a store or spool
    #[error("storage error: {0}")]
    Storage(String),

    /// A persisted blob could not be parsed
    #[error("stored data under \"{key}\" is malformed: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Admin session missing, expired, or bad credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    /// Failures of the persistence layer, whose in-memory effect is kept.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            DomainError::QuotaExceeded { .. } | DomainError::Storage(_) | DomainError::Serialization(_)
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// A specialized Result type for confession wall logic.
pub type Result<T> = std::result::Result<T, DomainError>;
