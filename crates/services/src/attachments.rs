//! # Attachment Handler
//!
//! Validates selected files, keeps the pending batch for the next post and
//! turns staged files into inline [`Attachment`] records.

use base64::Engine;
use domains::{
    Attachment, DomainError, MediaStore, RejectionReason, Result, SelectedFile,
    MAX_ATTACHMENT_BYTES,
};
use futures_util::future::join_all;
use tracing::{debug, warn};

const MIB: u64 = 1024 * 1024;

/// A file as it arrives from the submission surface, before validation.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    /// MIME type declared by the client, if any.
    pub content_type: Option<String>,
    /// Full size of the upload. For oversized uploads `data` may hold only
    /// a prefix.
    pub size_bytes: u64,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
pub struct AttachmentHandler {
    max_bytes: u64,
}

impl Default for AttachmentHandler {
    fn default() -> Self {
        Self::new(MAX_ATTACHMENT_BYTES)
    }
}

impl AttachmentHandler {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// The declared type, or a guess from the file name when the client
    /// sent nothing useful.
    pub fn resolve_mime(name: &str, declared: Option<&str>) -> String {
        match declared.map(str::trim) {
            Some(t) if !t.is_empty() && t != mime::APPLICATION_OCTET_STREAM.as_ref() => {
                t.to_string()
            }
            _ => mime_guess::from_path(name)
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
        }
    }

    /// Accepts JPEG, PNG and GIF images and any video up to the size
    /// ceiling.
    pub fn validate(
        &self,
        name: &str,
        mime_type: &str,
        size_bytes: u64,
    ) -> std::result::Result<(), RejectionReason> {
        if size_bytes > self.max_bytes {
            return Err(RejectionReason::TooLarge {
                name: name.to_string(),
                size: size_bytes,
                limit_mib: self.max_bytes / MIB,
            });
        }

        let Ok(parsed) = mime_type.parse::<mime::Mime>() else {
            return Err(RejectionReason::UnsupportedType(mime_type.to_string()));
        };

        if parsed.type_() == mime::IMAGE {
            let exact = parsed.suffix().is_none() && parsed.params().next().is_none();
            let subtype = parsed.subtype();
            if exact && (subtype == mime::JPEG || subtype == mime::PNG || subtype == mime::GIF) {
                Ok(())
            } else {
                Err(RejectionReason::UnsupportedImage(mime_type.to_string()))
            }
        } else if parsed.type_() == mime::VIDEO {
            Ok(())
        } else {
            Err(RejectionReason::UnsupportedType(mime_type.to_string()))
        }
    }

    /// Reads a staged file back and embeds it as a base64 data URL.
    pub async fn encode(&self, media: &dyn MediaStore, file: &SelectedFile) -> Result<Attachment> {
        let bytes = media
            .load_upload(&file.media_id)
            .await
            .map_err(|e| DomainError::AttachmentUnreadable {
                name: file.name.clone(),
                reason: e.to_string(),
            })?;
        let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(Attachment {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size_bytes: file.size_bytes,
            inline_data: format!("data:{};base64,{}", file.mime_type, payload),
        })
    }

    /// Encodes every file and waits for all of them. Failures are
    /// reported per file and left out; the order of the rest is kept.
    pub async fn encode_all(&self, media: &dyn MediaStore, files: &[SelectedFile]) -> EncodedBatch {
        let results = join_all(files.iter().map(|f| self.encode(media, f))).await;

        let mut batch = EncodedBatch::default();
        for result in results {
            match result {
                Ok(attachment) => batch.attachments.push(attachment),
                Err(e) => {
                    warn!(error = %e, "Attachment dropped from post");
                    batch.failures.push(e);
                }
            }
        }
        batch
    }
}

#[derive(Debug, Default)]
pub struct EncodedBatch {
    pub attachments: Vec<Attachment>,
    pub failures: Vec<DomainError>,
}

/// Files selected for the next post, in selection order.
#[derive(Debug, Default)]
pub struct AttachmentBatch {
    files: Vec<SelectedFile>,
}

impl AttachmentBatch {
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    /// Adds a file unless one with the same name is already selected.
    /// Returns whether the file was added.
    pub fn push(&mut self, file: SelectedFile) -> bool {
        if self.contains(&file.name) {
            debug!(name = %file.name, "File already selected");
            return false;
        }
        self.files.push(file);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<SelectedFile> {
        let index = self.files.iter().position(|f| f.name == name)?;
        Some(self.files.remove(index))
    }

    /// Drains the batch for submission.
    pub fn take(&mut self) -> Vec<SelectedFile> {
        std::mem::take(&mut self.files)
    }
}
