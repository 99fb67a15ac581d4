//! Local filesystem implementation of `MediaStore`.
//!
//! Staged files are content-addressed: the media id is the SHA-256 of the
//! bytes and the file lives at a sharded path (`ab/cd/abcd...`). Selecting
//! the same bytes twice shares one file, so each id carries a count of the
//! staged files using it and the file is removed when the last one goes.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use domains::{DomainError, MediaStore, Result};
use image::{ImageFormat, ImageReader};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};

/// Thumbnail bounding box, in pixels.
const THUMBNAIL_EDGE: u32 = 250;

pub struct LocalMediaStore {
    /// Root directory for staged uploads (e.g. "./data/uploads").
    root_path: PathBuf,
    refs: Mutex<HashMap<String, usize>>,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root.into(),
            refs: Mutex::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// "ab/cd/abcd..." under the root. Ids that are not a SHA-256 hex
    /// digest never map to a path.
    fn sharded_path(&self, media_id: &str) -> Result<PathBuf> {
        let valid = media_id.len() == 64 && media_id.bytes().all(|b| b.is_ascii_hexdigit());
        if !valid {
            return Err(DomainError::NotFound("upload", media_id.to_string()));
        }
        let mut path = self.root_path.clone();
        path.push(&media_id[0..2]);
        path.push(&media_id[2..4]);
        path.push(media_id);
        Ok(path)
    }

    fn acquire(&self, media_id: &str) -> Result<()> {
        let mut refs = self.lock_refs()?;
        *refs.entry(media_id.to_string()).or_insert(0) += 1;
        Ok(())
    }

    /// Drops one reference and reports whether it was the last.
    fn release(&self, media_id: &str) -> Result<bool> {
        let mut refs = self.lock_refs()?;
        match refs.get_mut(media_id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                Ok(false)
            }
            Some(_) => {
                refs.remove(media_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn lock_refs(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, usize>>> {
        self.refs
            .lock()
            .map_err(|_| DomainError::Storage("upload index lock poisoned".into()))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save_upload(&self, data: Vec<u8>, content_type: &str) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let media_id = format!("{:x}", hasher.finalize());

        let target = self.sharded_path(&media_id)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&target).await? {
            fs::write(&target, &data).await?;
        }
        self.acquire(&media_id)?;

        debug!(%media_id, content_type, bytes = data.len(), "Upload staged");
        Ok(media_id)
    }

    async fn load_upload(&self, media_id: &str) -> Result<Vec<u8>> {
        let path = self.sharded_path(media_id)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DomainError::NotFound("upload", media_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn discard_upload(&self, media_id: &str) -> Result<()> {
        let Ok(path) = self.sharded_path(media_id) else {
            return Ok(());
        };
        if !self.release(media_id)? {
            return Ok(());
        }
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(%media_id, "Upload discarded");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(%media_id, error = %e, "Failed to remove staged upload");
                Err(e.into())
            }
        }
    }

    async fn thumbnail(&self, media_id: &str) -> Result<String> {
        let data = self.load_upload(media_id).await?;
        let png = tokio::task::spawn_blocking(move || render_thumbnail(data))
            .await
            .map_err(|e| DomainError::Storage(format!("thumbnail task failed: {e}")))??;

        let encoded = base64::engine::general_purpose::STANDARD.encode(png);
        Ok(format!("data:image/png;base64,{encoded}"))
    }
}

/// Decodes any supported image and re-encodes it as a PNG no larger than
/// the thumbnail box.
fn render_thumbnail(data: Vec<u8>) -> Result<Vec<u8>> {
    let unreadable = |e: &dyn std::fmt::Display| DomainError::Storage(format!("cannot preview image: {e}"));

    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()
        .map_err(|e| unreadable(&e))?;

    let thumb = img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE);
    let mut out = Cursor::new(Vec::new());
    thumb
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| unreadable(&e))?;
    Ok(out.into_inner())
}
