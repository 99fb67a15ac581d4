//! Directory-backed [`KeyValueStore`]: one file per key.
//!
//! Writes go to a temporary sibling first and are renamed into place, so
//! a reader sees either the old blob or the new one, never a torn write.
//! An optional quota caps the total size of all blobs, the way a browser
//! caps one origin's storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use domains::{DomainError, KeyValueStore, Result};
use tracing::{debug, info};

pub struct FileKeyValueStore {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileKeyValueStore {
    /// Opens (and creates if needed) the store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            DomainError::Storage(format!(
                "failed to create store directory '{}': {}",
                root.display(),
                e
            ))
        })?;
        info!(path = %root.display(), "Key-value store opened");
        Ok(Self {
            root,
            quota_bytes: None,
        })
    }

    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::Storage(format!("invalid store key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Bytes held by every blob except `skip`, which is about to be replaced.
    fn used_bytes_except(&self, skip: &Path) -> Result<u64> {
        let mut used = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path == skip || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            used += entry.metadata()?.len();
        }
        Ok(used)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Storage(format!("failed to read '{key}': {e}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(quota) = self.quota_bytes {
            let used = self.used_bytes_except(&path)?;
            if used + value.len() as u64 > quota {
                return Err(DomainError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                DomainError::Storage(format!("failed to write '{key}': {e}"))
            })?;
        debug!(key, bytes = value.len(), "Blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!("failed to remove '{key}': {e}"))),
        }
    }
}
