//! # Wall
//!
//! Maps user actions onto the repository, the attachment batch, the
//! history log and the admin session. One `Wall` is built at startup and
//! handed to the surface layer; every user-visible outcome is recorded in
//! the history log.

use std::sync::Arc;

use domains::{
    AuthProvider, Clock, DomainError, HistoryEntry, HistoryKind, KeyValueStore, MediaKind,
    MediaStore, Post, PostDraft, PostId, Result, SelectedFile, HISTORY_CAPACITY,
    MAX_ATTACHMENT_BYTES, SESSION_TTL_MINUTES,
};
use tracing::{info, warn};

use crate::attachments::{AttachmentBatch, AttachmentHandler, IncomingFile};
use crate::history::HistoryLog;
use crate::persistence::{Mutation, PersistentStore};
use crate::posts::{export_file_name_for, PostRepository};
use crate::session::AdminSession;

#[derive(Debug, Clone, Copy)]
pub struct WallSettings {
    pub max_attachment_bytes: u64,
    pub history_capacity: usize,
    pub session_ttl_minutes: i64,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
            history_capacity: HISTORY_CAPACITY,
            session_ttl_minutes: SESSION_TTL_MINUTES,
        }
    }
}

/// What happened to a file handed to [`Wall::stage_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Added,
    /// A file with the same name is already selected; the new one is ignored.
    Duplicate,
}

/// A rendered export ready for download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub body: String,
}

pub struct Wall {
    posts: PostRepository,
    history: HistoryLog,
    batch: AttachmentBatch,
    attachments: AttachmentHandler,
    session: AdminSession,
    clock: Arc<dyn Clock>,
}

impl Wall {
    /// Reads posts and history from `kv` once and wires the components.
    pub fn open(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, settings: WallSettings) -> Self {
        let store = PersistentStore::new(kv);
        let posts = PostRepository::load(store.clone(), clock.clone());
        let history = HistoryLog::load(store.clone(), clock.clone(), settings.history_capacity);
        let session = AdminSession::new(store, clock.clone(), settings.session_ttl_minutes);
        info!(
            posts = posts.len(),
            history = history.len(),
            "Confession wall opened"
        );
        Self {
            posts,
            history,
            batch: AttachmentBatch::default(),
            attachments: AttachmentHandler::new(settings.max_attachment_bytes),
            session,
            clock,
        }
    }

    pub fn posts(&self) -> &PostRepository {
        &self.posts
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn batch(&self) -> &AttachmentBatch {
        &self.batch
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub fn max_attachment_bytes(&self) -> u64 {
        self.attachments.max_bytes()
    }

    pub fn notify(&mut self, kind: HistoryKind, content: impl Into<String>) {
        self.history.record(kind, content);
    }

    // ── Submission surface ──────────────────────────────────────────────────

    /// Validates one selected file and stages it for the next post.
    ///
    /// Rejections are recorded as error notifications and leave the batch
    /// untouched.
    pub async fn stage_file(
        &mut self,
        media: &dyn MediaStore,
        file: IncomingFile,
    ) -> Result<StageOutcome> {
        let mime_type = AttachmentHandler::resolve_mime(&file.name, file.content_type.as_deref());
        if let Err(reason) = self
            .attachments
            .validate(&file.name, &mime_type, file.size_bytes)
        {
            warn!(name = %file.name, %reason, "File rejected");
            self.notify(HistoryKind::Error, reason.to_string());
            return Err(reason.into());
        }
        if self.batch.contains(&file.name) {
            return Ok(StageOutcome::Duplicate);
        }

        let media_id = match media.save_upload(file.data, &mime_type).await {
            Ok(id) => id,
            Err(e) => {
                let err = DomainError::AttachmentUnreadable {
                    name: file.name.clone(),
                    reason: e.to_string(),
                };
                self.notify(HistoryKind::Error, err.to_string());
                return Err(err);
            }
        };

        let thumbnail = match MediaKind::of(&mime_type) {
            Some(MediaKind::Image) => match media.thumbnail(&media_id).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(name = %file.name, error = %e, "No preview for image");
                    None
                }
            },
            _ => None,
        };

        self.batch.push(SelectedFile {
            name: file.name,
            mime_type,
            size_bytes: file.size_bytes,
            media_id,
            thumbnail,
        });
        Ok(StageOutcome::Added)
    }

    /// Removes a staged file before submission.
    pub async fn unstage_file(&mut self, media: &dyn MediaStore, name: &str) -> bool {
        let Some(file) = self.batch.remove(name) else {
            return false;
        };
        if let Err(e) = media.discard_upload(&file.media_id).await {
            warn!(name, error = %e, "Failed to discard staged file");
        }
        true
    }

    /// Drops the whole selection.
    pub async fn clear_selection(&mut self, media: &dyn MediaStore) -> usize {
        let files = self.batch.take();
        self.discard_all(media, &files).await;
        files.len()
    }

    /// Creates a post from `draft` and everything staged.
    ///
    /// A draft without recipient or content is refused before any file is
    /// touched, and the staged files stay selected. Files that cannot be
    /// read back are reported and left out. A failed write-through keeps
    /// the post on the wall and records an error.
    pub async fn submit(&mut self, media: &dyn MediaStore, draft: PostDraft) -> Result<Post> {
        let draft = draft.normalize()?;

        let files = self.batch.take();
        let encoded = self.attachments.encode_all(media, &files).await;
        for failure in &encoded.failures {
            self.notify(HistoryKind::Error, failure.to_string());
        }
        self.discard_all(media, &files).await;

        let created = self.posts.create(draft, encoded.attachments)?;
        Ok(self.settle(created, "Confession posted!"))
    }

    pub fn like(&mut self, id: PostId) -> Option<u64> {
        let liked = self.posts.like(id);
        self.settle_quietly(liked)
    }

    // ── History panel ───────────────────────────────────────────────────────

    /// Returns the log as it was and marks everything read, as opening the
    /// panel does.
    pub fn open_history(&mut self) -> Vec<HistoryEntry> {
        let snapshot = self.history.entries().to_vec();
        self.history.mark_all_read();
        snapshot
    }

    pub fn mark_history_read(&mut self) {
        self.history.mark_all_read();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ── Admin surface ───────────────────────────────────────────────────────

    pub fn login(&mut self, auth: &dyn AuthProvider, password: &str) -> Result<()> {
        if !auth.verify_admin_password(password) {
            warn!("Admin login with wrong password");
            return Err(DomainError::Unauthorized("wrong password".into()));
        }
        self.session.login()
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()
    }

    /// Guards every admin action; refreshes the session on success.
    pub fn require_admin(&self) -> Result<()> {
        self.session.check()
    }

    pub fn delete(&mut self, id: PostId) -> bool {
        let deleted = self.posts.delete(id);
        if deleted.value {
            self.settle(deleted, "Confession deleted!")
        } else {
            self.settle_quietly(deleted)
        }
    }

    pub fn clear_all(&mut self) -> usize {
        let cleared = self.posts.clear_all();
        self.settle(cleared, "All data cleared!")
    }

    pub fn reset_to_sample(&mut self) {
        let reset = self.posts.reset_to_sample();
        self.settle(reset, "Reset to demo data!")
    }

    pub fn export(&mut self) -> Result<ExportedFile> {
        let body = self.posts.export_json()?;
        let file_name = export_file_name_for(self.clock.as_ref());
        self.notify(HistoryKind::Success, "Data exported!");
        Ok(ExportedFile { file_name, body })
    }

    async fn discard_all(&self, media: &dyn MediaStore, files: &[SelectedFile]) {
        for file in files {
            if let Err(e) = media.discard_upload(&file.media_id).await {
                warn!(name = %file.name, error = %e, "Failed to discard staged file");
            }
        }
    }

    fn settle<T>(&mut self, mutation: Mutation<T>, success: &str) -> T {
        match mutation.persisted {
            Ok(()) => self.notify(HistoryKind::Success, success),
            Err(ref e) => self.report_save_failure(e),
        }
        mutation.value
    }

    fn settle_quietly<T>(&mut self, mutation: Mutation<T>) -> T {
        if let Err(ref e) = mutation.persisted {
            self.report_save_failure(e);
        }
        mutation.value
    }

    fn report_save_failure(&mut self, err: &DomainError) {
        self.notify(HistoryKind::Error, format!("Failed to save data: {err}"));
    }
}
