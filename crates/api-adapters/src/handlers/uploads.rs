//! Staging files for the next post.

use axum::{
    extract::{multipart::Field, Multipart, State},
    response::Redirect,
    Form,
};
use domains::{DomainError, HistoryKind};
use serde::Deserialize;
use services::{IncomingFile, StageOutcome};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::router::AppState;

/// Multipart field carrying the selected files.
const MEDIA_FIELD: &str = "media";

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub name: String,
}

/// Reads one file field. Bytes past `max_bytes` are counted but not kept,
/// so an oversized file is still sized and then rejected by validation.
///
/// The second value is `false` when the body broke off mid-field; no
/// further fields can be read after that.
async fn read_file(field: &mut Field<'_>, name: String, max_bytes: u64) -> (IncomingFile, bool) {
    let content_type = field.content_type().map(str::to_string);
    let mut data = Vec::new();
    let mut size_bytes: u64 = 0;
    let mut intact = true;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                size_bytes += chunk.len() as u64;
                if size_bytes <= max_bytes {
                    data.extend_from_slice(&chunk);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(name = %name, read = size_bytes, error = %e, "Upload interrupted");
                intact = false;
                break;
            }
        }
    }

    if size_bytes > max_bytes {
        data.clear();
    }
    let file = IncomingFile {
        name,
        content_type,
        size_bytes,
        data,
    };
    (file, intact)
}

/// Stages every file in the form's `media` fields, in order.
///
/// Each file is sized while it streams in, so an oversized one still
/// reaches validation. Rejected files and files cut off mid-stream are
/// reported through the history log; the visitor lands back on the wall
/// either way.
pub async fn stage(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let max_bytes = state.max_attachment_bytes;
    let mut files = Vec::new();
    let mut interrupted = Vec::new();
    let mut seen_field = false;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if !seen_field => {
                return Err(ApiError::BadRequest(format!("Multipart error: {e}")));
            }
            Err(e) => {
                warn!(error = %e, "Ignoring the rest of a broken upload");
                break;
            }
        };
        seen_field = true;
        if field.name() != Some(MEDIA_FIELD) {
            continue;
        }
        let Some(name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string) else {
            continue;
        };

        let (file, intact) = read_file(&mut field, name, max_bytes).await;
        if intact || file.size_bytes > max_bytes {
            files.push(file);
        } else {
            interrupted.push(file.name);
        }
        if !intact {
            break;
        }
    }

    let mut wall = state.wall.lock().await;
    for file in files {
        let name = file.name.clone();
        match wall.stage_file(state.media.as_ref(), file).await {
            Ok(StageOutcome::Added) => debug!(%name, "File staged"),
            Ok(StageOutcome::Duplicate) => debug!(%name, "Duplicate file ignored"),
            Err(e) => debug!(%name, error = %e, "File not staged"),
        }
    }
    for name in interrupted {
        let err = DomainError::AttachmentUnreadable {
            name,
            reason: "the upload was interrupted".to_string(),
        };
        wall.notify(HistoryKind::Error, err.to_string());
    }
    Ok(Redirect::to("/"))
}

pub async fn remove(State(state): State<AppState>, Form(form): Form<RemoveForm>) -> Redirect {
    let mut wall = state.wall.lock().await;
    wall.unstage_file(state.media.as_ref(), &form.name).await;
    Redirect::to("/")
}

pub async fn clear(State(state): State<AppState>) -> Redirect {
    let mut wall = state.wall.lock().await;
    wall.clear_selection(state.media.as_ref()).await;
    Redirect::to("/")
}
