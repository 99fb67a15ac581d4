//! The public wall: listing, posting, likes and the media gallery.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use domains::{CategoryFilter, DomainError, PostDraft, PostId};
use serde::Deserialize;
use services::Wall;
use tracing::info;
use ui::{GalleryView, WallView};

use super::render;
use crate::error::ApiError;
use crate::router::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub filter: String,
}

pub(crate) fn wall_view(wall: &Wall, filter: CategoryFilter) -> WallView {
    WallView::project(
        wall.posts().all(),
        filter,
        wall.batch().files(),
        wall.history().unread_count(),
    )
    .with_latest(wall.history().entries().first())
}

pub(crate) fn wall_href(filter: CategoryFilter) -> String {
    match filter {
        CategoryFilter::All => "/".to_string(),
        other => format!("/?filter={}", other.as_str()),
    }
}

pub async fn show_wall(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Html<String>, ApiError> {
    let wall = state.wall.lock().await;
    render(&wall_view(&wall, CategoryFilter::parse(&query.filter)))
}

/// Creates a post from the form and the staged files.
///
/// A blank recipient or message re-renders the wall with the typed values
/// and a prompt; nothing is created and the staged files stay.
pub async fn submit(
    State(state): State<AppState>,
    Form(draft): Form<PostDraft>,
) -> Result<Response, ApiError> {
    let mut wall = state.wall.lock().await;
    match wall.submit(state.media.as_ref(), draft.clone()).await {
        Ok(post) => {
            info!(id = post.id, media = post.media.len(), "Confession posted");
            Ok(Redirect::to("/").into_response())
        }
        Err(e @ DomainError::MissingField(_)) => {
            let view = wall_view(&wall, CategoryFilter::All).with_prompt(e.to_string(), &draft);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&view)?).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Form(query): Form<FilterQuery>,
) -> Redirect {
    let mut wall = state.wall.lock().await;
    wall.like(id);
    Redirect::to(&wall_href(CategoryFilter::parse(&query.filter)))
}

pub async fn gallery(
    State(state): State<AppState>,
    Path((id, index)): Path<(PostId, usize)>,
) -> Result<Html<String>, ApiError> {
    let wall = state.wall.lock().await;
    let post = wall
        .posts()
        .get(id)
        .ok_or_else(|| DomainError::NotFound("confession", id.to_string()))?;
    let view = GalleryView::project(post, index)
        .ok_or_else(|| DomainError::NotFound("attachment", format!("{id}/{index}")))?;
    render(&view)
}
