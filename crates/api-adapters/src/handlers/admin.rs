//! The admin dashboard. Every action except the login form passes the
//! session guard first; a failed guard lands on the login page.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use domains::{DomainError, PostId};
use serde::Deserialize;
use tracing::{info, warn};
use ui::{AdminView, DetailView, LoginView};

use super::render;
use crate::error::ApiError;
use crate::router::AppState;

const DASHBOARD_PATH: &str = "/admin";

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

pub async fn login_form(State(state): State<AppState>) -> Result<Response, ApiError> {
    let wall = state.wall.lock().await;
    if wall.require_admin().is_ok() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }
    Ok(render(&LoginView::default())?.into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let mut wall = state.wall.lock().await;
    match wall.login(state.auth.as_ref(), &form.password) {
        Ok(()) => Ok(Redirect::to(DASHBOARD_PATH).into_response()),
        Err(DomainError::Unauthorized(_)) => {
            let page = render(&LoginView::with_error("Wrong password, please try again."))?;
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    state.wall.lock().await.logout()?;
    info!("Admin logged out");
    Ok(Redirect::to("/admin/login"))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, ApiError> {
    let wall = state.wall.lock().await;
    wall.require_admin()?;

    let posts = wall.posts();
    let rows = posts.search(&query.q);
    let view = AdminView::project(
        &rows,
        &query.q,
        posts.stats(),
        wall.session().last_login(),
        posts.stored_size_bytes(),
    );
    render(&view)
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Html<String>, ApiError> {
    let wall = state.wall.lock().await;
    wall.require_admin()?;
    let post = wall
        .posts()
        .get(id)
        .ok_or_else(|| DomainError::NotFound("confession", id.to_string()))?;
    render(&DetailView::project(post))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Redirect, ApiError> {
    let mut wall = state.wall.lock().await;
    wall.require_admin()?;
    if !wall.delete(id) {
        warn!(id, "Delete requested for unknown confession");
    }
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// Downloads the whole collection as pretty-printed JSON.
pub async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut wall = state.wall.lock().await;
    wall.require_admin()?;
    let exported = wall.export()?;

    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.body,
    )
        .into_response())
}

pub async fn clear_all(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let mut wall = state.wall.lock().await;
    wall.require_admin()?;
    let removed = wall.clear_all();
    info!(removed, "All confessions cleared");
    Ok(Redirect::to(DASHBOARD_PATH))
}

pub async fn reset(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let mut wall = state.wall.lock().await;
    wall.require_admin()?;
    wall.reset_to_sample();
    info!("Confessions reset to demo data");
    Ok(Redirect::to(DASHBOARD_PATH))
}
