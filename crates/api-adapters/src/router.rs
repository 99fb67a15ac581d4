use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domains::{AuthProvider, MediaStore};
use services::Wall;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, history, uploads, wall};
use crate::middleware::security_headers;

/// State shared by every handler.
///
/// The wall sits behind one async mutex, so exactly one action mutates
/// it at a time and every page renders the latest completed action.
#[derive(Clone)]
pub struct AppState {
    pub wall: Arc<Mutex<Wall>>,
    pub media: Arc<dyn MediaStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub max_attachment_bytes: u64,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(wall: Wall, media: Arc<dyn MediaStore>, auth: Arc<dyn AuthProvider>) -> Self {
        let max_attachment_bytes = wall.max_attachment_bytes();
        Self {
            wall: Arc::new(Mutex::new(wall)),
            media,
            auth,
            max_attachment_bytes,
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(wall::show_wall))
        .route("/confessions", post(wall::submit))
        .route("/confessions/{id}/like", post(wall::like))
        .route("/confessions/{id}/media/{index}", get(wall::gallery))
        // Sizes are checked per file while streaming, not per request.
        .route(
            "/uploads",
            post(uploads::stage).layer(DefaultBodyLimit::disable()),
        )
        .route("/uploads/remove", post(uploads::remove))
        .route("/uploads/clear", post(uploads::clear))
        .route("/history", get(history::show_history))
        .route("/history/read-all", post(history::read_all))
        .route("/history/clear", post(history::clear))
        .route("/admin", get(admin::dashboard))
        .route("/admin/login", get(admin::login_form).post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/confessions/{id}", get(admin::detail))
        .route("/admin/confessions/{id}/delete", post(admin::delete))
        .route("/admin/export", get(admin::export))
        .route("/admin/clear", post(admin::clear_all))
        .route("/admin/reset", post(admin::reset));

    if let Some(dir) = &state.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
