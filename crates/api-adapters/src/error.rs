use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use domains::DomainError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Domain(DomainError::Unauthorized(_)) => {
                return Redirect::to("/admin/login").into_response();
            }
            ApiError::Domain(DomainError::NotFound(..)) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Domain(DomainError::MissingField(_))
            | ApiError::Domain(DomainError::AttachmentRejected(_))
            | ApiError::Domain(DomainError::AttachmentUnreadable { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Domain(_) | ApiError::Render(_) => {
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
