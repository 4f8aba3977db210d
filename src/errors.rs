use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("notification not found")]
    NotFound,

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("missing or invalid user identity")]
    Unauthenticated,

    #[error("invalid admin key")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "notification not found".to_string()),
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "missing or invalid X-User-Id header".to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid admin key".to_string()),
            AppError::Database(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        // Same envelope shape as success responses, without data/meta.
        let body = Json(json!({
            "success": false,
            "statusCode": status.as_u16(),
            "message": msg,
        }));

        (status, body).into_response()
    }
}
