use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppState;

pub mod handlers;
pub mod response;

/// Build the notification API router.
/// All routes are relative — the caller mounts this under `/api/v1`.
pub fn api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/announcements", post(handlers::create_announcement))
        .layer(middleware::from_fn_with_state(state, admin_auth));

    Router::new()
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/unread-count", get(handlers::unread_count))
        .route("/notifications/:id/read", patch(handlers::mark_read))
        .route("/notifications/read-all", patch(handlers::mark_all_read))
        .route("/notifications/:id", delete(handlers::delete_notification))
        .route(
            "/notifications/category/:category",
            delete(handlers::delete_category),
        )
        .merge(admin)
        .fallback(fallback_404)
}

async fn fallback_404() -> AppError {
    AppError::NotFound
}

/// Authenticated caller identity, taken from the `X-User-Id` header set by
/// the portal's auth gateway upstream of this service.
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;
        let id = Uuid::parse_str(raw).map_err(|_| AppError::Unauthenticated)?;
        Ok(CurrentUser(id))
    }
}

/// Middleware: validates `X-Admin-Key` (or `Authorization: Bearer`) against
/// the configured admin key. Announcement routes are unreachable when no key
/// is configured.
async fn admin_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::trim)
        });

    let expected = state.config.admin_key.as_deref().ok_or_else(|| {
        tracing::error!("HIREWIRE_ADMIN_KEY is not set; announcement API disabled");
        AppError::Unauthorized
    })?;

    match provided {
        Some(k) if k == expected => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!("announcement API: invalid admin key");
            Err(AppError::Unauthorized)
        }
        None => {
            tracing::warn!("announcement API: missing X-Admin-Key header");
            Err(AppError::Unauthorized)
        }
    }
}
