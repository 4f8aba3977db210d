use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::response::{Envelope, PageMeta};
use crate::api::CurrentUser;
use crate::errors::AppError;
use crate::models::{Notification, NotificationCategory, Priority, UnreadCounts};
use crate::notify::ListParams;
use crate::AppState;

// ── Request DTOs ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<NotificationCategory>,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub category: Option<NotificationCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementRequest {
    pub user_ids: Vec<Uuid>,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub priority: Option<Priority>,
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("invalid notification id: {raw}")))
}

// ── Handlers ─────────────────────────────────────────────────

/// GET /api/v1/notifications — paged inbox, filterable by category/unread
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Query(q): Query<ListQuery>,
) -> Result<Envelope<Vec<Notification>>, AppError> {
    let page = state
        .notifier
        .list_for_user(
            user_id,
            ListParams {
                page: q.page,
                limit: q.limit,
                category: q.category,
                unread_only: q.unread_only,
            },
        )
        .await?;

    Ok(
        Envelope::ok("notifications fetched", page.notifications).with_meta(PageMeta {
            page: page.page,
            limit: page.limit,
            total: page.total,
            unread_count: page.unread_count,
        }),
    )
}

/// GET /api/v1/notifications/unread-count — total plus per-category breakdown
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Envelope<UnreadCounts>, AppError> {
    let counts = state.notifier.unread_count_by_category(user_id).await?;
    Ok(Envelope::ok("unread count fetched", counts))
}

/// PATCH /api/v1/notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id_str): Path<String>,
) -> Result<Envelope<Notification>, AppError> {
    let id = parse_id(&id_str)?;
    let notification = state
        .notifier
        .mark_read(id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Envelope::ok("notification marked as read", notification))
}

/// PATCH /api/v1/notifications/read-all — optionally scoped to a category
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Query(filter): Query<CategoryFilter>,
) -> Result<Envelope<Value>, AppError> {
    let updated = state
        .notifier
        .mark_all_read(user_id, filter.category)
        .await?;
    Ok(Envelope::ok(
        "notifications marked as read",
        json!({ "updated": updated }),
    ))
}

/// DELETE /api/v1/notifications/:id — soft delete
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id_str): Path<String>,
) -> Result<Envelope<Value>, AppError> {
    let id = parse_id(&id_str)?;
    if !state.notifier.delete(id, user_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Envelope::ok("notification deleted", json!({ "deleted": true })))
}

/// DELETE /api/v1/notifications/category/:category — soft delete a category
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(category_str): Path<String>,
) -> Result<Envelope<Value>, AppError> {
    let category = NotificationCategory::parse(&category_str)
        .ok_or_else(|| AppError::BadRequest(format!("unknown category: {category_str}")))?;
    let deleted = state
        .notifier
        .delete_all_in_category(user_id, category)
        .await?;
    Ok(Envelope::ok(
        "notifications deleted",
        json!({ "deleted": deleted }),
    ))
}

/// POST /api/v1/announcements — admin-only broadcast to a list of users
pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnnouncementRequest>,
) -> Result<Envelope<Value>, AppError> {
    if payload.user_ids.is_empty() {
        return Err(AppError::BadRequest("userIds must not be empty".into()));
    }
    if payload.title.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "title and message must not be empty".into(),
        ));
    }

    let ids = state
        .notifier
        .notify_system_announcement(
            &payload.user_ids,
            &payload.title,
            &payload.message,
            payload.link.as_deref(),
            payload.priority.unwrap_or_default(),
        )
        .await?;

    Ok(Envelope::created(
        "announcement sent",
        json!({ "created": ids.len() }),
    ))
}
