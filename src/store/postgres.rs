use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    NewNotification, Notification, NotificationCategory, NotificationContent, UnreadCounts,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // -- Notification writes --

    pub async fn insert_notification(
        &self,
        new: &NewNotification,
    ) -> anyhow::Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"INSERT INTO notifications (user_id, type, category, title, message, data, link, priority)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(new.user_id)
        .bind(new.content.r#type)
        .bind(new.content.category())
        .bind(&new.content.title)
        .bind(&new.content.message)
        .bind(&new.content.data)
        .bind(&new.content.link)
        .bind(new.content.priority)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert one notification per user in a single batched write.
    pub async fn insert_notifications_bulk(
        &self,
        user_ids: &[Uuid],
        content: &NotificationContent,
    ) -> anyhow::Result<Vec<Uuid>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO notifications (user_id, type, category, title, message, data, link, priority)
               SELECT uid, $2, $3, $4, $5, $6, $7, $8
               FROM UNNEST($1::uuid[]) AS t(uid)
               RETURNING id"#,
        )
        .bind(user_ids)
        .bind(content.r#type)
        .bind(content.category())
        .bind(&content.title)
        .bind(&content.message)
        .bind(&content.data)
        .bind(&content.link)
        .bind(content.priority)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    // -- Notification reads --

    pub async fn list_notifications(
        &self,
        user_id: Uuid,
        category: Option<NotificationCategory>,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"SELECT * FROM notifications
               WHERE user_id = $1 AND is_deleted = FALSE
                 AND ($2::notification_category IS NULL OR category = $2)
                 AND ($3 = FALSE OR is_read = FALSE)
               ORDER BY created_at DESC
               LIMIT $4 OFFSET $5"#,
        )
        .bind(user_id)
        .bind(category)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Total count under the same filters as [`list_notifications`].
    pub async fn count_notifications(
        &self,
        user_id: Uuid,
        category: Option<NotificationCategory>,
        unread_only: bool,
    ) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM notifications
               WHERE user_id = $1 AND is_deleted = FALSE
                 AND ($2::notification_category IS NULL OR category = $2)
                 AND ($3 = FALSE OR is_read = FALSE)"#,
        )
        .bind(user_id)
        .bind(category)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count_unread(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM notifications
               WHERE user_id = $1 AND is_read = FALSE AND is_deleted = FALSE"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count_unread_by_category(&self, user_id: Uuid) -> anyhow::Result<UnreadCounts> {
        let rows = sqlx::query_as::<_, (NotificationCategory, i64)>(
            r#"SELECT category, COUNT(*) FROM notifications
               WHERE user_id = $1 AND is_read = FALSE AND is_deleted = FALSE
               GROUP BY category"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(UnreadCounts::from_rows(rows))
    }

    // -- Read-state transitions --

    /// Idempotent: `read_at` is set exactly once, on the first mark.
    /// Returns `None` for an unknown or soft-deleted id.
    pub async fn mark_read(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Notification>> {
        let row = sqlx::query_as::<_, Notification>(
            r#"UPDATE notifications
               SET is_read = TRUE,
                   read_at = COALESCE(read_at, NOW()),
                   updated_at = NOW()
               WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
               RETURNING *"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Only flips records currently unread; returns the number actually
    /// changed, so a second call in a row reports 0.
    pub async fn mark_all_read(
        &self,
        user_id: Uuid,
        category: Option<NotificationCategory>,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"UPDATE notifications
               SET is_read = TRUE, read_at = NOW(), updated_at = NOW()
               WHERE user_id = $1 AND is_read = FALSE AND is_deleted = FALSE
                 AND ($2::notification_category IS NULL OR category = $2)"#,
        )
        .bind(user_id)
        .bind(category)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // -- Delete-state transitions (soft only; the retention sweep owns
    //    physical deletes) --

    pub async fn soft_delete(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"UPDATE notifications
               SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW()
               WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE"#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete_category(
        &self,
        user_id: Uuid,
        category: NotificationCategory,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"UPDATE notifications
               SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW()
               WHERE user_id = $1 AND category = $2 AND is_deleted = FALSE"#,
        )
        .bind(user_id)
        .bind(category)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // -- Delivery bookkeeping --

    pub async fn mark_email_sent(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"UPDATE notifications SET email_sent = TRUE, updated_at = NOW() WHERE id = $1"#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // -- Retention --

    /// Physically removes read, non-deleted records past the retention
    /// window. Soft-deleted records are kept for audit.
    pub async fn purge_read_older_than_days(&self, days: i32) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"DELETE FROM notifications
               WHERE is_read = TRUE AND is_deleted = FALSE
                 AND created_at < NOW() - make_interval(days => $1)"#,
        )
        .bind(days)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
