use uuid::Uuid;

use crate::mailer::{Mailer, OutgoingEmail};
use crate::models::{
    NewNotification, Notification, NotificationCategory, NotificationContent, Priority,
    UnreadCounts,
};
use crate::notify::events;
use crate::notify::events::{ApplicationStatus, CompanyDecision};
use crate::store::PgStore;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Page/filter parameters for a notification listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<NotificationCategory>,
    pub unread_only: bool,
}

impl ListParams {
    /// Clamps raw client input to a sane (page, limit, offset) triple.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit, (page - 1) * limit)
    }
}

#[derive(Debug, Clone)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub unread_count: i64,
}

/// Orchestrates the notification store and best-effort email delivery.
///
/// Database errors propagate to the caller; email failures never do — a
/// notification is persisted even when its companion email exhausts every
/// retry (accepted best-effort semantics, logged and not re-queued).
#[derive(Clone)]
pub struct NotificationService {
    store: PgStore,
    mailer: Mailer,
}

impl NotificationService {
    pub fn new(store: PgStore, mailer: Mailer) -> Self {
        Self { store, mailer }
    }

    // -- Core operations --

    pub async fn create(&self, new: NewNotification) -> anyhow::Result<Notification> {
        self.store.insert_notification(&new).await
    }

    /// One batched write, not a loop of inserts.
    pub async fn create_bulk(
        &self,
        user_ids: &[Uuid],
        content: NotificationContent,
    ) -> anyhow::Result<Vec<Uuid>> {
        self.store.insert_notifications_bulk(user_ids, &content).await
    }

    /// Returns a page of non-deleted notifications newest-first, plus the
    /// total matching count and the user's unread count. The three queries
    /// are independent, so they are issued concurrently and joined.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        params: ListParams,
    ) -> anyhow::Result<NotificationPage> {
        let (page, limit, offset) = params.normalize();

        let (notifications, total, unread_count) = tokio::try_join!(
            self.store
                .list_notifications(user_id, params.category, params.unread_only, limit, offset),
            self.store
                .count_notifications(user_id, params.category, params.unread_only),
            self.store.count_unread(user_id),
        )?;

        Ok(NotificationPage {
            notifications,
            page,
            limit,
            total,
            unread_count,
        })
    }

    pub async fn unread_count(&self, user_id: Uuid) -> anyhow::Result<i64> {
        self.store.count_unread(user_id).await
    }

    /// Always contains all five categories, zero-filled.
    pub async fn unread_count_by_category(&self, user_id: Uuid) -> anyhow::Result<UnreadCounts> {
        self.store.count_unread_by_category(user_id).await
    }

    pub async fn mark_read(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Notification>> {
        self.store.mark_read(id, user_id).await
    }

    pub async fn mark_all_read(
        &self,
        user_id: Uuid,
        category: Option<NotificationCategory>,
    ) -> anyhow::Result<u64> {
        self.store.mark_all_read(user_id, category).await
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        self.store.soft_delete(id, user_id).await
    }

    pub async fn delete_all_in_category(
        &self,
        user_id: Uuid,
        category: NotificationCategory,
    ) -> anyhow::Result<u64> {
        self.store.soft_delete_category(user_id, category).await
    }

    // -- Domain-event helpers --
    //
    // Inbound triggers from the portal's chat/application/admin controllers
    // are plain function calls in the request path, not a queue.

    pub async fn notify_new_message(
        &self,
        user_id: Uuid,
        sender_name: &str,
        conversation_id: Uuid,
    ) -> anyhow::Result<Notification> {
        self.create(events::new_message(sender_name, conversation_id).for_user(user_id))
            .await
    }

    /// Job alerts fan out to every matching candidate in one batch.
    pub async fn notify_job_alert(
        &self,
        user_ids: &[Uuid],
        job_title: &str,
        company_name: &str,
        job_id: Uuid,
    ) -> anyhow::Result<Vec<Uuid>> {
        self.create_bulk(user_ids, events::job_alert(job_title, company_name, job_id))
            .await
    }

    /// Persists the status notification, then fires the companion email in
    /// the background. The returned record is written even if every send
    /// attempt later fails.
    pub async fn notify_application_status(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        status: ApplicationStatus,
        job_title: &str,
        application_id: Uuid,
    ) -> anyhow::Result<Notification> {
        let notification = self
            .create(events::application_status(status, job_title, application_id).for_user(user_id))
            .await?;

        if let Some(to) = email {
            self.deliver_email(
                notification.id,
                events::application_status_email(to, status, job_title),
            );
        }
        Ok(notification)
    }

    pub async fn notify_new_application(
        &self,
        employer_id: Uuid,
        applicant_name: &str,
        job_title: &str,
        application_id: Uuid,
    ) -> anyhow::Result<Notification> {
        self.create(
            events::new_application(applicant_name, job_title, application_id)
                .for_user(employer_id),
        )
        .await
    }

    pub async fn notify_company_status(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        decision: CompanyDecision,
        company_name: &str,
    ) -> anyhow::Result<Notification> {
        let notification = self
            .create(events::company_status(decision, company_name).for_user(user_id))
            .await?;

        if let Some(to) = email {
            self.deliver_email(
                notification.id,
                events::company_status_email(to, decision, company_name),
            );
        }
        Ok(notification)
    }

    pub async fn notify_welcome(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        user_name: &str,
    ) -> anyhow::Result<Notification> {
        let notification = self
            .create(events::welcome(user_name).for_user(user_id))
            .await?;

        if let Some(to) = email {
            self.deliver_email(notification.id, events::welcome_email(to, user_name));
        }
        Ok(notification)
    }

    pub async fn notify_system_announcement(
        &self,
        user_ids: &[Uuid],
        title: &str,
        message: &str,
        link: Option<&str>,
        priority: Priority,
    ) -> anyhow::Result<Vec<Uuid>> {
        self.create_bulk(
            user_ids,
            events::system_announcement(title, message, link, priority),
        )
        .await
    }

    /// Detached best-effort delivery: retries happen off the request path,
    /// and the email_sent flag is only flipped on success. A failed delivery
    /// is logged and not re-queued.
    fn deliver_email(&self, notification_id: Uuid, email: OutgoingEmail) {
        let mailer = self.mailer.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            let report = mailer.send_with_retry(email).await;
            if report.delivered() {
                if let Err(e) = store.mark_email_sent(notification_id).await {
                    tracing::error!(%notification_id, "failed to flag email_sent: {e}");
                }
            } else {
                tracing::warn!(
                    %notification_id,
                    attempts = report.attempts,
                    "companion email undelivered; notification kept"
                );
            }
        });
    }
}
