use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of domain events that produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
pub enum NotificationType {
    NewMessage,
    JobAlert,
    ApplicationReceived,
    ApplicationViewed,
    ApplicationShortlisted,
    ApplicationRejected,
    ApplicationSelected,
    CompanyApproved,
    CompanyRejected,
    Welcome,
    SystemAnnouncement,
}

impl NotificationType {
    pub const ALL: [NotificationType; 11] = [
        NotificationType::NewMessage,
        NotificationType::JobAlert,
        NotificationType::ApplicationReceived,
        NotificationType::ApplicationViewed,
        NotificationType::ApplicationShortlisted,
        NotificationType::ApplicationRejected,
        NotificationType::ApplicationSelected,
        NotificationType::CompanyApproved,
        NotificationType::CompanyRejected,
        NotificationType::Welcome,
        NotificationType::SystemAnnouncement,
    ];

    /// Grouping used for filtering and unread counters. Exhaustive on purpose:
    /// adding a type without picking its category is a compile error.
    pub fn category(self) -> NotificationCategory {
        use NotificationType::*;
        match self {
            NewMessage => NotificationCategory::Message,
            JobAlert => NotificationCategory::Job,
            ApplicationReceived | ApplicationViewed | ApplicationShortlisted
            | ApplicationRejected | ApplicationSelected => NotificationCategory::Application,
            CompanyApproved | CompanyRejected | Welcome => NotificationCategory::Account,
            SystemAnnouncement => NotificationCategory::System,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_category", rename_all = "snake_case")]
pub enum NotificationCategory {
    Message,
    Job,
    Application,
    Account,
    System,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 5] = [
        NotificationCategory::Message,
        NotificationCategory::Job,
        NotificationCategory::Application,
        NotificationCategory::Account,
        NotificationCategory::System,
    ];

    /// Case-insensitive parse of the wire name, for path segments.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MESSAGE" => Some(NotificationCategory::Message),
            "JOB" => Some(NotificationCategory::Job),
            "APPLICATION" => Some(NotificationCategory::Application),
            "ACCOUNT" => Some(NotificationCategory::Account),
            "SYSTEM" => Some(NotificationCategory::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_priority", rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// A persisted, per-user notification record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub r#type: NotificationType,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub link: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub email_sent: bool,
    pub push_sent: bool,
    #[serde(skip)]
    pub is_deleted: bool,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user-independent part of an insert payload. One content value can be
/// fanned out to many users in a single batch write.
///
/// Category is never accepted from callers; it is derived from the type at
/// insert time.
#[derive(Debug, Clone)]
pub struct NotificationContent {
    pub r#type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub link: Option<String>,
    pub priority: Priority,
}

impl NotificationContent {
    pub fn new(
        r#type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            r#type,
            title: title.into(),
            message: message.into(),
            data: None,
            link: None,
            priority: Priority::default(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(&self) -> NotificationCategory {
        self.r#type.category()
    }

    pub fn for_user(self, user_id: Uuid) -> NewNotification {
        NewNotification {
            user_id,
            content: self,
        }
    }
}

/// Insert payload for a single user.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub content: NotificationContent,
}

/// Unread totals returned by `GET /notifications/unread-count`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCounts {
    pub total: i64,
    pub by_category: BTreeMap<NotificationCategory, i64>,
}

impl UnreadCounts {
    /// Builds the response map from GROUP BY rows. Every known category is
    /// present in the output, zero-filled, not just those with matches.
    pub fn from_rows(rows: Vec<(NotificationCategory, i64)>) -> Self {
        let mut by_category: BTreeMap<NotificationCategory, i64> =
            NotificationCategory::ALL.iter().map(|c| (*c, 0)).collect();
        let mut total = 0;
        for (category, count) in rows {
            total += count;
            by_category.insert(category, count);
        }
        Self { total, by_category }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_maps_to_a_known_category() {
        for t in NotificationType::ALL {
            assert!(NotificationCategory::ALL.contains(&t.category()));
        }
    }

    #[test]
    fn application_statuses_share_the_application_category() {
        for t in [
            NotificationType::ApplicationReceived,
            NotificationType::ApplicationViewed,
            NotificationType::ApplicationShortlisted,
            NotificationType::ApplicationRejected,
            NotificationType::ApplicationSelected,
        ] {
            assert_eq!(t.category(), NotificationCategory::Application);
        }
    }

    #[test]
    fn wire_names_are_screaming_snake_case() {
        let json = serde_json::to_string(&NotificationType::ApplicationShortlisted).unwrap();
        assert_eq!(json, "\"APPLICATION_SHORTLISTED\"");
        let json = serde_json::to_string(&NotificationCategory::Account).unwrap();
        assert_eq!(json, "\"ACCOUNT\"");
        let parsed: NotificationCategory = serde_json::from_str("\"JOB\"").unwrap();
        assert_eq!(parsed, NotificationCategory::Job);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn unread_counts_are_zero_filled_for_all_categories() {
        let counts = UnreadCounts::from_rows(vec![(NotificationCategory::Job, 3)]);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.by_category.len(), 5);
        assert_eq!(counts.by_category[&NotificationCategory::Job], 3);
        assert_eq!(counts.by_category[&NotificationCategory::Message], 0);
    }
}
