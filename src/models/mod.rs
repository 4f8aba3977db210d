pub mod notification;

pub use notification::{
    NewNotification, Notification, NotificationCategory, NotificationContent, NotificationType,
    Priority, UnreadCounts,
};
