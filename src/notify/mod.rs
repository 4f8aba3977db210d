pub mod events;
pub mod service;

pub use events::{ApplicationStatus, CompanyDecision};
pub use service::{ListParams, NotificationPage, NotificationService};
