//! Fixed templates mapping portal domain events to notification content and
//! companion emails. Controllers never hand-write titles; every event goes
//! through one of these constructors.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::mailer::OutgoingEmail;
use crate::models::{NotificationContent, NotificationType, Priority};

/// Closed set of application pipeline outcomes that notify the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Viewed,
    Shortlisted,
    Rejected,
    Selected,
}

impl ApplicationStatus {
    pub fn notification_type(self) -> NotificationType {
        match self {
            ApplicationStatus::Viewed => NotificationType::ApplicationViewed,
            ApplicationStatus::Shortlisted => NotificationType::ApplicationShortlisted,
            ApplicationStatus::Rejected => NotificationType::ApplicationRejected,
            ApplicationStatus::Selected => NotificationType::ApplicationSelected,
        }
    }

    /// Shortlisted and selected outcomes jump the queue in the inbox.
    pub fn priority(self) -> Priority {
        match self {
            ApplicationStatus::Shortlisted => Priority::High,
            ApplicationStatus::Selected => Priority::Urgent,
            ApplicationStatus::Viewed | ApplicationStatus::Rejected => Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyDecision {
    Approved,
    Rejected,
}

pub fn new_message(sender_name: &str, conversation_id: Uuid) -> NotificationContent {
    NotificationContent::new(
        NotificationType::NewMessage,
        "New message",
        format!("You have a new message from {sender_name}."),
    )
    .with_link(format!("/chat/{conversation_id}"))
    .with_data(json!({ "conversationId": conversation_id }))
}

pub fn job_alert(job_title: &str, company_name: &str, job_id: Uuid) -> NotificationContent {
    NotificationContent::new(
        NotificationType::JobAlert,
        "New job matching your profile",
        format!("{company_name} is hiring: {job_title}."),
    )
    .with_link(format!("/jobs/{job_id}"))
    .with_data(json!({ "jobId": job_id }))
}

pub fn application_status(
    status: ApplicationStatus,
    job_title: &str,
    application_id: Uuid,
) -> NotificationContent {
    let (title, message) = match status {
        ApplicationStatus::Viewed => (
            "Application viewed".to_string(),
            format!("The employer viewed your application for {job_title}."),
        ),
        ApplicationStatus::Shortlisted => (
            "You have been shortlisted!".to_string(),
            format!("Great news — you were shortlisted for {job_title}."),
        ),
        ApplicationStatus::Rejected => (
            "Application update".to_string(),
            format!("Your application for {job_title} was not selected this time."),
        ),
        ApplicationStatus::Selected => (
            "Congratulations, you got the job!".to_string(),
            format!("You have been selected for {job_title}."),
        ),
    };

    NotificationContent::new(status.notification_type(), title, message)
        .with_priority(status.priority())
        .with_link(format!("/applications/{application_id}"))
        .with_data(json!({ "applicationId": application_id, "status": status }))
}

/// Employer-side counterpart: a candidate applied to one of their jobs.
pub fn new_application(
    applicant_name: &str,
    job_title: &str,
    application_id: Uuid,
) -> NotificationContent {
    NotificationContent::new(
        NotificationType::ApplicationReceived,
        "New application received",
        format!("{applicant_name} applied for {job_title}."),
    )
    .with_link(format!("/applications/{application_id}"))
    .with_data(json!({ "applicationId": application_id }))
}

pub fn company_status(decision: CompanyDecision, company_name: &str) -> NotificationContent {
    match decision {
        CompanyDecision::Approved => NotificationContent::new(
            NotificationType::CompanyApproved,
            "Company profile approved",
            format!("{company_name} has been verified. You can now post jobs."),
        )
        .with_link("/company/dashboard"),
        CompanyDecision::Rejected => NotificationContent::new(
            NotificationType::CompanyRejected,
            "Company profile rejected",
            format!("The profile for {company_name} did not pass review. Please update your details and resubmit."),
        )
        .with_link("/company/profile"),
    }
}

pub fn welcome(user_name: &str) -> NotificationContent {
    NotificationContent::new(
        NotificationType::Welcome,
        "Welcome to HireWire",
        format!("Hi {user_name}, your account is ready. Complete your profile to start applying."),
    )
    .with_priority(Priority::Low)
    .with_link("/profile")
}

pub fn system_announcement(
    title: &str,
    message: &str,
    link: Option<&str>,
    priority: Priority,
) -> NotificationContent {
    let mut content = NotificationContent::new(NotificationType::SystemAnnouncement, title, message)
        .with_priority(priority);
    if let Some(link) = link {
        content = content.with_link(link);
    }
    content
}

// ── Companion emails ─────────────────────────────────────────

pub fn application_status_email(
    to: &str,
    status: ApplicationStatus,
    job_title: &str,
) -> OutgoingEmail {
    let content = application_status(status, job_title, Uuid::nil());
    OutgoingEmail {
        to: to.to_string(),
        subject: content.title.clone(),
        html_body: format!(
            "<h2>{}</h2><p>{}</p><p>Log in to HireWire to see the details.</p>",
            content.title, content.message
        ),
    }
}

pub fn company_status_email(
    to: &str,
    decision: CompanyDecision,
    company_name: &str,
) -> OutgoingEmail {
    let content = company_status(decision, company_name);
    OutgoingEmail {
        to: to.to_string(),
        subject: content.title.clone(),
        html_body: format!("<h2>{}</h2><p>{}</p>", content.title, content.message),
    }
}

pub fn welcome_email(to: &str, user_name: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Welcome to HireWire".to_string(),
        html_body: format!(
            "<h2>Welcome aboard, {user_name}!</h2>\
             <p>Your HireWire account is ready. Complete your profile to get \
             matched with jobs, or browse openings right away.</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationCategory;

    #[test]
    fn shortlisted_is_high_priority_selected_is_urgent() {
        assert_eq!(ApplicationStatus::Shortlisted.priority(), Priority::High);
        assert_eq!(ApplicationStatus::Selected.priority(), Priority::Urgent);
        assert_eq!(ApplicationStatus::Viewed.priority(), Priority::Medium);
        assert_eq!(ApplicationStatus::Rejected.priority(), Priority::Medium);
    }

    #[test]
    fn application_status_templates_are_distinct() {
        let id = Uuid::new_v4();
        let statuses = [
            ApplicationStatus::Viewed,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::Rejected,
            ApplicationStatus::Selected,
        ];
        let titles: Vec<String> = statuses
            .iter()
            .map(|s| application_status(*s, "Backend Engineer", id).title)
            .collect();
        for (i, a) in titles.iter().enumerate() {
            for b in titles.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn shortlisted_content_lands_in_application_category() {
        let content = application_status(ApplicationStatus::Shortlisted, "QA Lead", Uuid::new_v4());
        assert_eq!(content.category(), NotificationCategory::Application);
        assert_eq!(content.priority, Priority::High);
        assert!(content.message.contains("QA Lead"));
    }

    #[test]
    fn welcome_is_low_priority_account_noise() {
        let content = welcome("Ada");
        assert_eq!(content.priority, Priority::Low);
        assert_eq!(content.category(), NotificationCategory::Account);
    }

    #[test]
    fn new_message_carries_conversation_deep_link() {
        let convo = Uuid::new_v4();
        let content = new_message("Rahim", convo);
        assert_eq!(content.link.as_deref(), Some(format!("/chat/{convo}").as_str()));
        assert_eq!(
            content.data.as_ref().unwrap()["conversationId"],
            serde_json::json!(convo)
        );
    }
}
