//! Integration tests for notification domain logic and the HTTP envelope.
//!
//! Store queries themselves need a live PostgreSQL; everything that can be
//! checked without one lives here: category derivation, event templates,
//! paging arithmetic, unread zero-filling, and response envelope shape.

use hirewire::api::response::{Envelope, PageMeta};
use hirewire::models::{
    NotificationCategory, NotificationType, Priority, UnreadCounts,
};
use hirewire::notify::events;
use hirewire::notify::{ApplicationStatus, ListParams};
use serde_json::json;
use uuid::Uuid;

mod categories {
    use super::*;

    #[test]
    fn derivation_is_total_over_all_types() {
        // Exactly five categories exist and every type lands in one of them.
        for t in NotificationType::ALL {
            assert!(NotificationCategory::ALL.contains(&t.category()));
        }
        assert_eq!(NotificationCategory::ALL.len(), 5);
    }

    #[test]
    fn spot_checks_match_the_fixed_mapping() {
        assert_eq!(
            NotificationType::NewMessage.category(),
            NotificationCategory::Message
        );
        assert_eq!(
            NotificationType::JobAlert.category(),
            NotificationCategory::Job
        );
        assert_eq!(
            NotificationType::ApplicationShortlisted.category(),
            NotificationCategory::Application
        );
        assert_eq!(
            NotificationType::Welcome.category(),
            NotificationCategory::Account
        );
        assert_eq!(
            NotificationType::SystemAnnouncement.category(),
            NotificationCategory::System
        );
    }

    #[test]
    fn path_segment_parsing_is_case_insensitive_and_closed() {
        assert_eq!(
            NotificationCategory::parse("APPLICATION"),
            Some(NotificationCategory::Application)
        );
        assert_eq!(
            NotificationCategory::parse("job"),
            Some(NotificationCategory::Job)
        );
        assert_eq!(NotificationCategory::parse("payments"), None);
    }
}

mod unread_counts {
    use super::*;

    #[test]
    fn all_five_categories_present_even_with_no_rows() {
        let counts = UnreadCounts::from_rows(vec![]);
        assert_eq!(counts.total, 0);
        assert_eq!(counts.by_category.len(), 5);
        for c in NotificationCategory::ALL {
            assert_eq!(counts.by_category[&c], 0);
        }
    }

    #[test]
    fn totals_sum_across_categories() {
        let counts = UnreadCounts::from_rows(vec![
            (NotificationCategory::Application, 2),
            (NotificationCategory::Message, 5),
        ]);
        assert_eq!(counts.total, 7);
        assert_eq!(counts.by_category[&NotificationCategory::Application], 2);
        assert_eq!(counts.by_category[&NotificationCategory::Message], 5);
        assert_eq!(counts.by_category[&NotificationCategory::System], 0);
    }

    #[test]
    fn serializes_with_screaming_category_keys() {
        let counts = UnreadCounts::from_rows(vec![(NotificationCategory::Job, 1)]);
        let body = serde_json::to_value(&counts).unwrap();
        assert_eq!(body["total"], 1);
        assert_eq!(body["byCategory"]["JOB"], 1);
        assert_eq!(body["byCategory"]["ACCOUNT"], 0);
    }
}

mod event_templates {
    use super::*;

    #[test]
    fn application_status_priorities_follow_the_pipeline() {
        assert_eq!(ApplicationStatus::Viewed.priority(), Priority::Medium);
        assert_eq!(ApplicationStatus::Shortlisted.priority(), Priority::High);
        assert_eq!(ApplicationStatus::Rejected.priority(), Priority::Medium);
        assert_eq!(ApplicationStatus::Selected.priority(), Priority::Urgent);
    }

    #[test]
    fn shortlisted_notification_defaults_to_high_priority() {
        let content =
            events::application_status(ApplicationStatus::Shortlisted, "Data Engineer", Uuid::new_v4());
        assert_eq!(content.r#type, NotificationType::ApplicationShortlisted);
        assert_eq!(content.category(), NotificationCategory::Application);
        assert_eq!(content.priority, Priority::High);
    }

    #[test]
    fn status_payload_carries_application_id_and_status() {
        let id = Uuid::new_v4();
        let content = events::application_status(ApplicationStatus::Selected, "PM", id);
        let data = content.data.unwrap();
        assert_eq!(data["applicationId"], json!(id));
        assert_eq!(data["status"], json!("SELECTED"));
        assert_eq!(content.link.as_deref(), Some(format!("/applications/{id}").as_str()));
    }

    #[test]
    fn company_decisions_map_to_distinct_account_types() {
        let approved = events::company_status(events::CompanyDecision::Approved, "Acme");
        let rejected = events::company_status(events::CompanyDecision::Rejected, "Acme");
        assert_eq!(approved.r#type, NotificationType::CompanyApproved);
        assert_eq!(rejected.r#type, NotificationType::CompanyRejected);
        assert_eq!(approved.category(), NotificationCategory::Account);
        assert_ne!(approved.title, rejected.title);
    }

    #[test]
    fn companion_email_reuses_the_notification_copy() {
        let email = events::application_status_email(
            "candidate@example.com",
            ApplicationStatus::Shortlisted,
            "Backend Engineer",
        );
        assert_eq!(email.to, "candidate@example.com");
        assert_eq!(email.subject, "You have been shortlisted!");
        assert!(email.html_body.contains("Backend Engineer"));
    }
}

mod paging {
    use super::*;

    #[test]
    fn page_two_of_twenty_covers_records_21_to_40() {
        let params = ListParams {
            page: Some(2),
            limit: Some(20),
            ..Default::default()
        };
        let (page, limit, offset) = params.normalize();
        assert_eq!(page, 2);
        assert_eq!(limit, 20);
        assert_eq!(offset, 20); // rows 21..=40 of a newest-first ordering
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let params = ListParams {
            page: Some(-1),
            limit: Some(9999),
            ..Default::default()
        };
        let (page, limit, offset) = params.normalize();
        assert_eq!(page, 1);
        assert_eq!(limit, 100);
        assert_eq!(offset, 0);
    }
}

mod envelope {
    use super::*;

    #[test]
    fn list_envelope_carries_total_and_unread_meta() {
        let env = Envelope::ok("notifications fetched", json!([])).with_meta(PageMeta {
            page: 2,
            limit: 20,
            total: 45,
            unread_count: 12,
        });
        let body = serde_json::to_value(env).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["meta"]["total"], 45);
        assert_eq!(body["meta"]["page"], 2);
        assert_eq!(body["meta"]["unreadCount"], 12);
    }

    #[test]
    fn plain_envelope_has_no_meta_key() {
        let env = Envelope::ok("ok", json!({ "updated": 3 }));
        let body = serde_json::to_value(env).unwrap();
        assert_eq!(body["data"]["updated"], 3);
        assert!(body.get("meta").is_none());
    }
}
