//! HireWire notification service.
//!
//! Persists per-user notifications for the job portal and delivers
//! best-effort companion emails with retry. Library crate so integration
//! tests in `tests/` can exercise the pieces directly.

pub mod api;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod mailer;
pub mod models;
pub mod notify;
pub mod store;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub db: store::PgStore,
    pub notifier: notify::NotificationService,
    pub config: config::Config,
}
