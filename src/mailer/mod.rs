pub mod retry;
pub mod smtp;

pub use retry::{backoff_delay, Mailer, RetryConfig, SendOutcome, SendReport};
pub use smtp::{EmailTransport, OutgoingEmail, SmtpMailer};
