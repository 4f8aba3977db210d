use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// One outbound HTML email.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// A single delivery attempt against some mail backend.
///
/// The retry layer owns attempt counting and backoff; implementations make
/// exactly one transport call per invocation. Tests inject a scripted fake.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Returns the Message-ID handed to the server on success.
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<String>;
}

/// Production transport: pooled async SMTP via lettre.
///
/// Constructed once at startup and injected; there is no lazy global.
/// Dropping it closes the pool.
pub struct SmtpMailer {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let from: Mailbox = cfg
            .from_address
            .parse()
            .with_context(|| format!("invalid SMTP from address: {}", cfg.from_address))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .context("failed to configure SMTP relay")?
            .port(cfg.port)
            .timeout(Some(Duration::from_secs(cfg.timeout_secs)))
            .pool_config(PoolConfig::new().max_size(cfg.pool_size));

        if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            inner: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<String> {
        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4(), self.from.email.domain());

        let message = Message::builder()
            .from(self.from.clone())
            .to(email
                .to
                .parse()
                .with_context(|| format!("invalid recipient address: {}", email.to))?)
            .subject(email.subject.clone())
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .context("failed to build MIME message")?;

        self.inner.send(message).await.context("smtp send failed")?;
        Ok(message_id)
    }
}
