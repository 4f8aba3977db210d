use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::smtp::{EmailTransport, OutgoingEmail};

/// Up to one second of random jitter is added to every backoff delay.
pub const JITTER_MS: u64 = 1000;

/// Retry knobs for outbound email. `max_retries = 3` means four tries total.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

/// Backoff before retrying the 0-indexed attempt `n`:
/// `min(base * 2^n, max)` plus jitter so a burst of failures does not
/// hammer the mail server in lockstep.
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let raw = config.base_delay_ms as f64 * 2_f64.powi(attempt as i32);
    let capped = raw.min(config.max_delay_ms as f64);
    let jitter = rand::thread_rng().gen_range(0..=JITTER_MS);
    Duration::from_millis(capped as u64 + jitter)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered { message_id: String },
    Failed { error: String },
}

/// What happened to one email, after all retries. Never an `Err`: delivery
/// failure must not disturb the caller's persistence path.
#[derive(Debug, Clone)]
pub struct SendReport {
    pub outcome: SendOutcome,
    pub attempts: u32,
}

impl SendReport {
    pub fn delivered(&self) -> bool {
        matches!(self.outcome, SendOutcome::Delivered { .. })
    }
}

/// Retrying façade over an [`EmailTransport`]. Cheap to clone; the underlying
/// transport (and its connection pool) is shared.
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn EmailTransport>,
    retry: RetryConfig,
}

impl Mailer {
    pub fn new(transport: Arc<dyn EmailTransport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Sends one email, retrying per config with exponential backoff.
    ///
    /// Exactly one transport call per attempt, no deduplication: if the
    /// server accepts a message but the response is lost, a retry may send a
    /// duplicate. Accepted limitation of best-effort delivery.
    pub async fn send_with_retry(&self, email: OutgoingEmail) -> SendReport {
        let total_tries = self.retry.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 0..total_tries {
            match self.transport.send(&email).await {
                Ok(message_id) => {
                    debug!(to = %email.to, attempts = attempt + 1, "email delivered");
                    return SendReport {
                        outcome: SendOutcome::Delivered { message_id },
                        attempts: attempt + 1,
                    };
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt + 1 < total_tries {
                        let wait = backoff_delay(&self.retry, attempt);
                        warn!(
                            to = %email.to,
                            attempt = attempt + 1,
                            total = total_tries,
                            error = %last_error,
                            "email send failed, retrying in {:?}",
                            wait
                        );
                        sleep(wait).await;
                    }
                }
            }
        }

        warn!(to = %email.to, attempts = total_tries, error = %last_error, "email send exhausted retries");
        SendReport {
            outcome: SendOutcome::Failed { error: last_error },
            attempts: total_tries,
        }
    }

    /// Fires the retrying send in a background task. The caller may await the
    /// handle for the report or drop it to detach.
    pub fn send_detached(&self, email: OutgoingEmail) -> JoinHandle<SendReport> {
        let mailer = self.clone();
        tokio::spawn(async move { mailer.send_with_retry(email).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `fail_first` attempts, then succeeds.
    struct FlakyTransport {
        fail_first: u32,
        calls: AtomicU32,
    }

    impl FlakyTransport {
        fn new(fail_first: u32) -> Self {
            Self {
                fail_first,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl EmailTransport for FlakyTransport {
        async fn send(&self, _email: &OutgoingEmail) -> anyhow::Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                anyhow::bail!("connection refused (attempt {})", call + 1);
            }
            Ok(format!("<msg-{}@test>", call + 1))
        }
    }

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 4,
        }
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "candidate@example.com".into(),
            subject: "subject".into(),
            html_body: "<p>body</p>".into(),
        }
    }

    #[tokio::test]
    async fn succeeds_first_try_with_one_attempt() {
        let mailer = Mailer::new(Arc::new(FlakyTransport::new(0)), fast_retry(3));
        let report = mailer.send_with_retry(email()).await;
        assert!(report.delivered());
        assert_eq!(report.attempts, 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        // Fails twice, succeeds on the third try (within the 4-try budget).
        let mailer = Mailer::new(Arc::new(FlakyTransport::new(2)), fast_retry(3));
        let report = mailer.send_with_retry(email()).await;
        assert!(report.delivered());
        assert_eq!(report.attempts, 3);
    }

    #[tokio::test]
    async fn exhausts_retries_and_reports_last_error() {
        let transport = Arc::new(FlakyTransport::new(u32::MAX));
        let mailer = Mailer::new(transport.clone(), fast_retry(3));
        let report = mailer.send_with_retry(email()).await;

        assert!(!report.delivered());
        assert_eq!(report.attempts, 4); // max_retries + 1
        assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
        match report.outcome {
            SendOutcome::Failed { ref error } => {
                assert!(error.contains("attempt 4"), "last error, not first: {error}");
            }
            _ => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn detached_send_yields_the_same_report_shape() {
        let mailer = Mailer::new(Arc::new(FlakyTransport::new(1)), fast_retry(3));
        let report = mailer.send_detached(email()).await.expect("task panicked");
        assert!(report.delivered());
        assert_eq!(report.attempts, 2);
    }

    #[test]
    fn backoff_is_exponential_capped_and_jittered() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 1600,
        };
        for attempt in 0..6 {
            let expected = (100u64 * 2u64.pow(attempt)).min(1600);
            let delay = backoff_delay(&config, attempt).as_millis() as u64;
            assert!(
                (expected..=expected + JITTER_MS).contains(&delay),
                "attempt {attempt}: {delay}ms outside [{expected}, {}]",
                expected + JITTER_MS
            );
        }
    }
}
