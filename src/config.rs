use crate::mailer::RetryConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Guards the announcement broadcast endpoint. Unset = endpoint disabled.
    pub admin_key: Option<String>,
    pub smtp: SmtpConfig,
    pub email_retry: RetryConfig,
    /// Read, non-deleted notifications older than this are purged hourly.
    pub retention_days: i32,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub pool_size: u32,
    /// Connection and greeting timeout for the pooled transport.
    pub timeout_secs: u64,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    Ok(Config {
        port: env_parsed("HIREWIRE_PORT", 8080),
        database_url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/hirewire".into()),
        admin_key: std::env::var("HIREWIRE_ADMIN_KEY").ok(),
        smtp: SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".into()),
            port: env_parsed("SMTP_PORT", 587),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "HireWire <no-reply@hirewire.example>".into()),
            pool_size: env_parsed("SMTP_POOL_SIZE", 4),
            timeout_secs: env_parsed("SMTP_TIMEOUT_SECS", 10),
        },
        email_retry: RetryConfig {
            max_retries: env_parsed("HIREWIRE_EMAIL_MAX_RETRIES", 3),
            base_delay_ms: env_parsed("HIREWIRE_EMAIL_BASE_DELAY_MS", 1000),
            max_delay_ms: env_parsed("HIREWIRE_EMAIL_MAX_DELAY_MS", 30_000),
        },
        retention_days: env_parsed("HIREWIRE_RETENTION_DAYS", 90),
    })
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
