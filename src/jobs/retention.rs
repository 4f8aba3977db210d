//! Background job: retention sweep for old notifications.
//!
//! Runs hourly. Physically deletes read, non-deleted records older than the
//! configured window (default 90 days). Soft-deleted records are retained
//! for audit and never touched here.

use std::time::Duration;

use tokio::time;

use crate::store::PgStore;

/// Spawn the background retention task. Call this once at startup.
pub fn spawn(store: PgStore, retention_days: i32) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(3600)); // every hour
        loop {
            interval.tick().await;
            match store.purge_read_older_than_days(retention_days).await {
                Ok(0) => {}
                Ok(rows) => {
                    tracing::info!(rows, "purged read notifications past retention window")
                }
                Err(e) => tracing::error!("retention sweep failed: {}", e),
            }
        }
    });
}
