//! Fixed-delay retry for HTTP API calls

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Attempt count and pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause after each failed attempt (milliseconds)
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` attempts have failed.
///
/// Every failed attempt is logged at warn level, the last one included. The
/// last error is returned unchanged.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    "{} failed, giving up",
                    label
                );
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    delay_ms = policy.delay_ms,
                    "{} failed, retrying",
                    label
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
        }
    }
}
