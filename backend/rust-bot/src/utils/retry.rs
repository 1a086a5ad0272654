use std::fmt::Display;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter_max: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            jitter_max: Some(Duration::from_millis(250)),
        }
    }
}

impl RetryConfig {
    /// Webhook registration right after the tunnel comes up: the public
    /// hostname can take a few seconds to resolve on Telegram's side.
    pub fn webhook_registration() -> Self {
        Self {
            max_attempts: 6,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(16),
            jitter_max: Some(Duration::from_millis(500)),
        }
    }

    fn backoff_for(&self, attempt: usize) -> Duration {
        let factor = 1u32 << attempt.min(16) as u32;
        std::cmp::min(self.base_backoff.saturating_mul(factor), self.max_backoff)
    }

    fn jitter(&self) -> Duration {
        match self.jitter_max {
            Some(max) if !max.is_zero() => {
                let max_ms = max.as_millis() as u64;
                Duration::from_millis(rand::random::<u64>() % (max_ms + 1))
            }
            _ => Duration::ZERO,
        }
    }
}

/// Runs `f` until it succeeds or `max_attempts` is exhausted, sleeping with
/// exponential backoff plus jitter between attempts. `what` names the
/// operation in the logs.
pub async fn retry_async_with_config<F, Fut, T, E>(
    config: RetryConfig,
    what: &str,
    mut f: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempt += 1;
                if attempt >= config.max_attempts {
                    tracing::error!("{} failed after {} attempts: {}", what, attempt, e);
                    return Err(e);
                }

                let wait = config.backoff_for(attempt - 1) + config.jitter();
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}, retrying in {:?}",
                    what,
                    attempt,
                    config.max_attempts,
                    e,
                    wait
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}
