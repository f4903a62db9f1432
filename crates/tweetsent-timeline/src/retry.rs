//! Rate-limit cooldown for timeline requests.
//!
//! [`retry_on_rate_limit`] wraps a single page request. A
//! [`TimelineError::RateLimited`] result triggers one fixed cooldown through
//! the injected [`Sleeper`] and the same request is issued again; attempts are
//! unbounded. Every other result, success or failure, is returned as is.

use std::future::Future;
use std::time::Duration;

use crate::error::TimelineError;

/// Fixed wait observed after every rate-limit signal.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(15 * 60);

/// Suspension point used by the paginator, injectable so tests do not wait.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How long to wait after the platform signals rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub cooldown: Duration,
}

impl CooldownPolicy {
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self {
            cooldown: Duration::from_secs(secs),
        }
    }
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

/// Runs `operation` until it returns anything other than
/// [`TimelineError::RateLimited`], sleeping `policy.cooldown` between tries.
pub(crate) async fn retry_on_rate_limit<T, F, Fut, Z>(
    policy: CooldownPolicy,
    sleeper: &Z,
    account: &str,
    mut operation: F,
) -> Result<T, TimelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TimelineError>>,
    Z: Sleeper + ?Sized,
{
    let mut cooldowns = 0u32;
    loop {
        match operation().await {
            Err(TimelineError::RateLimited { .. }) => {
                cooldowns = cooldowns.saturating_add(1);
                tracing::warn!(
                    account,
                    cooldowns,
                    cooldown_secs = policy.cooldown.as_secs(),
                    "rate limited by platform; cooling down before retrying the same cursor"
                );
                sleeper.sleep(policy.cooldown).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    #[async_trait::async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    fn rate_limited() -> TimelineError {
        TimelineError::RateLimited {
            account: "ossoff".to_owned(),
        }
    }

    #[test]
    fn default_cooldown_is_fifteen_minutes() {
        assert_eq!(CooldownPolicy::default().cooldown, Duration::from_secs(900));
    }

    #[tokio::test]
    async fn succeeds_immediately_without_sleeping() {
        let sleeper = RecordingSleeper::default();
        let result = retry_on_rate_limit(CooldownPolicy::default(), &sleeper, "ossoff", || async {
            Ok::<u32, TimelineError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sleeps_once_per_rate_limit_then_succeeds() {
        let sleeper = RecordingSleeper::default();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_on_rate_limit(CooldownPolicy::from_secs(60), &sleeper, "ossoff", || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, TimelineError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            *sleeper.slept.lock().unwrap(),
            vec![Duration::from_secs(60); 3]
        );
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let sleeper = RecordingSleeper::default();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_on_rate_limit(CooldownPolicy::default(), &sleeper, "ossoff", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TimelineError::Api {
                    status: 401,
                    message: "Not authorized.".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(TimelineError::Api { status: 401, .. })));
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }
}
