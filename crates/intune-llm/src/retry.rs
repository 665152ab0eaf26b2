//! Exponential backoff for chat completion calls.
//!
//! Retries live here, in the collaborator's transport, and never in the
//! pipeline core.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{LlmError, Result};
use crate::provider::ChatProvider;
use crate::types::{ChatRequest, ChatResponse};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Up to this fraction of the delay is added as random jitter.
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter_fraction: 0.25,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Delay before retry `attempt` (0-indexed): `min(base * 2^n, max)` plus
/// jitter.
pub fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base_ms = config.base_delay.as_millis() as u64;
    let capped_ms = base_ms
        .saturating_mul(2u64.saturating_pow(attempt))
        .min(config.max_delay.as_millis() as u64);

    let jitter_max_ms = (capped_ms as f64 * config.jitter_fraction) as u64;
    let jitter_ms = if jitter_max_ms > 0 {
        rand::thread_rng().gen_range(0..=jitter_max_ms)
    } else {
        0
    };
    Duration::from_millis(capped_ms + jitter_ms)
}

/// Wraps a provider and retries transient failures.
pub struct RetryPolicy<P> {
    inner: P,
    config: RetryConfig,
}

impl<P: ChatProvider> RetryPolicy<P> {
    pub fn new(inner: P, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: ChatProvider> ChatProvider for RetryPolicy<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let mut attempt = 0;
        loop {
            let err = match self.inner.complete(request).await {
                Ok(response) => {
                    if attempt > 0 {
                        debug!(provider = %self.inner.name(), attempt, "succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(err) => err,
            };

            if !err.is_transient() || attempt >= self.config.max_retries {
                return Err(err);
            }

            let mut delay = compute_delay(&self.config, attempt);
            if let LlmError::RateLimited { retry_after_ms } = &err {
                delay = delay.max(Duration::from_millis(*retry_after_ms));
            }

            warn!(
                provider = %self.inner.name(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying after transient error"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, Choice};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the queued errors, then succeeds.
    struct Scripted {
        failures: Mutex<Vec<LlmError>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(failures: Vec<LlmError>) -> Self {
            Self {
                failures: Mutex::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = {
                let mut failures = self.failures.lock().unwrap();
                if failures.is_empty() {
                    None
                } else {
                    Some(failures.remove(0))
                }
            };
            match next {
                Some(err) => Err(err),
                None => Ok(ChatResponse {
                    id: "ok".into(),
                    choices: vec![Choice {
                        index: 0,
                        message: ChatMessage::assistant("done"),
                        finish_reason: Some("stop".into()),
                    }],
                    usage: None,
                    model: "m".into(),
                }),
            }
        }
    }

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter_fraction: 0.0,
        }
    }

    fn request() -> ChatRequest {
        ChatRequest::new("m", vec![ChatMessage::user("hi")])
    }

    #[test]
    fn delay_grows_and_caps() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
            jitter_fraction: 0.0,
        };
        assert_eq!(compute_delay(&config, 0).as_millis(), 100);
        assert_eq!(compute_delay(&config, 1).as_millis(), 200);
        assert_eq!(compute_delay(&config, 2).as_millis(), 350);
    }

    #[test]
    fn jitter_is_bounded() {
        let config = RetryConfig {
            jitter_fraction: 0.5,
            base_delay: Duration::from_millis(100),
            ..RetryConfig::default()
        };
        for _ in 0..50 {
            let ms = compute_delay(&config, 0).as_millis();
            assert!((100..=150).contains(&ms), "delay {ms} out of bounds");
        }
    }

    #[tokio::test]
    async fn retries_transient_then_succeeds() {
        let inner = Scripted::new(vec![
            LlmError::Status { status: 503, body: String::new() },
            LlmError::Timeout,
        ]);
        let policy = RetryPolicy::new(inner, fast());
        let response = policy.complete(&request()).await.unwrap();
        assert_eq!(response.first_text(), Some("done"));
        assert_eq!(policy.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_not_retried() {
        let inner = Scripted::new(vec![LlmError::AuthFailed("bad key".into())]);
        let policy = RetryPolicy::new(inner, fast());
        let err = policy.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthFailed(_)));
        assert_eq!(policy.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let inner = Scripted::new(vec![
            LlmError::Timeout,
            LlmError::Timeout,
            LlmError::Timeout,
            LlmError::Timeout,
        ]);
        let policy = RetryPolicy::new(inner, fast());
        let err = policy.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout));
        assert_eq!(policy.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_hint_extends_delay() {
        let inner = Scripted::new(vec![LlmError::RateLimited {
            retry_after_ms: 2_000,
        }]);
        let policy = RetryPolicy::new(inner, fast());
        let started = tokio::time::Instant::now();
        policy.complete(&request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2_000));
    }
}
