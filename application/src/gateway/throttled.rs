//! Concurrency-bounded, retrying decorator over any [`CompletionGateway`].
//!
//! Every outbound model call in the engine — agent turns, research query
//! generation, summarization, report synthesis — goes through one shared
//! instance of this gateway. A counting semaphore enforces the global
//! in-flight ceiling; callers beyond the ceiling suspend until a slot
//! frees. Rate-limit failures are retried with exponential backoff; any
//! other failure propagates immediately.

use crate::ports::completion_gateway::{ChatOptions, CompletionGateway, GatewayError};
use async_trait::async_trait;
use colloquy_domain::{CompletionMessage, Message, Model};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::warn;

/// At most this many calls are in flight at once, across all callers.
const MAX_IN_FLIGHT: usize = 2;

/// Retry policy for rate-limited calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt.
    pub max_retries: u32,
    /// Backoff is `base_delay * 2^attempt`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Rate-aware invocation gateway wrapping an inner provider adapter.
pub struct ThrottledGateway<G> {
    inner: G,
    permits: Arc<Semaphore>,
    policy: RetryPolicy,
}

impl<G: CompletionGateway> ThrottledGateway<G> {
    pub fn new(inner: G) -> Self {
        Self::with_policy(inner, RetryPolicy::default())
    }

    pub fn with_policy(inner: G, policy: RetryPolicy) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(MAX_IN_FLIGHT)),
            policy,
        }
    }
}

#[async_trait]
impl<G: CompletionGateway> CompletionGateway for ThrottledGateway<G> {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<CompletionMessage, GatewayError> {
        // The semaphore is never closed, but avoid unwrap on principle.
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GatewayError::ConnectionError("gateway shut down".to_string()))?;

        let mut attempt = 0;
        loop {
            match self.inner.complete(model, messages, options).await {
                Err(GatewayError::RateLimited) if attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        model = %model,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Inner gateway that always rate-limits and counts attempts.
    struct AlwaysRateLimited {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionGateway for AlwaysRateLimited {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<CompletionMessage, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::RateLimited)
        }
    }

    /// Inner gateway that tracks concurrent in-flight calls.
    struct SlowGateway {
        in_flight: AtomicUsize,
        max_seen: AtomicUsize,
    }

    #[async_trait]
    impl CompletionGateway for SlowGateway {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<CompletionMessage, GatewayError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(CompletionMessage::text("ok"))
        }
    }

    /// Inner gateway that fails once with a non-retryable error.
    struct FailsHard;

    #[async_trait]
    impl CompletionGateway for FailsHard {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<CompletionMessage, GatewayError> {
            Err(GatewayError::RequestFailed("boom".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exactly_max_then_propagates() {
        let gateway = ThrottledGateway::with_policy(
            AlwaysRateLimited {
                calls: AtomicUsize::new(0),
            },
            RetryPolicy {
                max_retries: 5,
                base_delay: Duration::from_secs(1),
            },
        );

        let start = tokio::time::Instant::now();
        let result = gateway
            .complete(&Model::Gpt4oMini, &[Message::user("hi")], &ChatOptions::default())
            .await;

        assert!(matches!(result, Err(GatewayError::RateLimited)));
        // Initial attempt + 5 retries
        assert_eq!(gateway.inner.calls.load(Ordering::SeqCst), 6);
        // Backoff 1 + 2 + 4 + 8 + 16 = 31s, strictly increasing per attempt
        assert_eq!(start.elapsed(), Duration::from_secs(31));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_strictly_increase() {
        let policy = RetryPolicy::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..5 {
            let delay = policy.delay_for(attempt);
            assert!(delay > previous);
            previous = delay;
        }
    }

    #[tokio::test]
    async fn test_non_rate_limit_errors_propagate_immediately() {
        let gateway = ThrottledGateway::new(FailsHard);
        let result = gateway
            .complete(&Model::Gpt4oMini, &[Message::user("hi")], &ChatOptions::default())
            .await;
        assert!(matches!(result, Err(GatewayError::RequestFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_ceiling_is_enforced() {
        let gateway = Arc::new(ThrottledGateway::new(SlowGateway {
            in_flight: AtomicUsize::new(0),
            max_seen: AtomicUsize::new(0),
        }));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                gateway
                    .complete(&Model::Gpt4oMini, &[Message::user("hi")], &ChatOptions::default())
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert!(gateway.inner.max_seen.load(Ordering::SeqCst) <= 2);
    }
}
