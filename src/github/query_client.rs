//! GraphQL client applying the census retry policy on top of a transport.
//!
//! A primary rate limit is waited out once, using the reset time GitHub
//! reports, and the identical request is reissued. A second consecutive
//! primary limit for the same call is surfaced as a transport failure. A
//! secondary (abuse detection) limit is never retried: it is logged and
//! returned so the caller can back off at repository granularity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;

use super::error::CensusError;
use super::gateway::{GraphqlRequest, GraphqlTransport};
use super::rate_limit::RateLimitInfo;

/// Wait applied when a primary rate limit arrives without reset information.
pub const DEFAULT_FALLBACK_WAIT: Duration = Duration::from_secs(60);

/// Longest wait the client accepts before giving up on a primary limit.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(3600);

/// How long the client is prepared to wait out a primary rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_wait: Duration,
    fallback_wait: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given wait ceiling and fallback wait.
    #[must_use]
    pub const fn new(max_wait: Duration, fallback_wait: Duration) -> Self {
        Self {
            max_wait,
            fallback_wait,
        }
    }

    /// The longest wait this policy accepts.
    #[must_use]
    pub const fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Returns the wait before retrying, or `None` when the reset is further
    /// away than the ceiling.
    #[must_use]
    pub fn wait_for(&self, rate_limit: Option<&RateLimitInfo>) -> Option<Duration> {
        let wait = rate_limit.map_or(self.fallback_wait, RateLimitInfo::wait_until_reset);
        (wait <= self.max_wait).then_some(wait)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WAIT, DEFAULT_FALLBACK_WAIT)
    }
}

/// Query client owning the transport and the retry policy.
///
/// Construct one per run and pass it by reference to every component that
/// issues queries.
pub struct RateLimitedClient<T> {
    transport: T,
    policy: RetryPolicy,
    retries: AtomicU64,
}

impl<T> RateLimitedClient<T>
where
    T: GraphqlTransport,
{
    /// Wraps a transport with the given retry policy.
    #[must_use]
    pub const fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            retries: AtomicU64::new(0),
        }
    }

    /// Number of primary rate limit retries performed so far.
    #[must_use]
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Execute a request, waiting out at most one primary rate limit.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::Transport` when the primary limit persists after
    /// the retry or its reset exceeds the wait ceiling,
    /// `CensusError::SecondaryRateLimit` when abuse detection triggers, and
    /// any other transport failure unchanged.
    pub async fn execute(&self, request: &GraphqlRequest) -> Result<Value, CensusError> {
        match self.transport.execute(request).await {
            Err(CensusError::PrimaryRateLimit {
                rate_limit,
                message,
            }) => {
                self.retry_after_primary_limit(request, rate_limit.as_ref(), &message)
                    .await
            }
            Err(CensusError::SecondaryRateLimit { message }) => {
                Err(secondary_limit_surfaced(message))
            }
            other => other,
        }
    }

    async fn retry_after_primary_limit(
        &self,
        request: &GraphqlRequest,
        rate_limit: Option<&RateLimitInfo>,
        message: &str,
    ) -> Result<Value, CensusError> {
        let Some(wait) = self.policy.wait_for(rate_limit) else {
            return Err(CensusError::Transport {
                message: format!(
                    "{message}; reset is further away than the {max:?} wait ceiling",
                    max = self.policy.max_wait()
                ),
            });
        };

        tracing::warn!("primary rate limit hit, retrying once in {wait:?}: {message}");
        tokio::time::sleep(wait).await;
        self.retries.fetch_add(1, Ordering::Relaxed);

        match self.transport.execute(request).await {
            Err(CensusError::PrimaryRateLimit {
                message: retry_message,
                ..
            }) => Err(CensusError::Transport {
                message: format!("primary rate limit persisted after retry: {retry_message}"),
            }),
            Err(CensusError::SecondaryRateLimit {
                message: retry_message,
            }) => Err(secondary_limit_surfaced(retry_message)),
            other => other,
        }
    }
}

fn secondary_limit_surfaced(message: String) -> CensusError {
    tracing::warn!("secondary rate limit hit, not retrying: {message}");
    CensusError::SecondaryRateLimit { message }
}
