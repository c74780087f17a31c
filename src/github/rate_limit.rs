//! Rate limit budget observed from the GitHub API.
//!
//! The census only observes the budget: it is logged before each repository
//! and used to size the single wait after a primary rate limit response. No
//! admission control is applied based on it.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Rate limit information reported by GitHub.
///
/// # Example
///
/// ```
/// use boardcensus::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 4999, 1700000000);
/// assert!(!info.is_exhausted());
/// assert_eq!(info.remaining(), 4999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests (or points) allowed in the current window.
    limit: u32,
    /// Remaining requests (or points) in the current window.
    remaining: u32,
    /// Unix timestamp when the rate limit resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Builds rate limit info from a reset instant as reported by GraphQL.
    ///
    /// Instants before the Unix epoch clamp to zero.
    #[must_use]
    pub fn from_reset_time(limit: u32, remaining: u32, reset_at: DateTime<Utc>) -> Self {
        let reset_seconds = u64::try_from(reset_at.timestamp()).unwrap_or(0);
        Self::new(limit, remaining, reset_seconds)
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the rate limit resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true if the rate limit has been exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Calculates seconds until the rate limit resets.
    ///
    /// Returns 0 if the reset time has already passed.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        self.seconds_until_reset_from(Utc::now())
    }

    /// Calculates seconds until the rate limit resets relative to `now`.
    #[must_use]
    pub fn seconds_until_reset_from(&self, now: DateTime<Utc>) -> u64 {
        let now_seconds = u64::try_from(now.timestamp()).unwrap_or(0);
        self.reset_at.saturating_sub(now_seconds)
    }

    /// Returns how long to wait before the window resets, plus one second of
    /// slack so the retry lands after the reset rather than on it.
    #[must_use]
    pub fn wait_until_reset(&self) -> Duration {
        Duration::from_secs(self.seconds_until_reset().saturating_add(1))
    }
}
