//! Error types exposed by the census and its GitHub query layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while loading configuration, querying GitHub, or writing
/// the report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CensusError {
    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// An organisation or repository name was blank or malformed.
    #[error("invalid name: {message}")]
    InvalidName {
        /// Description of the rejected name.
        message: String,
    },

    /// The API base URL could not be parsed.
    #[error("API URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// Networking, timeout, or API failure not covered by throttling.
    #[error("GitHub request failed: {message}")]
    Transport {
        /// Transport-level or API error detail.
        message: String,
    },

    /// The primary (quota) rate limit was exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    PrimaryRateLimit {
        /// Rate limit info if it could be fetched after the failure.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// GitHub's secondary (abuse detection) rate limit was triggered.
    #[error("GitHub secondary rate limit triggered: {message}")]
    SecondaryRateLimit {
        /// Error message from GitHub.
        message: String,
    },

    /// The paginated query did not finish within the page ceiling.
    #[error("pagination did not finish within {max_pages} pages")]
    PaginationExhausted {
        /// The configured page ceiling.
        max_pages: u32,
    },

    /// A response did not have the shape the query layer expects.
    #[error("unexpected response shape: {message}")]
    SchemaMismatch {
        /// Description of the missing or malformed field.
        message: String,
    },

    /// The report could not be written.
    #[error("failed to write report: {message}")]
    Write {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl CensusError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
