//! Octocrab implementation of the GraphQL transport.

use std::time::Duration;

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::Value;
use url::Url;

use crate::github::error::CensusError;
use crate::github::locator::PersonalAccessToken;
use crate::github::rate_limit::RateLimitInfo;

use super::client::build_octocrab_client;
use super::error_mapping::{
    into_data, is_rate_limit_error, is_secondary_rate_limit_error, map_octocrab_error,
};
use super::{GraphqlRequest, GraphqlTransport};

const OPERATION: &str = "graphql query";

/// Octocrab-backed GraphQL transport with a per-call timeout.
pub struct OctocrabTransport {
    client: Octocrab,
    timeout: Duration,
}

impl OctocrabTransport {
    /// Creates a new transport from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds an authenticated transport for the given API base.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::InvalidUrl` when the base URI cannot be parsed or
    /// `CensusError::Transport` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &Url,
        timeout: Duration,
    ) -> Result<Self, CensusError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab, timeout))
    }

    async fn map_octocrab_error_with_rate_limit(&self, error: &octocrab::Error) -> CensusError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_secondary_rate_limit_error(source) => {
                CensusError::SecondaryRateLimit {
                    message: format!("{OPERATION} failed: {message}", message = source.message),
                }
            }
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let message = format!("{OPERATION} failed: {message}", message = source.message);
                self.primary_limit_with_reset(message).await
            }
            _ => map_octocrab_error(OPERATION, error),
        }
    }

    async fn primary_limit_with_reset(&self, message: String) -> CensusError {
        let rate_limit = self.fetch_rate_limit_info().await;
        let reset = rate_limit
            .map(|info| format!(" (resets at {reset})", reset = info.reset_at()))
            .unwrap_or_default();
        CensusError::PrimaryRateLimit {
            rate_limit,
            message: format!("{message}{reset}"),
        }
    }

    /// Reads the GraphQL budget, falling back to the overall rate when the
    /// server does not report a separate GraphQL bucket.
    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let response = tokio::time::timeout(self.timeout, self.client.ratelimit().get())
            .await
            .ok()?
            .ok()?;
        let rate = response.resources.graphql.unwrap_or(response.rate);
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}

#[async_trait]
impl GraphqlTransport for OctocrabTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, CensusError> {
        let Ok(response) =
            tokio::time::timeout(self.timeout, self.client.graphql::<Value>(request)).await
        else {
            return Err(CensusError::Transport {
                message: format!(
                    "{OPERATION} timed out after {timeout:?}",
                    timeout = self.timeout
                ),
            });
        };

        match response {
            Ok(body) => match into_data(OPERATION, body) {
                Err(CensusError::PrimaryRateLimit {
                    rate_limit: None,
                    message,
                }) => Err(self.primary_limit_with_reset(message).await),
                other => other,
            },
            Err(error) => Err(self.map_octocrab_error_with_rate_limit(&error).await),
        }
    }
}
