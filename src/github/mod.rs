//! GitHub GraphQL query layer used by the census.
//!
//! This module wraps Octocrab behind the [`GraphqlTransport`] seam, applies
//! the rate limit retry policy in [`RateLimitedClient`], walks cursor
//! pagination with [`CursorPaginator`], and parses responses into typed
//! results. Errors are mapped into [`CensusError`] variants so callers can
//! tell throttling, transport failures, and malformed responses apart without
//! seeing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod pagination;
pub mod queries;
pub mod query_client;
pub mod rate_limit;

pub use error::CensusError;
pub use gateway::{GraphqlRequest, GraphqlTransport, OctocrabTransport};
pub use locator::{OrganisationName, PersonalAccessToken, RepositoryName};
pub use pagination::{CursorPaginator, DEFAULT_MAX_PAGES, PageInfo};
pub use queries::{IssueNode, IssuesPage, ProjectNode, ProjectsList, RateBudget};
pub use query_client::{RateLimitedClient, RetryPolicy};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockGraphqlTransport;
