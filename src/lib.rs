//! Boardcensus library crate: a GitHub organisation project board census.
//!
//! For each repository in a list, the census counts the issues linked to at
//! least one project board, the distinct boards those issues reference, and
//! the boards linked to the repository itself, then writes a CSV report.
//!
//! Queries go through a rate limited GraphQL client that waits out one
//! primary rate limit per call, follows cursor pagination up to a page
//! ceiling, and parses responses into typed results. A failing repository is
//! skipped without aborting the batch.

pub mod census;
pub mod config;
pub mod github;
pub mod logging;

pub use census::{
    BatchDriver, BatchOutcome, CensusGateway, GraphqlCensusGateway, ProjectTally,
    RepositoryFailure, RepositoryState, RepositorySummary, aggregate, read_repository_list,
    write_report, write_report_file,
};
pub use config::BoardcensusConfig;
pub use github::{
    CensusError, CursorPaginator, OctocrabTransport, OrganisationName, PersonalAccessToken,
    RateLimitedClient, RepositoryName, RetryPolicy,
};
