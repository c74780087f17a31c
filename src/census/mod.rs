//! Per-repository project census: aggregation, batch driving, and the
//! file adapters around it.

pub mod aggregate;
pub mod driver;
pub mod models;
pub mod repo_list;
pub mod report;

pub use aggregate::{ProjectTally, aggregate};
pub use driver::{BatchDriver, BatchOutcome, CensusGateway, GraphqlCensusGateway};
pub use models::{
    ProjectId, ProjectOccurrence, ProjectRef, RepositoryFailure, RepositoryState,
    RepositorySummary,
};
pub use repo_list::{parse_repository_list, read_repository_list};
pub use report::{DEFAULT_REPORT_PATH, REPORT_HEADER, write_report, write_report_file};

#[cfg(test)]
pub use driver::MockCensusGateway;
