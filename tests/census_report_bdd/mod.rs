//! Support modules for the census report BDD tests.

pub(crate) mod harness;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use harness::{
    budget_mock, issues_page_mock, not_found_mock, rate_limit_status_mock, rate_limited_issues_mock,
    repository_projects_mock,
};
pub(crate) use state::{CensusState, run_census};
