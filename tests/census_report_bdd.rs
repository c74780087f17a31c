//! Behavioural tests for the project board census report.

#[path = "census_report_bdd/mod.rs"]
mod census_report_bdd_support;

use boardcensus::CensusError;
use census_report_bdd_support::runtime::mount;
use census_report_bdd_support::{
    CensusState, budget_mock, issues_page_mock, not_found_mock, rate_limit_status_mock,
    rate_limited_issues_mock, repository_projects_mock, run_census,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[fixture]
fn census_state() -> CensusState {
    CensusState::default()
}

#[given("a mock GitHub GraphQL API")]
fn seed_budget(census_state: &CensusState) {
    mount(&census_state.runtime, &census_state.server, budget_mock());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("repository {repo} has the roadmap issues spread over two pages")]
fn seed_roadmap_issues(census_state: &CensusState, repo: String) {
    for page in [1, 2] {
        mount(
            &census_state.runtime,
            &census_state.server,
            issues_page_mock(&repo, page),
        );
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("repository {repo} has {count:u64} linked projects")]
fn seed_repository_projects(census_state: &CensusState, repo: String, count: u64) {
    mount(
        &census_state.runtime,
        &census_state.server,
        repository_projects_mock(&repo, count),
    );
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("repository {repo} cannot be found")]
fn seed_missing_repository(census_state: &CensusState, repo: String) {
    mount(&census_state.runtime, &census_state.server, not_found_mock(&repo));
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("the first issues query for {repo} is rate limited")]
fn seed_rate_limit(census_state: &CensusState, repo: String) {
    mount(
        &census_state.runtime,
        &census_state.server,
        rate_limited_issues_mock(&repo),
    );
    mount(&census_state.runtime, &census_state.server, rate_limit_status_mock());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a repository list containing {repos}")]
fn seed_repository_list(census_state: &CensusState, repos: String) -> Result<(), CensusError> {
    let names: Vec<&str> = repos.split(',').map(str::trim).collect();
    census_state.write_repository_list(&names)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the census runs for organisation {org}")]
fn run_the_census(census_state: &CensusState, org: String) -> Result<(), CensusError> {
    run_census(census_state, &org)
}

fn report(census_state: &CensusState) -> Result<String, CensusError> {
    census_state.report.get().ok_or_else(|| CensusError::Write {
        message: "report was not produced".to_owned(),
    })
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the report contains the row {row}")]
fn assert_row(census_state: &CensusState, row: String) -> Result<(), CensusError> {
    let report = report(census_state)?;
    if report.lines().any(|line| line == row) {
        Ok(())
    } else {
        Err(CensusError::Write {
            message: format!("row {row} missing from report:\n{report}"),
        })
    }
}

#[then("the report has {count:u64} data rows")]
fn assert_row_count(census_state: &CensusState, count: u64) -> Result<(), CensusError> {
    let report = report(census_state)?;
    let rows = u64::try_from(report.lines().skip(1).count()).unwrap_or(u64::MAX);
    if rows == count {
        Ok(())
    } else {
        Err(CensusError::Write {
            message: format!("expected {count} data rows but found {rows}:\n{report}"),
        })
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("repository {repo} is reported as skipped")]
fn assert_skipped(census_state: &CensusState, repo: String) -> Result<(), CensusError> {
    let skipped = census_state.skipped.get().unwrap_or_default();
    if skipped.contains(&repo) {
        Ok(())
    } else {
        Err(CensusError::Transport {
            message: format!("expected {repo} to be skipped, skipped were {skipped:?}"),
        })
    }
}

#[then("{count:u64} rate limit retries were performed")]
fn assert_retries(census_state: &CensusState, count: u64) -> Result<(), CensusError> {
    let retries = census_state.retries.get().unwrap_or_default();
    if retries == count {
        Ok(())
    } else {
        Err(CensusError::Transport {
            message: format!("expected {count} retries but observed {retries}"),
        })
    }
}

#[scenario(path = "tests/features/census_report.feature", index = 0)]
fn linked_issues_are_counted(census_state: CensusState) {
    let _ = census_state;
}

#[scenario(path = "tests/features/census_report.feature", index = 1)]
fn failing_repository_is_skipped(census_state: CensusState) {
    let _ = census_state;
}

#[scenario(path = "tests/features/census_report.feature", index = 2)]
fn primary_rate_limit_is_retried_once(census_state: CensusState) {
    let _ = census_state;
}
