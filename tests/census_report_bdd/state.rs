//! Scenario state and census execution for the census report BDD tests.

use std::rc::Rc;
use std::time::Duration;

use boardcensus::github::locator::parse_api_base;
use boardcensus::{
    BatchDriver, CensusError, GraphqlCensusGateway, OctocrabTransport, OrganisationName,
    PersonalAccessToken, RateLimitedClient, RetryPolicy, read_repository_list, write_report_file,
};
use camino::Utf8PathBuf;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;
use wiremock::MockServer;

use super::runtime::SharedRuntime;

#[derive(ScenarioState, Default)]
pub(crate) struct CensusState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) workspace: Slot<Rc<TempDir>>,
    pub(crate) report: Slot<String>,
    pub(crate) skipped: Slot<Vec<String>>,
    pub(crate) retries: Slot<u64>,
}

impl CensusState {
    fn workspace_root(&self) -> Result<Utf8PathBuf, CensusError> {
        self.workspace
            .with_ref(|dir| Utf8PathBuf::from_path_buf(dir.path().to_path_buf()))
            .ok_or_else(|| CensusError::Configuration {
                message: "repository list has not been written".to_owned(),
            })?
            .map_err(|path| CensusError::Configuration {
                message: format!("workspace path is not UTF-8: {}", path.display()),
            })
    }

    /// Writes the repository list into a fresh temporary workspace.
    pub(crate) fn write_repository_list(&self, repos: &[&str]) -> Result<(), CensusError> {
        let dir = TempDir::new().map_err(|error| CensusError::Configuration {
            message: format!("failed to create workspace: {error}"),
        })?;
        std::fs::write(dir.path().join("repos.txt"), repos.join("\n")).map_err(|error| {
            CensusError::Configuration {
                message: format!("failed to write repository list: {error}"),
            }
        })?;
        self.workspace.set(Rc::new(dir));
        Ok(())
    }
}

/// Runs the census for `org` against the mock server and records the
/// report, skipped repositories, and retry count.
pub(crate) fn run_census(state: &CensusState, org: &str) -> Result<(), CensusError> {
    let server_url = state
        .server
        .with_ref(MockServer::uri)
        .ok_or_else(|| CensusError::InvalidUrl("mock server URL missing".to_owned()))?;
    let runtime = state.runtime.get().ok_or_else(|| CensusError::Transport {
        message: "runtime not initialised".to_owned(),
    })?;
    let root = state.workspace_root()?;
    let report_path = root.join("out/report.csv");

    let org_name = OrganisationName::new(org)?;
    let repos = read_repository_list(&org_name, &root.join("repos.txt"))?;
    let token = PersonalAccessToken::new("ghp_example")?;
    let api_base = parse_api_base(Some(&server_url))?;

    let (outcome, retries) = runtime.block_on(async {
        let transport = OctocrabTransport::for_token(&token, &api_base, Duration::from_secs(5))?;
        let client = RateLimitedClient::new(transport, RetryPolicy::default());
        let gateway = GraphqlCensusGateway::new(&client, 100, 10);
        let outcome = BatchDriver::new(&gateway).run(&org_name, &repos).await;
        Ok::<_, CensusError>((outcome, client.retries()))
    })?;

    write_report_file(&report_path, &org_name, outcome.summaries())?;
    let report = std::fs::read_to_string(&report_path).map_err(|error| CensusError::Write {
        message: format!("failed to read report back: {error}"),
    })?;

    state.report.set(report);
    state.skipped.set(
        outcome
            .failures()
            .iter()
            .map(|failure| failure.repo_name().to_string())
            .collect(),
    );
    state.retries.set(retries);
    Ok(())
}
