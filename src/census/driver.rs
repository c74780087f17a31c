//! Runs the census over a list of repositories.
//!
//! Each repository moves through [`RepositoryState`] on its own, with fresh
//! aggregation state. A failure while fetching is recorded as a
//! [`RepositoryFailure`] and the batch moves on to the next repository.

use async_trait::async_trait;

use crate::github::error::CensusError;
use crate::github::gateway::GraphqlTransport;
use crate::github::locator::{OrganisationName, RepositoryName};
use crate::github::pagination::CursorPaginator;
use crate::github::queries::{
    IssuesPage, ProjectsList, RateBudget, issues_request, rate_budget_request,
    repository_projects_request,
};
use crate::github::query_client::RateLimitedClient;

use super::aggregate::aggregate;
use super::models::{RepositoryFailure, RepositoryState, RepositorySummary};

/// Queries the census needs from GitHub.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CensusGateway: Send + Sync {
    /// Remaining call budget for the token.
    async fn rate_budget(&self) -> Result<RateBudget, CensusError>;

    /// All issues of `repo` with their linked boards, merged across pages.
    async fn fetch_issues(
        &self,
        org: &OrganisationName,
        repo: &RepositoryName,
    ) -> Result<IssuesPage, CensusError>;

    /// Number of boards linked to `repo` itself.
    async fn repository_project_count(
        &self,
        org: &OrganisationName,
        repo: &RepositoryName,
    ) -> Result<u64, CensusError>;
}

/// [`CensusGateway`] backed by the rate limited GraphQL client.
pub struct GraphqlCensusGateway<'client, T> {
    client: &'client RateLimitedClient<T>,
    page_size: u32,
    max_pages: u32,
}

impl<'client, T> GraphqlCensusGateway<'client, T>
where
    T: GraphqlTransport,
{
    /// Creates a gateway issuing issue queries `page_size` at a time and
    /// giving up after `max_pages` pages.
    #[must_use]
    pub const fn new(client: &'client RateLimitedClient<T>, page_size: u32, max_pages: u32) -> Self {
        Self {
            client,
            page_size,
            max_pages,
        }
    }
}

#[async_trait]
impl<T> CensusGateway for GraphqlCensusGateway<'_, T>
where
    T: GraphqlTransport,
{
    async fn rate_budget(&self) -> Result<RateBudget, CensusError> {
        let data = self.client.execute(&rate_budget_request()).await?;
        RateBudget::parse(&data)
    }

    async fn fetch_issues(
        &self,
        org: &OrganisationName,
        repo: &RepositoryName,
    ) -> Result<IssuesPage, CensusError> {
        let paginator = CursorPaginator::new(self.client, self.max_pages);
        let merged = paginator
            .paginate(&issues_request(org, repo, self.page_size))
            .await?;
        IssuesPage::parse(&merged)
    }

    async fn repository_project_count(
        &self,
        org: &OrganisationName,
        repo: &RepositoryName,
    ) -> Result<u64, CensusError> {
        let data = self
            .client
            .execute(&repository_projects_request(org, repo))
            .await?;
        ProjectsList::parse(&data).map(|projects| projects.total_count())
    }
}

/// Rows produced by a batch run and the repositories it skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    summaries: Vec<RepositorySummary>,
    failures: Vec<RepositoryFailure>,
}

impl BatchOutcome {
    /// Summaries in input order.
    #[must_use]
    pub fn summaries(&self) -> &[RepositorySummary] {
        &self.summaries
    }

    /// Skipped repositories in input order.
    #[must_use]
    pub fn failures(&self) -> &[RepositoryFailure] {
        &self.failures
    }
}

/// Applies the census to each repository in turn.
pub struct BatchDriver<'gateway, G> {
    gateway: &'gateway G,
}

impl<'gateway, G> BatchDriver<'gateway, G>
where
    G: CensusGateway,
{
    /// Creates a driver issuing queries through `gateway`.
    #[must_use]
    pub const fn new(gateway: &'gateway G) -> Self {
        Self { gateway }
    }

    /// Processes `repos` sequentially, in order.
    ///
    /// Failing repositories are logged and recorded in
    /// [`BatchOutcome::failures`]; they never stop the batch.
    pub async fn run(&self, org: &OrganisationName, repos: &[RepositoryName]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (position, repo) in repos.iter().enumerate() {
            tracing::info!(
                "processing {org}/{repo} ({current}/{total})",
                current = position + 1,
                total = repos.len()
            );
            match self.process_repository(org, repo).await {
                Ok(summary) => outcome.summaries.push(summary),
                Err(failure) => {
                    tracing::warn!("skipping repository: {failure}");
                    outcome.failures.push(failure);
                }
            }
        }

        tracing::info!(
            "census finished: {done} repositories summarised, {skipped} skipped",
            done = outcome.summaries.len(),
            skipped = outcome.failures.len()
        );
        outcome
    }

    async fn process_repository(
        &self,
        org: &OrganisationName,
        repo: &RepositoryName,
    ) -> Result<RepositorySummary, RepositoryFailure> {
        transition(repo, RepositoryState::Pending);
        self.log_rate_budget().await;

        transition(repo, RepositoryState::FetchingIssues);
        let page = self
            .gateway
            .fetch_issues(org, repo)
            .await
            .map_err(|error| fail(repo, RepositoryState::FetchingIssues, error))?;

        transition(repo, RepositoryState::Aggregating);
        let tally = aggregate(&page);
        tracing::info!(
            "{repo}: {linked} of {scanned} issues linked to {unique} unique projects",
            linked = tally.issues_with_projects(),
            scanned = tally.issues_scanned(),
            unique = tally.unique_projects()
        );
        if !tally.occurrences().is_empty() {
            tracing::info!("{repo}: projects: {list}", list = tally.project_list());
        }

        transition(repo, RepositoryState::FetchingRepoProjects);
        let repo_projects = self
            .gateway
            .repository_project_count(org, repo)
            .await
            .map_err(|error| fail(repo, RepositoryState::FetchingRepoProjects, error))?;
        tracing::info!("{repo}: {repo_projects} projects linked to the repository");

        transition(repo, RepositoryState::Done);
        Ok(RepositorySummary::new(
            repo.clone(),
            tally.issues_with_projects(),
            tally.unique_projects(),
            repo_projects,
        ))
    }

    async fn log_rate_budget(&self) {
        match self.gateway.rate_budget().await {
            Ok(budget) => {
                tracing::info!(
                    "rate budget: {remaining}/{limit} remaining, resets at {reset}",
                    remaining = budget.remaining(),
                    limit = budget.limit(),
                    reset = budget.reset_at()
                );
                let info = budget.to_rate_limit_info();
                if info.is_exhausted() {
                    tracing::warn!(
                        "rate budget exhausted; next call waits about {wait}s for the reset",
                        wait = info.seconds_until_reset()
                    );
                }
            }
            Err(error) => tracing::warn!("could not read rate budget: {error}"),
        }
    }
}

fn transition(repo: &RepositoryName, state: RepositoryState) {
    tracing::debug!("{repo}: {state}");
}

fn fail(repo: &RepositoryName, stage: RepositoryState, error: CensusError) -> RepositoryFailure {
    transition(repo, RepositoryState::Failed);
    RepositoryFailure::new(repo.clone(), stage, error)
}
