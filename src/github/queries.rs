//! GraphQL documents issued by the census and typed views of their results.
//!
//! Responses are parsed into explicit result types here so that callers never
//! index into raw JSON. A response that does not have the expected shape fails
//! with [`CensusError::SchemaMismatch`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::CensusError;
use super::gateway::GraphqlRequest;
use super::locator::{OrganisationName, RepositoryName};
use super::rate_limit::RateLimitInfo;

/// Largest page size GitHub accepts for a connection.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Remaining call budget for the authenticated token.
pub const RATE_BUDGET_QUERY: &str = "query { rateLimit { limit remaining resetAt } }";

/// One page of a repository's issues together with the boards each links to.
pub const ISSUES_QUERY: &str = r"query($org: String!, $repo: String!, $pageSize: Int!, $cursor: String) {
  repository(owner: $org, name: $repo) {
    issues(first: $pageSize, after: $cursor) {
      totalCount
      pageInfo { hasNextPage endCursor }
      nodes {
        number
        projectsV2(first: 100) {
          totalCount
          nodes { number title }
        }
      }
    }
  }
}";

/// Number of boards linked to the repository itself.
pub const REPOSITORY_PROJECTS_QUERY: &str = r"query($org: String!, $repo: String!) {
  repository(owner: $org, name: $repo) {
    projectsV2(first: 1) { totalCount }
  }
}";

/// Builds the remaining-budget request.
#[must_use]
pub fn rate_budget_request() -> GraphqlRequest {
    GraphqlRequest::new(RATE_BUDGET_QUERY)
}

/// Builds the paginated issues request for `repo`.
///
/// The cursor is left unbound; the paginator binds it per page.
#[must_use]
pub fn issues_request(
    org: &OrganisationName,
    repo: &RepositoryName,
    page_size: u32,
) -> GraphqlRequest {
    GraphqlRequest::new(ISSUES_QUERY)
        .variable("org", org.as_str())
        .variable("repo", repo.as_str())
        .variable("pageSize", page_size.clamp(1, MAX_PAGE_SIZE))
}

/// Builds the repository-level project count request for `repo`.
#[must_use]
pub fn repository_projects_request(
    org: &OrganisationName,
    repo: &RepositoryName,
) -> GraphqlRequest {
    GraphqlRequest::new(REPOSITORY_PROJECTS_QUERY)
        .variable("org", org.as_str())
        .variable("repo", repo.as_str())
}

/// Remaining call quota as reported by the `rateLimit` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBudget {
    limit: u32,
    remaining: u32,
    reset_at: DateTime<Utc>,
}

impl RateBudget {
    /// Parses the `data` member of a budget response.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::SchemaMismatch` when `rateLimit` is missing or
    /// malformed.
    pub fn parse(data: &Value) -> Result<Self, CensusError> {
        let raw = data
            .get("rateLimit")
            .ok_or_else(|| CensusError::schema("rateLimit missing from budget response"))?;
        decode(raw, "rateLimit")
    }

    /// Total points available per window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Points left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// When the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> DateTime<Utc> {
        self.reset_at
    }

    /// Converts the budget into the rate limit representation used for
    /// retry decisions.
    #[must_use]
    pub fn to_rate_limit_info(&self) -> RateLimitInfo {
        RateLimitInfo::from_reset_time(self.limit, self.remaining, self.reset_at)
    }
}

/// A project board as seen from an issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectNode {
    number: u64,
    title: String,
}

impl ProjectNode {
    /// Creates a project node.
    #[must_use]
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
        }
    }

    /// Board number, unique within the organisation.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Board title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// An issue and the boards it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueNode {
    number: u64,
    projects: Vec<ProjectNode>,
}

impl IssueNode {
    /// Creates an issue node.
    #[must_use]
    pub const fn new(number: u64, projects: Vec<ProjectNode>) -> Self {
        Self { number, projects }
    }

    /// Issue number within the repository.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Linked boards in the order GitHub returned them.
    #[must_use]
    pub fn projects(&self) -> &[ProjectNode] {
        &self.projects
    }
}

/// Issues returned by one page (or a merged run of pages) of [`ISSUES_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesPage {
    total_count: u64,
    issues: Vec<IssueNode>,
}

impl IssuesPage {
    /// Creates a page from already-typed issues.
    #[must_use]
    pub const fn new(total_count: u64, issues: Vec<IssueNode>) -> Self {
        Self {
            total_count,
            issues,
        }
    }

    /// Parses the `data` member of an issues response.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::Transport` when the repository is `null` (not
    /// found or not visible to the token) and `CensusError::SchemaMismatch`
    /// when the issues connection is missing or malformed.
    pub fn parse(data: &Value) -> Result<Self, CensusError> {
        let repository: IssuesRepository = repository_member(data)?;
        let connection = repository.issues;

        let issues = connection
            .nodes
            .into_iter()
            .map(|node| {
                let returned = node.projects_v2.nodes.len();
                if u64::try_from(returned).is_ok_and(|count| count < node.projects_v2.total_count) {
                    tracing::warn!(
                        "issue #{number} links {total} boards but only {returned} were returned",
                        number = node.number,
                        total = node.projects_v2.total_count
                    );
                }
                IssueNode::new(node.number, node.projects_v2.nodes)
            })
            .collect();

        Ok(Self::new(connection.total_count, issues))
    }

    /// Total issues in the repository as reported by GitHub.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Issues on this page in the order GitHub returned them.
    #[must_use]
    pub fn issues(&self) -> &[IssueNode] {
        &self.issues
    }
}

/// Repository-level project count from [`REPOSITORY_PROJECTS_QUERY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectsList {
    total_count: u64,
}

impl ProjectsList {
    /// Parses the `data` member of a repository projects response.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::Transport` when the repository is `null` and
    /// `CensusError::SchemaMismatch` when `projectsV2` is missing.
    pub fn parse(data: &Value) -> Result<Self, CensusError> {
        let repository: ProjectsRepository = repository_member(data)?;
        Ok(Self {
            total_count: repository.projects_v2.total_count,
        })
    }

    /// Number of boards linked to the repository.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }
}

#[derive(Deserialize)]
struct IssuesRepository {
    issues: IssueConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueConnection {
    total_count: u64,
    nodes: Vec<WireIssue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireIssue {
    number: u64,
    projects_v2: ProjectConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectConnection {
    total_count: u64,
    #[serde(default)]
    nodes: Vec<ProjectNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectsRepository {
    projects_v2: ProjectCount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectCount {
    total_count: u64,
}

fn repository_member<T: DeserializeOwned>(data: &Value) -> Result<T, CensusError> {
    match data.get("repository") {
        None => Err(CensusError::schema("repository missing from response")),
        Some(Value::Null) => Err(CensusError::Transport {
            message: "repository not found or not accessible".to_owned(),
        }),
        Some(repository) => decode(repository, "repository"),
    }
}

fn decode<T: DeserializeOwned>(raw: &Value, what: &str) -> Result<T, CensusError> {
    T::deserialize(raw).map_err(|error| CensusError::schema(format!("malformed {what}: {error}")))
}
