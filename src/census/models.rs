//! Domain models produced by the census.

use std::fmt;

use crate::github::error::CensusError;
use crate::github::locator::RepositoryName;

/// Identity of a project board: its number, unique within the organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(u64);

impl ProjectId {
    /// Wraps a board number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the board number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A project board observed on at least one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    id: ProjectId,
    title: String,
}

impl ProjectRef {
    /// Creates a project reference.
    #[must_use]
    pub fn new(id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Board identity.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Display title as first observed.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// A project board and how many issues in the repository reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOccurrence {
    project: ProjectRef,
    issue_count: u64,
}

impl ProjectOccurrence {
    pub(crate) const fn first_seen(project: ProjectRef) -> Self {
        Self {
            project,
            issue_count: 1,
        }
    }

    pub(crate) const fn increment(&mut self) {
        self.issue_count += 1;
    }

    /// The referenced board.
    #[must_use]
    pub const fn project(&self) -> &ProjectRef {
        &self.project
    }

    /// Number of distinct issues linking to the board.
    #[must_use]
    pub const fn issue_count(&self) -> u64 {
        self.issue_count
    }
}

impl fmt::Display for ProjectOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{title} ({id}) x{count}",
            title = self.project.title,
            id = self.project.id,
            count = self.issue_count
        )
    }
}

/// One report row: the counters collected for a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    repo_name: RepositoryName,
    issues_linked_to_projects: u64,
    unique_projects_linked_by_issues: u64,
    projects_linked_to_repo: u64,
}

impl RepositorySummary {
    /// Creates a summary row.
    #[must_use]
    pub const fn new(
        repo_name: RepositoryName,
        issues_linked_to_projects: u64,
        unique_projects_linked_by_issues: u64,
        projects_linked_to_repo: u64,
    ) -> Self {
        Self {
            repo_name,
            issues_linked_to_projects,
            unique_projects_linked_by_issues,
            projects_linked_to_repo,
        }
    }

    /// Repository the row describes.
    #[must_use]
    pub const fn repo_name(&self) -> &RepositoryName {
        &self.repo_name
    }

    /// Issues linking to at least one board.
    #[must_use]
    pub const fn issues_linked_to_projects(&self) -> u64 {
        self.issues_linked_to_projects
    }

    /// Distinct boards referenced by those issues.
    #[must_use]
    pub const fn unique_projects_linked_by_issues(&self) -> u64 {
        self.unique_projects_linked_by_issues
    }

    /// Boards linked to the repository itself.
    #[must_use]
    pub const fn projects_linked_to_repo(&self) -> u64 {
        self.projects_linked_to_repo
    }
}

/// Progress of a single repository through the census.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    /// Not yet started.
    Pending,
    /// Paging through the repository's issues.
    FetchingIssues,
    /// Folding issues into project counters.
    Aggregating,
    /// Reading the repository-level project count.
    FetchingRepoProjects,
    /// Summary produced.
    Done,
    /// Skipped after an error.
    Failed,
}

impl fmt::Display for RepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::FetchingIssues => "fetching issues",
            Self::Aggregating => "aggregating",
            Self::FetchingRepoProjects => "fetching repository projects",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A repository that was skipped, with the stage it failed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFailure {
    repo_name: RepositoryName,
    stage: RepositoryState,
    error: CensusError,
}

impl RepositoryFailure {
    /// Records a failure of `repo_name` while in `stage`.
    #[must_use]
    pub const fn new(repo_name: RepositoryName, stage: RepositoryState, error: CensusError) -> Self {
        Self {
            repo_name,
            stage,
            error,
        }
    }

    /// Repository that was skipped.
    #[must_use]
    pub const fn repo_name(&self) -> &RepositoryName {
        &self.repo_name
    }

    /// Stage the repository was in when it failed.
    #[must_use]
    pub const fn stage(&self) -> RepositoryState {
        self.stage
    }

    /// The error that caused the skip.
    #[must_use]
    pub const fn error(&self) -> &CensusError {
        &self.error
    }
}

impl fmt::Display for RepositoryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{repo} failed while {stage}: {error}",
            repo = self.repo_name,
            stage = self.stage,
            error = self.error
        )
    }
}
