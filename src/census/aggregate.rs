//! Folds issues into per-repository project counters.
//!
//! A [`ProjectTally`] keeps one [`ProjectOccurrence`] per distinct board
//! number, in the order boards were first seen. Each issue contributes at most
//! one increment per board, even if GitHub lists the same board twice for it.

use std::collections::{HashMap, HashSet};

use crate::github::queries::{IssueNode, IssuesPage};

use super::models::{ProjectId, ProjectOccurrence, ProjectRef};

/// Running project counters for one repository scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTally {
    occurrences: Vec<ProjectOccurrence>,
    index: HashMap<ProjectId, usize>,
    issues_with_projects: u64,
    issues_scanned: u64,
}

impl ProjectTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds every issue on `page` into the tally, in page order.
    pub fn record_page(&mut self, page: &IssuesPage) {
        for issue in page.issues() {
            self.record_issue(issue);
        }
    }

    /// Folds a single issue into the tally.
    pub fn record_issue(&mut self, issue: &IssueNode) {
        self.issues_scanned += 1;
        if issue.projects().is_empty() {
            return;
        }
        self.issues_with_projects += 1;

        let mut seen_on_issue = HashSet::new();
        for node in issue.projects() {
            let id = ProjectId::new(node.number());
            if !seen_on_issue.insert(id) {
                tracing::debug!(
                    "issue #{issue} lists board {id} more than once",
                    issue = issue.number()
                );
                continue;
            }

            match self.index.get(&id).and_then(|&slot| self.occurrences.get_mut(slot)) {
                Some(occurrence) => occurrence.increment(),
                None => {
                    self.index.insert(id, self.occurrences.len());
                    self.occurrences
                        .push(ProjectOccurrence::first_seen(ProjectRef::new(id, node.title())));
                }
            }
        }
    }

    /// Issues linking to at least one board.
    #[must_use]
    pub const fn issues_with_projects(&self) -> u64 {
        self.issues_with_projects
    }

    /// Issues folded so far, linked or not.
    #[must_use]
    pub const fn issues_scanned(&self) -> u64 {
        self.issues_scanned
    }

    /// Number of distinct boards seen.
    #[must_use]
    pub fn unique_projects(&self) -> u64 {
        u64::try_from(self.occurrences.len()).unwrap_or(u64::MAX)
    }

    /// Boards in first-seen order.
    #[must_use]
    pub fn occurrences(&self) -> &[ProjectOccurrence] {
        &self.occurrences
    }

    /// Looks up the occurrence for a board.
    #[must_use]
    pub fn occurrence(&self, id: ProjectId) -> Option<&ProjectOccurrence> {
        self.index
            .get(&id)
            .and_then(|&slot| self.occurrences.get(slot))
    }

    /// Human-readable board list, e.g. `Roadmap (#5) x2, Bugs (#7) x1`.
    #[must_use]
    pub fn project_list(&self) -> String {
        self.occurrences
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Builds a fresh tally from a merged issues page.
#[must_use]
pub fn aggregate(page: &IssuesPage) -> ProjectTally {
    let mut tally = ProjectTally::new();
    tally.record_page(page);
    tally
}
