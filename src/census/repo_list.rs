//! Reads the newline-delimited list of repositories to census.
//!
//! Lines are trimmed; blank lines and lines starting with `#` are ignored.
//! A line may name the repository as `owner/name` provided the owner is the
//! organisation being censused.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::github::error::CensusError;
use crate::github::locator::{OrganisationName, RepositoryName};

/// Parses repository names from the contents of a repository list.
///
/// # Errors
///
/// Returns `CensusError::Configuration` when a line names another owner or is
/// not a valid repository name.
pub fn parse_repository_list(
    org: &OrganisationName,
    contents: &str,
) -> Result<Vec<RepositoryName>, CensusError> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('#')).then_some((index + 1, trimmed))
        })
        .map(|(line_number, entry)| parse_entry(org, line_number, entry))
        .collect()
}

fn parse_entry(
    org: &OrganisationName,
    line_number: usize,
    entry: &str,
) -> Result<RepositoryName, CensusError> {
    let name = match entry.split_once('/') {
        None => entry,
        Some((owner, name)) if owner.eq_ignore_ascii_case(org.as_str()) => name,
        Some((owner, _)) => {
            return Err(CensusError::configuration(format!(
                "line {line_number}: repository '{entry}' belongs to '{owner}', not '{org}'"
            )));
        }
    };

    RepositoryName::new(name).map_err(|error| {
        CensusError::configuration(format!("line {line_number}: {error}"))
    })
}

/// Reads and parses the repository list at `path`.
///
/// # Errors
///
/// Returns `CensusError::Configuration` when the file cannot be opened or read,
/// or when any entry is invalid.
pub fn read_repository_list(
    org: &OrganisationName,
    path: &Utf8Path,
) -> Result<Vec<RepositoryName>, CensusError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        CensusError::configuration(format!("repository list path '{path}' has no file name"))
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        CensusError::configuration(format!(
            "failed to open repository list directory '{parent}': {error}"
        ))
    })?;
    let contents = dir.read_to_string(file_name).map_err(|error| {
        CensusError::configuration(format!("failed to read repository list '{path}': {error}"))
    })?;

    let repos = parse_repository_list(org, &contents)?;
    tracing::info!("loaded {count} repositories from {path}", count = repos.len());
    Ok(repos)
}
