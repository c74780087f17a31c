//! CSV report of repository summaries.
//!
//! Every field is an identifier or an integer, so rows are written without
//! quoting.

use std::io::Write;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::github::error::CensusError;
use crate::github::locator::OrganisationName;

use super::models::RepositorySummary;

/// Header row of the report.
pub const REPORT_HEADER: &str = "org_name,repo_name,issues_linked_to_projects,unique_projects_linked_by_issues,projects_linked_to_repo";

/// Default report file name.
pub const DEFAULT_REPORT_PATH: &str = "projects_report.csv";

/// Writes the header and one row per summary, in order.
///
/// # Errors
///
/// Returns `CensusError::Write` when the writer fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    org: &OrganisationName,
    summaries: &[RepositorySummary],
) -> Result<(), CensusError> {
    writeln!(writer, "{REPORT_HEADER}").map_err(write_error)?;
    for summary in summaries {
        writeln!(
            writer,
            "{org},{repo},{linked},{unique},{repo_projects}",
            repo = summary.repo_name(),
            linked = summary.issues_linked_to_projects(),
            unique = summary.unique_projects_linked_by_issues(),
            repo_projects = summary.projects_linked_to_repo()
        )
        .map_err(write_error)?;
    }
    writer.flush().map_err(write_error)
}

/// Writes the report to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns `CensusError::Write` when the directory or file cannot be created
/// or written.
pub fn write_report_file(
    path: &Utf8Path,
    org: &OrganisationName,
    summaries: &[RepositorySummary],
) -> Result<(), CensusError> {
    let file_name = path.file_name().ok_or_else(|| CensusError::Write {
        message: format!("report path '{path}' has no file name"),
    })?;
    let dir = open_parent_dir(path)?;
    let mut file = dir.create(file_name).map_err(|error| CensusError::Write {
        message: format!("failed to create report '{path}': {error}"),
    })?;

    write_report(&mut file, org, summaries)?;
    tracing::info!(
        "wrote {rows} rows to {path}",
        rows = summaries.len()
    );
    Ok(())
}

fn open_parent_dir(path: &Utf8Path) -> Result<Dir, CensusError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let (root, relative) = if parent.is_absolute() {
        let relative = parent.strip_prefix("/").map_err(|_| CensusError::Write {
            message: format!("failed to normalise report directory '{parent}'"),
        })?;
        (open_ambient("/")?, relative)
    } else {
        (open_ambient(".")?, parent)
    };

    if relative.as_str().is_empty() || relative == Utf8Path::new(".") {
        return Ok(root);
    }

    root.create_dir_all(relative)
        .map_err(|error| CensusError::Write {
            message: format!("failed to create report directory '{parent}': {error}"),
        })?;
    root.open_dir(relative).map_err(|error| CensusError::Write {
        message: format!("failed to open report directory '{parent}': {error}"),
    })
}

fn open_ambient(path: &str) -> Result<Dir, CensusError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|error| CensusError::Write {
        message: format!("failed to open directory '{path}': {error}"),
    })
}

fn write_error(error: std::io::Error) -> CensusError {
    CensusError::Write {
        message: error.to_string(),
    }
}
