//! Output formatting utilities for CLI operations.

use std::io::Write;

use boardcensus::{BatchOutcome, CensusError};
use camino::Utf8Path;

/// Writes the closing run summary to the given writer.
///
/// # Errors
///
/// Returns [`CensusError::Write`] when the writer fails.
pub fn write_run_summary<W: Write>(
    writer: &mut W,
    outcome: &BatchOutcome,
    report_path: &Utf8Path,
) -> Result<(), CensusError> {
    writeln!(
        writer,
        "Wrote {rows} rows to {report_path}",
        rows = outcome.summaries().len()
    )
    .map_err(|e| io_error(&e))?;

    if outcome.failures().is_empty() {
        return Ok(());
    }

    writeln!(
        writer,
        "Skipped {count} repositories:",
        count = outcome.failures().len()
    )
    .map_err(|e| io_error(&e))?;
    for failure in outcome.failures() {
        writeln!(writer, "  {failure}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn io_error(error: &std::io::Error) -> CensusError {
    CensusError::Write {
        message: error.to_string(),
    }
}
