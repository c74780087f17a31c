//! Boardcensus CLI entrypoint.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use boardcensus::{BoardcensusConfig, CensusError, logging};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => return report_failure(&error),
    };
    logging::init(config.verbose);

    match cli::census::run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("census failed: {error}");
            report_failure(&error)
        }
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`CensusError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<BoardcensusConfig, CensusError> {
    BoardcensusConfig::load().map_err(|error| CensusError::Configuration {
        message: error.to_string(),
    })
}

fn report_failure(error: &CensusError) -> ExitCode {
    if writeln!(io::stderr().lock(), "{error}").is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::FAILURE
}
