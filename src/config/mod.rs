//! Census configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.boardcensus.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `BOARDCENSUS_ORG`, `BOARDCENSUS_TOKEN`, or
//!    legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--org`/`-o`, `--repos-file`/`-r`, ...
//!
//! # Configuration File
//!
//! ```toml
//! org = "octo-org"
//! repos_file = "repos.txt"
//! output = "reports/projects_report.csv"
//! api_url = "https://github.example.com/api/v3"
//! page_size = 50
//! ```

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::census::report::DEFAULT_REPORT_PATH;
use crate::github::error::CensusError;
use crate::github::locator::{OrganisationName, PersonalAccessToken, parse_api_base};
use crate::github::pagination::DEFAULT_MAX_PAGES;
use crate::github::queries::MAX_PAGE_SIZE;
use crate::github::query_client::{DEFAULT_FALLBACK_WAIT, DEFAULT_MAX_WAIT, RetryPolicy};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Census configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `BOARDCENSUS_ORG` or `--org`: Organisation to census
/// - `BOARDCENSUS_REPOS_FILE` or `--repos-file`: Repository list path
/// - `BOARDCENSUS_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `BOARDCENSUS_API_URL` or `--api-url`: GitHub (Enterprise) API base
///
/// # Example
///
/// ```no_run
/// use boardcensus::BoardcensusConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = BoardcensusConfig::load().expect("failed to load configuration");
/// let org = config.require_org().expect("organisation required");
/// let settings = config.client_settings().expect("valid client settings");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BOARDCENSUS",
    discovery(
        dotfile_name = ".boardcensus.toml",
        config_file_name = "boardcensus.toml",
        app_name = "boardcensus"
    )
)]
pub struct BoardcensusConfig {
    /// Organisation that owns the repositories.
    ///
    /// Can be provided via:
    /// - CLI: `--org <ORG>` or `-o <ORG>`
    /// - Environment: `BOARDCENSUS_ORG`
    /// - Config file: `org = "..."`
    #[ortho_config(cli_short = 'o')]
    pub org: Option<String>,

    /// Path to the newline-delimited repository list.
    ///
    /// Can be provided via:
    /// - CLI: `--repos-file <PATH>` or `-r <PATH>`
    /// - Environment: `BOARDCENSUS_REPOS_FILE`
    /// - Config file: `repos_file = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repos_file: Option<String>,

    /// Path of the CSV report. Missing parent directories are created.
    ///
    /// Defaults to `projects_report.csv` in the working directory.
    #[ortho_config(cli_short = 'f')]
    pub output: String,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `BOARDCENSUS_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URL of the GitHub API, for GitHub Enterprise installations.
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config(cli_short = 'a')]
    pub api_url: Option<String>,

    /// Issues requested per page, between 1 and 100.
    #[ortho_config(cli_short = 'p')]
    pub page_size: u32,

    /// Pages fetched per repository before giving up.
    #[ortho_config(cli_short = 'm')]
    pub max_pages: u32,

    /// Per-request timeout, in seconds.
    #[ortho_config(cli_short = 'T')]
    pub request_timeout_seconds: u64,

    /// Longest primary rate limit reset the census waits for, in seconds.
    ///
    /// A reset further away fails the affected repository instead. Must be at
    /// least the 60 second wait used when GitHub reports no reset time.
    #[ortho_config(cli_short = 'w')]
    pub max_rate_limit_wait_seconds: u64,

    /// Enables debug logging.
    ///
    /// Can be provided via:
    /// - CLI: `--verbose` / `-v`
    /// - Config file: `verbose = true`
    ///
    /// Note: `BOARDCENSUS_VERBOSE` is not supported because `ortho_config`
    /// does not load boolean values from the environment; use `RUST_LOG`.
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
}

impl Default for BoardcensusConfig {
    fn default() -> Self {
        Self {
            org: None,
            repos_file: None,
            output: DEFAULT_REPORT_PATH.to_owned(),
            token: None,
            api_url: None,
            page_size: MAX_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            max_rate_limit_wait_seconds: DEFAULT_MAX_WAIT.as_secs(),
            verbose: false,
        }
    }
}

/// Everything needed to construct the query client, resolved once from
/// [`BoardcensusConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// API base URL.
    pub api_base: Url,
    /// Authentication token.
    pub token: PersonalAccessToken,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Primary rate limit retry policy.
    pub retry_policy: RetryPolicy,
    /// Issues requested per page.
    pub page_size: u32,
    /// Page ceiling per repository.
    pub max_pages: u32,
}

impl BoardcensusConfig {
    /// Checks numeric settings are within range.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Configuration`] naming the first offending
    /// setting.
    pub fn validate(&self) -> Result<(), CensusError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(CensusError::configuration(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.max_pages == 0 {
            return Err(CensusError::configuration("max_pages must be at least 1"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(CensusError::configuration(
                "request_timeout_seconds must be at least 1",
            ));
        }
        if Duration::from_secs(self.max_rate_limit_wait_seconds) < DEFAULT_FALLBACK_WAIT {
            return Err(CensusError::configuration(format!(
                "max_rate_limit_wait_seconds must be at least {fallback}, got {}",
                self.max_rate_limit_wait_seconds,
                fallback = DEFAULT_FALLBACK_WAIT.as_secs()
            )));
        }
        if self.output.trim().is_empty() {
            return Err(CensusError::configuration("output path must not be empty"));
        }
        Ok(())
    }

    /// Returns the organisation or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Configuration`] when no organisation is
    /// configured and [`CensusError::InvalidName`] when it is malformed.
    pub fn require_org(&self) -> Result<OrganisationName, CensusError> {
        let org = self.org.as_deref().ok_or_else(|| {
            CensusError::configuration("organisation is required (use --org or -o)")
        })?;
        OrganisationName::new(org)
    }

    /// Returns the repository list path or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Configuration`] when no path is configured.
    pub fn require_repos_file(&self) -> Result<Utf8PathBuf, CensusError> {
        self.repos_file
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(Utf8PathBuf::from)
            .ok_or_else(|| {
                CensusError::configuration("repository list is required (use --repos-file or -r)")
            })
    }

    /// Returns the report path.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.output.as_str())
    }

    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::MissingToken`] when no token source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, CensusError> {
        let token = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(CensusError::MissingToken)?;
        PersonalAccessToken::new(token)
    }

    /// Resolves and validates everything the query client needs.
    ///
    /// # Errors
    ///
    /// Returns the first validation, token, or URL error encountered.
    pub fn client_settings(&self) -> Result<ClientSettings, CensusError> {
        self.validate()?;
        Ok(ClientSettings {
            api_base: parse_api_base(self.api_url.as_deref())?,
            token: self.resolve_token()?,
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
            retry_policy: RetryPolicy::new(
                Duration::from_secs(self.max_rate_limit_wait_seconds),
                DEFAULT_FALLBACK_WAIT,
            ),
            page_size: self.page_size,
            max_pages: self.max_pages,
        })
    }
}

#[cfg(test)]
mod tests;
