//! Identity wrappers for the organisation, repositories, token, and API base.

use std::fmt;

use url::Url;

use super::error::CensusError;

/// Public GitHub API base used when no enterprise URL is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Organisation login wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganisationName(String);

impl OrganisationName {
    /// Validates that the organisation login is non-blank and trims it.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::InvalidName` when the value is blank or contains
    /// a path separator.
    pub fn new(value: &str) -> Result<Self, CensusError> {
        validate_segment("organisation", value).map(Self)
    }

    /// Borrow the organisation login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrganisationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-blank and trims it.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::InvalidName` when the value is blank or contains
    /// a path separator.
    pub fn new(value: &str) -> Result<Self, CensusError> {
        validate_segment("repository", value).map(Self)
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_segment(kind: &str, value: &str) -> Result<String, CensusError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CensusError::InvalidName {
            message: format!("{kind} name must not be blank"),
        });
    }
    if trimmed.contains('/') || trimmed.chars().any(char::is_whitespace) {
        return Err(CensusError::InvalidName {
            message: format!("{kind} name '{trimmed}' must be a single path segment"),
        });
    }
    Ok(trimmed.to_owned())
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, CensusError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CensusError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(***)")
    }
}

/// Parses the configured API base, defaulting to the public GitHub API.
///
/// Enterprise servers are addressed by their REST base, for example
/// `https://ghe.example.com/api/v3`.
///
/// # Errors
///
/// Returns `CensusError::InvalidUrl` when the value is not an absolute
/// HTTP(S) URL.
pub fn parse_api_base(value: Option<&str>) -> Result<Url, CensusError> {
    let raw = value
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_API_BASE);

    let parsed = Url::parse(raw).map_err(|error| CensusError::InvalidUrl(error.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CensusError::InvalidUrl(format!(
            "unsupported scheme '{scheme}'",
            scheme = parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(CensusError::InvalidUrl("URL must include a host".to_owned()));
    }
    Ok(parsed)
}
