//! Error mapping helpers for the Octocrab GraphQL transport.

use http::StatusCode;
use serde_json::Value;

use crate::github::error::CensusError;

/// GraphQL error `type` GitHub reports when the point budget is exhausted.
const GRAPHQL_RATE_LIMITED: &str = "RATE_LIMITED";

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an HTTP status is one GitHub uses for throttling.
const fn is_throttle_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

fn mentions_any(source: &octocrab::GitHubError, needles: &[&str]) -> bool {
    let message = source.message.to_lowercase();
    let documentation = source
        .documentation_url
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    needles
        .iter()
        .any(|needle| message.contains(needle) || documentation.contains(needle))
}

/// Checks whether the GitHub error is the secondary (abuse detection) limit.
///
/// Secondary limit documentation links also mention "rate-limit", so this
/// must be checked before [`is_rate_limit_error`].
pub(super) fn is_secondary_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    is_throttle_status(source.status_code)
        && mentions_any(
            source,
            &["secondary rate limit", "secondary-rate-limit", "abuse"],
        )
}

/// Checks whether the GitHub error represents a primary rate limit error
/// based on the HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    is_throttle_status(source.status_code) && mentions_any(source, &["rate limit", "rate-limit"])
}

/// Maps a non-throttling octocrab error.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> CensusError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_auth_failure(source.status_code) {
            CensusError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            CensusError::Transport {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return CensusError::Transport {
            message: format!("{operation} failed: network error: {error}"),
        };
    }

    CensusError::Transport {
        message: format!("{operation} failed: {error}"),
    }
}

/// Unwraps a GraphQL response envelope into its `data` member.
///
/// A `RATE_LIMITED` entry in `errors` is reported as a primary rate limit;
/// any other entry fails the call with its messages joined.
pub(super) fn into_data(operation: &str, body: Value) -> Result<Value, CensusError> {
    let Value::Object(mut envelope) = body else {
        return Err(CensusError::schema(format!(
            "{operation} returned a non-object response"
        )));
    };

    if let Some(errors) = envelope.get("errors").and_then(Value::as_array)
        && !errors.is_empty()
    {
        return Err(map_graphql_errors(operation, errors));
    }

    match envelope.remove("data") {
        Some(Value::Null) | None => Err(CensusError::schema(format!(
            "{operation} returned no data"
        ))),
        Some(data) => Ok(data),
    }
}

fn map_graphql_errors(operation: &str, errors: &[Value]) -> CensusError {
    let message = errors
        .iter()
        .map(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown GraphQL error")
        })
        .collect::<Vec<_>>()
        .join("; ");

    let rate_limited = errors.iter().any(|error| {
        error.get("type").and_then(Value::as_str) == Some(GRAPHQL_RATE_LIMITED)
    });

    if rate_limited {
        CensusError::PrimaryRateLimit {
            rate_limit: None,
            message: format!("{operation} failed: {message}"),
        }
    } else {
        CensusError::Transport {
            message: format!("{operation} returned errors: {message}"),
        }
    }
}
