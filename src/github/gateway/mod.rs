//! Transport seam for issuing GraphQL queries against GitHub.
//!
//! The [`GraphqlTransport`] trait is the only place the census touches the
//! network. The Octocrab implementation handles real HTTP requests and maps
//! failures into [`CensusError`] variants, distinguishing primary from
//! secondary rate limits so the query client can apply its retry policy.

mod client;
mod error_mapping;
mod transport;

pub use transport::OctocrabTransport;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::github::error::CensusError;

/// A GraphQL query together with its variables.
///
/// Serialises to the `{"query": ..., "variables": {...}}` payload GitHub
/// expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    query: String,
    variables: Map<String, Value>,
}

impl GraphqlRequest {
    /// Name of the variable carrying the pagination cursor.
    pub const CURSOR_VARIABLE: &'static str = "cursor";

    /// Creates a request with no variables.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    /// Adds or replaces a variable.
    #[must_use]
    pub fn variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_owned(), value.into());
        self
    }

    /// Returns a copy of this request with `$cursor` bound to `cursor`, or to
    /// `null` for the first page.
    #[must_use]
    pub fn with_cursor(&self, cursor: Option<&str>) -> Self {
        let value = cursor.map_or(Value::Null, |token| Value::String(token.to_owned()));
        self.clone().variable(Self::CURSOR_VARIABLE, value)
    }

    /// The query document.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The bound variables.
    #[must_use]
    pub const fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}

/// Executes GraphQL requests and returns the `data` member of the response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Execute a single GraphQL request.
    ///
    /// Throttling is reported as [`CensusError::PrimaryRateLimit`] or
    /// [`CensusError::SecondaryRateLimit`]; retrying is the caller's concern.
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, CensusError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::GraphqlRequest;

    #[rstest]
    fn serialises_to_graphql_payload() {
        let request = GraphqlRequest::new("query($org: String!) { viewer { login } }")
            .variable("org", "octo");

        let payload = serde_json::to_value(&request).expect("request should serialise");
        assert_eq!(
            payload,
            json!({
                "query": "query($org: String!) { viewer { login } }",
                "variables": { "org": "octo" }
            })
        );
    }

    #[rstest]
    fn with_cursor_binds_null_for_first_page() {
        let request = GraphqlRequest::new("q").variable("org", "octo");

        let first = request.with_cursor(None);
        let next = request.with_cursor(Some("Y3Vyc29yOjE="));

        assert_eq!(first.variables().get("cursor"), Some(&json!(null)));
        assert_eq!(next.variables().get("cursor"), Some(&json!("Y3Vyc29yOjE=")));
        assert_eq!(next.variables().get("org"), Some(&json!("octo")));
        assert!(
            request.variables().get("cursor").is_none(),
            "original request should be left untouched"
        );
    }
}
