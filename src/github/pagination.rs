//! Cursor pagination over GraphQL connections.
//!
//! The paginator issues a query whose `$cursor` variable starts as `null`,
//! reads `pageInfo { hasNextPage endCursor }` from the connection in each
//! response, and reissues the query with the new cursor until GitHub reports
//! no further pages. Pages can either be folded one at a time
//! ([`CursorPaginator::for_each_page`]) or merged into a single response
//! ([`CursorPaginator::paginate`]).
//!
//! The connection is the first JSON object, found depth-first through
//! nested objects, that carries a `pageInfo` member. Arrays are not
//! searched, so nested connections inside `nodes` are left alone.

use serde::Deserialize;
use serde_json::Value;

use super::error::CensusError;
use super::gateway::{GraphqlRequest, GraphqlTransport};
use super::query_client::RateLimitedClient;

/// Default safety ceiling on the number of pages fetched per query.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Continuation state reported by a GraphQL connection.
///
/// # Example
///
/// ```
/// use boardcensus::github::pagination::PageInfo;
///
/// let info = PageInfo::new(true, Some("Y3Vyc29yOjI=".to_owned()));
/// assert!(info.has_next_page());
/// assert_eq!(info.end_cursor(), Some("Y3Vyc29yOjI="));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    has_next_page: bool,
    #[serde(default)]
    end_cursor: Option<String>,
}

impl PageInfo {
    /// Creates a page info instance.
    #[must_use]
    pub const fn new(has_next_page: bool, end_cursor: Option<String>) -> Self {
        Self {
            has_next_page,
            end_cursor,
        }
    }

    /// Returns true if more pages exist after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Returns the opaque cursor of the last item on this page.
    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }

    /// Returns the cursor to request next, `None` when this is the last page.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::SchemaMismatch` when more pages are reported but
    /// no cursor accompanies them.
    pub fn into_next_cursor(self) -> Result<Option<String>, CensusError> {
        if !self.has_next_page {
            return Ok(None);
        }
        self.end_cursor
            .map(Some)
            .ok_or_else(|| CensusError::schema("hasNextPage is true but endCursor is missing"))
    }
}

/// Walks a cursor-paginated query page by page.
pub struct CursorPaginator<'client, T> {
    client: &'client RateLimitedClient<T>,
    max_pages: u32,
}

impl<'client, T> CursorPaginator<'client, T>
where
    T: GraphqlTransport,
{
    /// Creates a paginator that fetches at most `max_pages` pages per query.
    #[must_use]
    pub const fn new(client: &'client RateLimitedClient<T>, max_pages: u32) -> Self {
        Self { client, max_pages }
    }

    /// Fetches every page, handing each response to `on_page` in order.
    ///
    /// Returns the number of pages fetched.
    ///
    /// # Errors
    ///
    /// Propagates client failures and errors returned by `on_page`; returns
    /// `CensusError::SchemaMismatch` when a response has no connection or a
    /// malformed `pageInfo`, and `CensusError::PaginationExhausted` when the
    /// ceiling is reached while pages remain.
    pub async fn for_each_page<F>(
        &self,
        request: &GraphqlRequest,
        mut on_page: F,
    ) -> Result<u32, CensusError>
    where
        F: FnMut(Value) -> Result<(), CensusError>,
    {
        let mut cursor: Option<String> = None;

        for page_number in 1..=self.max_pages {
            let page = self
                .client
                .execute(&request.with_cursor(cursor.as_deref()))
                .await?;
            let pointer = find_connection(&page)
                .ok_or_else(|| CensusError::schema("response has no pageInfo connection"))?;
            let page_info = read_page_info(&page, &pointer)?;

            tracing::debug!(
                "fetched page {page_number} (has next: {has_next})",
                has_next = page_info.has_next_page()
            );
            on_page(page)?;

            let Some(next) = page_info.into_next_cursor()? else {
                return Ok(page_number);
            };
            cursor = Some(next);
        }

        Err(CensusError::PaginationExhausted {
            max_pages: self.max_pages,
        })
    }

    /// Fetches every page and merges them into one response, as if a single
    /// unpaginated call had been made.
    ///
    /// # Errors
    ///
    /// See [`Self::for_each_page`].
    pub async fn paginate(&self, request: &GraphqlRequest) -> Result<Value, CensusError> {
        let mut merged: Option<Value> = None;

        self.for_each_page(request, |page| {
            match merged.as_mut() {
                None => merged = Some(page),
                Some(accumulated) => merge_page(accumulated, page)?,
            }
            Ok(())
        })
        .await?;

        merged.ok_or_else(|| CensusError::schema("pagination produced no pages"))
    }
}

/// Returns the JSON pointer of the connection carrying `pageInfo`.
#[must_use]
pub fn find_connection(value: &Value) -> Option<String> {
    let Value::Object(members) = value else {
        return None;
    };
    if members.contains_key("pageInfo") {
        return Some(String::new());
    }
    members.iter().find_map(|(key, child)| {
        find_connection(child).map(|rest| format!("/{key}{rest}"))
    })
}

fn read_page_info(page: &Value, pointer: &str) -> Result<PageInfo, CensusError> {
    let raw = page
        .pointer(pointer)
        .and_then(|connection| connection.get("pageInfo"))
        .cloned()
        .ok_or_else(|| CensusError::schema(format!("pageInfo missing at '{pointer}'")))?;

    serde_json::from_value(raw)
        .map_err(|error| CensusError::schema(format!("malformed pageInfo: {error}")))
}

/// Appends the list members of `page`'s connection onto `accumulated`.
///
/// Array members (`nodes`, `edges`) are concatenated in page order.
/// `pageInfo` takes the newer page's value. Every other member keeps the
/// value from the first page.
///
/// # Errors
///
/// Returns `CensusError::SchemaMismatch` when the two responses do not share
/// a connection at the same location or a list member changes type.
pub fn merge_page(accumulated: &mut Value, mut page: Value) -> Result<(), CensusError> {
    let pointer = find_connection(&page)
        .ok_or_else(|| CensusError::schema("page has no pageInfo connection"))?;
    if find_connection(accumulated).as_deref() != Some(pointer.as_str()) {
        return Err(CensusError::schema(format!(
            "page connection at '{pointer}' does not match the first page"
        )));
    }

    let Some(Value::Object(incoming)) = page.pointer_mut(&pointer).map(Value::take) else {
        return Err(CensusError::schema("page connection is not an object"));
    };
    let target = accumulated
        .pointer_mut(&pointer)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| CensusError::schema("accumulated connection is not an object"))?;

    for (key, value) in incoming {
        match value {
            Value::Array(items) => match target.get_mut(&key) {
                Some(Value::Array(existing)) => existing.extend(items),
                Some(_) => {
                    return Err(CensusError::schema(format!(
                        "connection member '{key}' changed type between pages"
                    )));
                }
                None => {
                    target.insert(key, Value::Array(items));
                }
            },
            page_info if key == "pageInfo" => {
                target.insert(key, page_info);
            }
            _ => {}
        }
    }

    Ok(())
}
