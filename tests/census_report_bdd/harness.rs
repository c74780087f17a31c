//! Canned GitHub GraphQL responses for the census report BDD tests.

use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

const GRAPHQL_PATH: &str = "/graphql";

fn graphql_data(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

fn for_repo(repo: &str) -> String {
    format!("\"repo\":\"{repo}\"")
}

fn issue(number: u64, projects: &[(u64, &str)]) -> Value {
    let nodes: Vec<Value> = projects
        .iter()
        .map(|&(id, title)| json!({ "number": id, "title": title }))
        .collect();
    json!({
        "number": number,
        "projectsV2": { "totalCount": nodes.len(), "nodes": nodes }
    })
}

fn issues_page(nodes: &[Value], end_cursor: &str, has_next_page: bool) -> Value {
    json!({
        "repository": {
            "issues": {
                "totalCount": 3,
                "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor },
                "nodes": nodes
            }
        }
    })
}

/// Answers the remaining-budget query.
pub(crate) fn budget_mock() -> Mock {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("rateLimit"))
        .respond_with(graphql_data(json!({
            "rateLimit": { "limit": 5000, "remaining": 4990, "resetAt": "2026-01-01T00:00:00Z" }
        })))
}

/// Answers page `page` (1 or 2) of the issues query for `repo`.
///
/// Issue 1 links boards #5 and #7, issue 2 links #5, and issue 3 links
/// nothing; issue 1 is on the first page and the rest on the second.
pub(crate) fn issues_page_mock(repo: &str, page: u8) -> Mock {
    let (cursor_binding, body) = if page == 1 {
        (
            "\"cursor\":null".to_owned(),
            issues_page(&[issue(1, &[(5, "Roadmap"), (7, "Bugs")])], "c1", true),
        )
    } else {
        (
            "\"cursor\":\"c1\"".to_owned(),
            issues_page(&[issue(2, &[(5, "Roadmap")]), issue(3, &[])], "c2", false),
        )
    };

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("issues(first"))
        .and(body_string_contains(for_repo(repo)))
        .and(body_string_contains(cursor_binding))
        .respond_with(graphql_data(body))
}

/// Answers the repository-level project count query for `repo`.
pub(crate) fn repository_projects_mock(repo: &str, count: u64) -> Mock {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("projectsV2(first: 1)"))
        .and(body_string_contains(for_repo(repo)))
        .respond_with(graphql_data(json!({
            "repository": { "projectsV2": { "totalCount": count } }
        })))
}

/// Reports `repo` as unresolvable for every query.
pub(crate) fn not_found_mock(repo: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains(for_repo(repo)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "repository": null },
            "errors": [{
                "type": "NOT_FOUND",
                "path": ["repository"],
                "message": format!("Could not resolve to a Repository with the name 'org/{repo}'.")
            }]
        })))
}

/// Rejects the first issues query for `repo` with a primary rate limit.
pub(crate) fn rate_limited_issues_mock(repo: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("issues(first"))
        .and(body_string_contains(for_repo(repo)))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for user ID 1.",
            "documentation_url": "https://docs.github.com/graphql/overview/rate-limits-and-node-limits-for-the-graphql-api"
        })))
        .up_to_n_times(1)
        .with_priority(1)
}

/// Reports an already-elapsed reset so the retry waits about one second.
pub(crate) fn rate_limit_status_mock() -> Mock {
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": {
                "core": { "limit": 5000, "used": 5000, "remaining": 0, "reset": 0 },
                "search": { "limit": 30, "used": 0, "remaining": 30, "reset": 0 },
                "graphql": { "limit": 5000, "used": 5000, "remaining": 0, "reset": 0 }
            },
            "rate": { "limit": 5000, "used": 5000, "remaining": 0, "reset": 0 }
        })))
}
