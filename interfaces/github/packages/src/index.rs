use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const REPO_PACKAGES_QUERY: &str = r#"
    query getRepoPackages($owner: String!, $name: String!, $pageSize: Int!, $after: String) {
        repository(owner: $owner, name: $name) {
            packages(first: $pageSize, after: $after) {
                nodes {
                    createdAt
                }
                pageInfo {
                    endCursor
                    hasNextPage
                }
            }
        }
    }
"#;

pub struct GitHubGraphQLResult {
    pub body: String,
    pub status: StatusCode,
}

/// One page request against the repository packages connection.
#[derive(Debug, Clone, Copy)]
pub struct RepoPackagesPage<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub page_size: u32,
    pub after: Option<&'a str>,
}

pub async fn fetch_repo_packages(
    client: &Client,
    endpoint: &str,
    token: &str,
    page: RepoPackagesPage<'_>,
) -> Result<GitHubGraphQLResult, FetchRepoPackagesError> {
    let payload = serde_json::json!({
        "query": REPO_PACKAGES_QUERY,
        "variables": {
            "owner": page.owner,
            "name": page.name,
            "pageSize": page.page_size,
            "after": page.after,
        }
    });

    let response = client
        .post(endpoint)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .header("User-Agent", concat!("repo-stats/", env!("CARGO_PKG_VERSION")))
        .json(&payload)
        .send()
        .await
        .map_err(|source| FetchRepoPackagesError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchRepoPackagesError::ResponseRead { source })?;

    Ok(GitHubGraphQLResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchRepoPackagesError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<GraphQLData>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLData {
    pub repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub packages: PackageConnection,
}

#[derive(Debug, Deserialize)]
pub struct PackageConnection {
    pub nodes: Option<Vec<PackageNode>>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageNode {
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_repo_packages_sends_variables_and_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(body_partial_json(serde_json::json!({
                "variables": {
                    "owner": "octocat",
                    "name": "Hello-World",
                    "pageSize": 100,
                    "after": "Y3Vyc29yOjE="
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let endpoint = format!("{}/graphql", mock_server.uri());
        let page = RepoPackagesPage {
            owner: "octocat",
            name: "Hello-World",
            page_size: 100,
            after: Some("Y3Vyc29yOjE="),
        };

        let result = fetch_repo_packages(&client, &endpoint, "secret-token", page)
            .await
            .unwrap();

        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.body, "{}");
    }

    #[tokio::test]
    async fn test_fetch_repo_packages_sends_null_cursor_on_first_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "variables": { "after": null }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let page = RepoPackagesPage {
            owner: "octocat",
            name: "Hello-World",
            page_size: 100,
            after: None,
        };

        fetch_repo_packages(&client, &mock_server.uri(), "t", page)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_repo_packages_keeps_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let page = RepoPackagesPage {
            owner: "octocat",
            name: "Hello-World",
            page_size: 100,
            after: None,
        };

        let result = fetch_repo_packages(&client, &mock_server.uri(), "bad", page)
            .await
            .unwrap();

        assert_eq!(result.status, StatusCode::UNAUTHORIZED);
        assert_eq!(result.body, "Bad credentials");
    }

    #[test]
    fn test_graphql_response_decodes_page() {
        let body = r#"{
            "data": {
                "repository": {
                    "packages": {
                        "nodes": [{ "createdAt": "2024-01-02T03:04:05Z" }],
                        "pageInfo": { "endCursor": "abc", "hasNextPage": true }
                    }
                }
            }
        }"#;

        let parsed: GraphQLResponse = serde_json::from_str(body).unwrap();
        let repository = parsed.data.unwrap().repository.unwrap();
        let nodes = repository.packages.nodes.unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert_eq!(repository.packages.page_info.end_cursor.as_deref(), Some("abc"));
        assert!(repository.packages.page_info.has_next_page);
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_graphql_response_decodes_errors() {
        let body = r#"{
            "data": null,
            "errors": [{ "message": "Could not resolve to a Repository" }]
        }"#;

        let parsed: GraphQLResponse = serde_json::from_str(body).unwrap();

        assert!(parsed.data.is_none());
        assert_eq!(parsed.errors[0].message, "Could not resolve to a Repository");
    }
}
