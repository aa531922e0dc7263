use reqwest::{Client, StatusCode};
use thiserror::Error;

pub const GITHUB_API_URL: &str = "https://api.github.com";

pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
}

/// GET `{api_url}/repos/{repo_name}`. `repo_name` is spliced in as-is.
pub async fn fetch_repository(
    client: &Client,
    api_url: &str,
    token: Option<&str>,
    repo_name: &str,
) -> Result<GitHubRestResult, FetchRepositoryError> {
    let url = format!("{api_url}/repos/{repo_name}");

    let mut request = client
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", concat!("repo-stats/", env!("CARGO_PKG_VERSION")));

    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }

    let response = request
        .send()
        .await
        .map_err(|source| FetchRepositoryError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchRepositoryError::ResponseRead { source })?;

    Ok(GitHubRestResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchRepositoryError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}
