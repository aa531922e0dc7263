use interfaces_github_repository::index::{
    fetch_repository, FetchRepositoryError, GitHubRestResult,
};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchStarCountError {
    #[error("FetchRepository: {source}")]
    FetchRepository {
        #[from]
        source: FetchRepositoryError,
    },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus { status: StatusCode },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("unable to parse stargazers_count")]
    UnableToParseStargazersCount,
}

/// The only field of the repository payload we consume.
#[derive(Deserialize)]
struct StargazersCount {
    stargazers_count: f64,
}

/// Fetches the stargazer count of `repo_name` (`owner/name`, not validated).
///
/// The count is decoded as a JSON number and truncated toward zero.
pub async fn fetch_star_count(
    client: &Client,
    api_url: &str,
    token: Option<&SecretString>,
    repo_name: &str,
) -> Result<u64, FetchStarCountError> {
    let GitHubRestResult { body, status } = fetch_repository(
        client,
        api_url,
        token.map(|token| token.expose_secret()),
        repo_name,
    )
    .await?;

    debug!(repo = repo_name, %status, "Fetched repository metadata");

    if !status.is_success() {
        return Err(FetchStarCountError::UnexpectedStatus { status });
    }

    parse_star_count(&body)
}

fn parse_star_count(body: &str) -> Result<u64, FetchStarCountError> {
    let object: Map<String, Value> = serde_json::from_str(body)?;

    let StargazersCount { stargazers_count } = serde_json::from_value(Value::Object(object))
        .map_err(|_| FetchStarCountError::UnableToParseStargazersCount)?;

    if !stargazers_count.is_finite()
        || stargazers_count < 0.0
        || stargazers_count >= u64::MAX as f64
    {
        return Err(FetchStarCountError::UnableToParseStargazersCount);
    }

    Ok(stargazers_count.trunc() as u64)
}
