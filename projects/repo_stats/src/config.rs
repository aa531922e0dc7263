use std::time::Duration;

use interfaces_github_packages::index::GITHUB_GRAPHQL_URL;
use interfaces_github_repository::index::GITHUB_API_URL;
use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime settings read from the environment (and an optional `.env`).
#[derive(Debug)]
pub struct Config {
    pub github_token: Option<SecretString>,
    pub api_url: String,
    pub graphql_url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidTimeout: REPO_STATS_REQUEST_TIMEOUT_SECS must be a positive integer, got `{value}`")]
    InvalidTimeout { value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = lookup("GITHUB_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from);

        let api_url = lookup("GITHUB_API_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| GITHUB_API_URL.to_string());

        let graphql_url = lookup("GITHUB_GRAPHQL_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| GITHUB_GRAPHQL_URL.to_string());

        let request_timeout = match lookup("REPO_STATS_REQUEST_TIMEOUT_SECS") {
            Some(value) => parse_timeout(&value)?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            github_token,
            api_url,
            graphql_url,
            request_timeout,
        })
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_string(),
        }),
    }
}
