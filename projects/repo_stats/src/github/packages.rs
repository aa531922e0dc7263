//! Package ages via the GraphQL `repository.packages` connection.
//!
//! Pages are fetched strictly in order: each request carries the previous
//! page's `endCursor` verbatim as `after`. The first error aborts the walk and
//! whatever was accumulated so far is dropped.

use chrono::{DateTime, TimeDelta, Utc};
use interfaces_github_packages::index::{
    fetch_repo_packages, FetchRepoPackagesError, GitHubGraphQLResult, GraphQLResponse,
    RepoPackagesPage,
};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, warn};

use super::RepoName;

pub const PACKAGES_PAGE_SIZE: u32 = 100;

/// Elapsed time between a package's creation and the run's reference instant.
pub type PackageAge = TimeDelta;

#[derive(Debug, Error)]
pub enum FetchAllPackageAgesError {
    #[error("FetchRepoPackages: {source}")]
    FetchRepoPackages {
        #[from]
        source: FetchRepoPackagesError,
    },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus { status: StatusCode },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("GraphQL: {}", .messages.join("; "))]
    GraphQL { messages: Vec<String> },

    #[error("Missing or malformed repository field in GraphQL response")]
    RepositoryFieldMissing,

    #[error("pageInfo reported another page without an endCursor")]
    EndCursorMissing,
}

pub async fn fetch_all_package_ages(
    client: &Client,
    graphql_url: &str,
    token: &SecretString,
    repo: &RepoName,
    now: DateTime<Utc>,
) -> Result<Vec<PackageAge>, FetchAllPackageAgesError> {
    let mut ages = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_number = 1u32;

    loop {
        let page = RepoPackagesPage {
            owner: &repo.owner,
            name: &repo.name,
            page_size: PACKAGES_PAGE_SIZE,
            after: cursor.as_deref(),
        };

        let GitHubGraphQLResult { body, status } =
            fetch_repo_packages(client, graphql_url, token.expose_secret(), page).await?;

        if !status.is_success() {
            return Err(FetchAllPackageAgesError::UnexpectedStatus { status });
        }

        let parsed: GraphQLResponse = serde_json::from_str(&body)?;
        if !parsed.errors.is_empty() {
            return Err(FetchAllPackageAgesError::GraphQL {
                messages: parsed.errors.into_iter().map(|err| err.message).collect(),
            });
        }

        let packages = parsed
            .data
            .and_then(|data| data.repository)
            .ok_or(FetchAllPackageAgesError::RepositoryFieldMissing)?
            .packages;

        let nodes = packages.nodes.unwrap_or_default();
        let page_info = packages.page_info;

        debug!(
            repo = %repo,
            page = page_number,
            nodes = nodes.len(),
            has_next_page = page_info.has_next_page,
            "Fetched packages page"
        );

        ages.extend(nodes.into_iter().map(|node| package_age(now, node.created_at)));

        if !page_info.has_next_page {
            break;
        }

        cursor = Some(
            page_info
                .end_cursor
                .ok_or(FetchAllPackageAgesError::EndCursorMissing)?,
        );
        page_number += 1;
    }

    Ok(ages)
}

fn package_age(now: DateTime<Utc>, created_at: DateTime<Utc>) -> PackageAge {
    let age = now.signed_duration_since(created_at);
    if age < TimeDelta::zero() {
        warn!(%created_at, %now, "Package created in the future, clock skew?");
    }
    age
}

/// Renders an age as `{d}d{h}h{m}m{s}s`, sub-second precision dropped.
pub fn format_package_age(age: PackageAge) -> String {
    let sign = if age < TimeDelta::zero() { "-" } else { "" };
    let total = age.num_seconds().unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    format!("{sign}{days}d{hours}h{minutes}m{seconds}s")
}
