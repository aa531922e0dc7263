use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::github::packages::{
    fetch_all_package_ages, format_package_age, FetchAllPackageAgesError, PackageAge,
};
use crate::github::stars::{fetch_star_count, FetchStarCountError};
use crate::github::{ParseRepoNameError, RepoName};
use crate::output::{write_stats_csv, WriteStatsCsvError};

/// What the caller asked for on the command line.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub repo_name: String,
    pub package_ages: bool,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct RunSummary {
    pub stars: u64,
    pub package_ages: Vec<PackageAge>,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("BuildHttpClient: {source}")]
    BuildHttpClient { source: reqwest::Error },

    #[error("FetchStarCount: {source}")]
    FetchStarCount {
        #[from]
        source: FetchStarCountError,
    },

    #[error("InvalidRepoName: {source}")]
    InvalidRepoName {
        #[from]
        source: ParseRepoNameError,
    },

    #[error("MissingToken: GITHUB_TOKEN must be set to list packages")]
    MissingToken,

    #[error("FetchAllPackageAges: {source}")]
    FetchAllPackageAges {
        #[from]
        source: FetchAllPackageAgesError,
    },

    #[error("WriteStatsCsv: {source}")]
    WriteStatsCsv {
        #[from]
        source: WriteStatsCsvError,
    },

    #[error("PrintReport: {source}")]
    PrintReport { source: std::io::Error },
}

/// Stars first, then package ages (if asked for), then the CSV.
///
/// Report lines go to `out`. Any failure stops the run before the CSV is
/// written.
pub async fn run<W: Write>(
    args: &RunArgs,
    config: &Config,
    out: &mut W,
) -> Result<RunSummary, RunError> {
    let client = Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|source| RunError::BuildHttpClient { source })?;

    let stars = fetch_star_count(
        &client,
        &config.api_url,
        config.github_token.as_ref(),
        &args.repo_name,
    )
    .await?;

    info!(repo = %args.repo_name, stars, "Fetched stargazers count");
    writeln!(out, "Stargazers count for {}: {}", args.repo_name, stars)
        .map_err(|source| RunError::PrintReport { source })?;

    let package_ages = if args.package_ages {
        let repo: RepoName = args.repo_name.parse()?;
        let token = config.github_token.as_ref().ok_or(RunError::MissingToken)?;

        let ages =
            fetch_all_package_ages(&client, &config.graphql_url, token, &repo, Utc::now()).await?;

        info!(repo = %repo, packages = ages.len(), "Fetched package ages");
        for (i, age) in ages.iter().enumerate() {
            writeln!(out, "Package {} age: {}", i + 1, format_package_age(*age))
                .map_err(|source| RunError::PrintReport { source })?;
        }

        ages
    } else {
        Vec::new()
    };

    write_stats_csv(&args.output, &args.repo_name, stars)?;
    info!(path = %args.output.display(), "Wrote stats CSV");

    Ok(RunSummary {
        stars,
        package_ages,
    })
}
