use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use projects_repo_stats::app::{run, RunArgs, RunError};
use projects_repo_stats::config::{Config, ConfigError};
use projects_repo_stats::output::DEFAULT_OUTPUT_PATH;
use thiserror::Error;
use tracing::warn;

#[derive(Parser)]
#[command(name = "repo_stats")]
#[command(about = "Snapshot a GitHub repository's star count into a CSV file")]
#[command(version)]
struct Cli {
    /// Repository identifier, `owner/name`
    repo: String,
    /// Also list the age of every package published from the repository
    #[arg(long)]
    package_ages: bool,
    /// Where to write the CSV
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("Config: {source}")]
    Config {
        #[source]
        source: ConfigError,
    },
    #[error("{source}")]
    Run {
        #[source]
        source: RunError,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn try_main(cli: Cli) -> Result<(), MainError> {
    // Must precede tracing init: .env may set RUST_LOG.
    let dotenv = dotenvy::dotenv();

    utils_trace::init(&cli.log_level).map_err(|source| MainError::TracingInit { source })?;

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!("Ignoring unreadable .env file: {err}");
        }
    }

    let config = Config::from_env().map_err(|source| MainError::Config { source })?;

    let args = RunArgs {
        repo_name: cli.repo,
        package_ages: cli.package_ages,
        output: cli.output,
    };

    run(&args, &config, &mut io::stdout().lock())
        .await
        .map_err(|source| MainError::Run { source })?;

    Ok(())
}
