//! GitHub repository stats snapshot
//!
//! - Stargazer count over REST, package ages over GraphQL in `github/`
//! - Two-line CSV output in `output`
//! - Reads GITHUB_TOKEN (and endpoint overrides) from the environment

pub mod app;
pub mod config;
pub mod github;
pub mod output;
