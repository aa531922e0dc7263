pub mod packages;
pub mod stars;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A repository identifier split into its `owner/name` halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ParseRepoNameError {
    #[error("expected `owner/name`, got `{input}`")]
    InvalidFormat { input: String },
}

impl FromStr for RepoName {
    type Err = ParseRepoNameError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRepoNameError::InvalidFormat {
            input: input.to_string(),
        };

        let (owner, name) = input.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
