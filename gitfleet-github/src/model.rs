//! Search API payloads and their mapping to [`RepoDescriptor`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use gitfleet_core::RepoDescriptor;

use crate::error::GithubError;

/// One page of `GET /search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// The fields of a repository search hit that a run needs.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub name: String,
    #[serde(default)]
    pub ssh_url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub archived: bool,
}

impl SearchItem {
    pub fn into_descriptor(self, protocol: Protocol) -> RepoDescriptor {
        let url = match protocol {
            Protocol::Ssh => self.ssh_url,
            Protocol::Https => self.clone_url,
        };
        RepoDescriptor::new(self.name, url, self.archived)
    }
}

/// Which clone URL to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Ssh,
    Https,
}

impl FromStr for Protocol {
    type Err = GithubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ssh" => Ok(Protocol::Ssh),
            "https" => Ok(Protocol::Https),
            other => Err(GithubError::Protocol(other.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Ssh => write!(f, "ssh"),
            Protocol::Https => write!(f, "https"),
        }
    }
}
