//! GitHub search API client.
//!
//! API documentation: <https://docs.github.com/en/rest/search/search#search-repositories>

use std::time::Duration;

use url::Url;

use gitfleet_core::RepoDescriptor;

use crate::error::GithubError;
use crate::link::next_page_link;
use crate::model::{Protocol, SearchPage};

/// Base URL for the GitHub REST API.
pub const API_BASE_URL: &str = "https://api.github.com/";

/// Environment variable holding the access token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Results per page; the API maximum.
pub const PER_PAGE: u32 = 100;

/// Wait before retrying a rate-limited request without `Retry-After`.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Rate-limited retries of a single page before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 20;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("gitfleet/", env!("CARGO_PKG_VERSION"));

/// The parts of an HTTP response the client looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw `Link` header.
    pub link: Option<String>,
    /// `Retry-After` header in seconds.
    pub retry_after: Option<u64>,
    pub body: String,
}

/// Authenticated HTTP GET. Non-2xx statuses are returned as responses, not
/// errors.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, token: &str) -> Result<HttpResponse, GithubError>;
}

/// [`Transport`] backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, token: &str) -> Result<HttpResponse, GithubError> {
        tracing::debug!(url, "GET request");
        let response = match self
            .agent
            .get(url)
            .set("Authorization", &format!("token {token}"))
            .set("Accept", "application/vnd.github+json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(err) => {
                return Err(GithubError::Transport {
                    url: url.to_string(),
                    message: err.to_string(),
                })
            }
        };

        let status = response.status();
        let link = response.header("Link").map(str::to_owned);
        let retry_after = response
            .header("Retry-After")
            .and_then(|v| v.trim().parse().ok());
        let body = response
            .into_string()
            .map_err(|source| GithubError::ReadBody {
                url: url.to_string(),
                source,
            })?;
        Ok(HttpResponse {
            status,
            link,
            retry_after,
            body,
        })
    }
}

/// Lists every repository of a user or organisation through the search API.
pub struct GithubClient<T: Transport = UreqTransport> {
    transport: T,
    token: String,
    api_base: Url,
    protocol: Protocol,
    backoff: Duration,
    max_retries: u32,
}

impl GithubClient<UreqTransport> {
    /// Client authenticated with `$GITHUB_TOKEN`.
    pub fn from_env() -> Result<Self, GithubError> {
        let token = std::env::var(TOKEN_ENV).unwrap_or_default();
        Self::with_transport(token, UreqTransport::new())
    }
}

impl<T: Transport> GithubClient<T> {
    /// # Errors
    /// [`GithubError::MissingToken`] when `token` is blank.
    pub fn with_transport(token: impl Into<String>, transport: T) -> Result<Self, GithubError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(GithubError::MissingToken);
        }
        Ok(Self {
            transport,
            token,
            api_base: Url::parse(API_BASE_URL)?,
            protocol: Protocol::default(),
            backoff: DEFAULT_BACKOFF,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// Wait used for rate-limit responses that carry no `Retry-After`.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// First-page URL for `user:<identity> fork:true <search>`.
    pub fn search_url(&self, identity: &str, search: &str) -> Result<Url, GithubError> {
        let query = format!("user:{identity} fork:true {search}");
        let mut url = self.api_base.join("search/repositories")?;
        url.query_pairs_mut()
            .append_pair("q", query.trim_end())
            .append_pair("per_page", &PER_PAGE.to_string());
        Ok(url)
    }

    /// Every repository owned by `identity`, forks included, following
    /// pagination to the end.
    pub fn fetch_repos(
        &self,
        identity: &str,
        search: &str,
    ) -> Result<Vec<RepoDescriptor>, GithubError> {
        let mut next = Some(self.search_url(identity, search)?);
        let mut repos = Vec::new();
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let response = self.get_with_backoff(&url)?;
            let page: SearchPage =
                serde_json::from_str(&response.body).map_err(|source| GithubError::Json {
                    url: url.to_string(),
                    source,
                })?;
            pages += 1;
            if page.incomplete_results {
                tracing::warn!(url = %url, "GitHub reported incomplete search results");
            }
            tracing::debug!(
                page = pages,
                items = page.items.len(),
                total = page.total_count,
                "search page"
            );
            repos.extend(
                page.items
                    .into_iter()
                    .map(|item| item.into_descriptor(self.protocol)),
            );
            next = response
                .link
                .as_deref()
                .and_then(next_page_link)
                .map(Url::parse)
                .transpose()?;
        }

        tracing::info!(identity, repos = repos.len(), pages, "fetched remote inventory");
        Ok(repos)
    }

    fn get_with_backoff(&self, url: &Url) -> Result<HttpResponse, GithubError> {
        let mut attempts = 0u32;
        loop {
            let response = self.transport.get(url.as_str(), &self.token)?;
            attempts += 1;
            if (200..300).contains(&response.status) {
                return Ok(response);
            }
            if !is_rate_limited(&response) {
                return Err(GithubError::Status {
                    status: response.status,
                    url: url.to_string(),
                    body: response.body,
                });
            }
            if attempts > self.max_retries {
                return Err(GithubError::RateLimited {
                    url: url.to_string(),
                    attempts,
                });
            }
            let wait = response
                .retry_after
                .map(Duration::from_secs)
                .unwrap_or(self.backoff);
            tracing::warn!(
                url = %url,
                status = response.status,
                wait_secs = wait.as_secs(),
                "rate limited by GitHub, backing off"
            );
            std::thread::sleep(wait);
        }
    }
}

/// 429, or a 403 that names a rate limit or asks us to come back later.
fn is_rate_limited(response: &HttpResponse) -> bool {
    match response.status {
        429 => true,
        403 => {
            response.retry_after.is_some()
                || response.body.to_ascii_lowercase().contains("rate limit")
        }
        _ => false,
    }
}
