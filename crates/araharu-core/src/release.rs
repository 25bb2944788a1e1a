use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "araharu";

/// A release as published on the hosting API, reduced to what the update
/// decision needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub version: String,
    pub notes: String,
    pub asset_url: Option<String>,
    pub release_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(deserialize_with = "nullable")]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    pub assets: Vec<GitHubAsset>,
}

// Present but possibly `null`; unlike a bare `Option` field, a missing key is
// still an error.
fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl GitHubRelease {
    /// Converts the API payload, picking the first asset whose name ends in
    /// `package_extension`.
    #[must_use]
    pub fn into_release_info(self, package_extension: &str) -> ReleaseInfo {
        let version = self
            .tag_name
            .trim()
            .strip_prefix('v')
            .unwrap_or(self.tag_name.trim())
            .to_string();

        let asset_url = self
            .assets
            .into_iter()
            .find(|asset| asset.name.ends_with(package_extension))
            .map(|asset| asset.browser_download_url);

        let published_at = self
            .published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|date| date.with_timezone(&Utc));

        ReleaseInfo {
            version,
            notes: self.body.unwrap_or_default(),
            asset_url,
            release_url: self.html_url,
            published_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryParseError {
    #[error("repository must be in the form owner/name, got {0:?}")]
    InvalidFormat(String),
}

/// `owner/name` pair identifying the repository whose releases are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = RepositoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || RepositoryParseError::InvalidFormat(value.to_string());
        let (owner, name) = value.trim().split_once('/').ok_or_else(invalid)?;

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("release request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("release request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("release request failed with HTTP {status}{body_snippet}")]
    HttpStatus {
        status: StatusCode,
        body_snippet: String,
    },
    #[error("failed to parse release response: {0}")]
    Parse(#[source] reqwest::Error),
}

impl FetchError {
    fn request(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Request(error)
        }
    }

    fn parse(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Parse(error)
        }
    }
}

/// Build the HTTP client used for release checks.
///
/// # Errors
/// Returns [`FetchError::Client`] when the TLS backend cannot be initialized.
pub fn build_http_client(
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .read_timeout(read_timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(FetchError::Client)
}

/// Fetch the latest published release of `repository`.
///
/// # Errors
/// Returns an error for any status other than 200, for network failures and
/// timeouts, and when the body is not a release object.
pub async fn fetch_latest_release(
    client: &reqwest::Client,
    api_base_url: &str,
    repository: &Repository,
    package_extension: &str,
) -> Result<ReleaseInfo, FetchError> {
    let url = format!(
        "{}/repos/{}/{}/releases/latest",
        api_base_url.trim_end_matches('/'),
        repository.owner,
        repository.name
    );
    debug!("Fetching latest release from {url}");

    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
        .send()
        .await
        .map_err(FetchError::request)?;

    if response.status() != StatusCode::OK {
        let status = response.status();
        let body_snippet = response
            .text()
            .await
            .ok()
            .map(|body| response_snippet(&body, 160))
            .unwrap_or_default();
        return Err(FetchError::HttpStatus {
            status,
            body_snippet,
        });
    }

    let release: GitHubRelease = response.json().await.map_err(FetchError::parse)?;
    Ok(release.into_release_info(package_extension))
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}

/// Where the coordinator gets release information from.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<ReleaseInfo, FetchError>;
}

/// [`ReleaseSource`] backed by the GitHub releases API.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    client: reqwest::Client,
    api_base_url: String,
    repository: Repository,
    package_extension: String,
}

impl GitHubReleases {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_base_url: impl Into<String>,
        repository: Repository,
        package_extension: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.into(),
            repository,
            package_extension: package_extension.into(),
        }
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    async fn fetch_latest(&self) -> Result<ReleaseInfo, FetchError> {
        fetch_latest_release(
            &self.client,
            &self.api_base_url,
            &self.repository,
            &self.package_extension,
        )
        .await
    }
}
