use std::time::Duration;

use log::{debug, info};

use crate::release::{
    DEFAULT_API_BASE_URL, FetchError, GitHubReleases, ReleaseInfo, ReleaseSource, Repository,
    build_http_client,
};
use crate::version::is_newer_version;

pub const DEFAULT_PACKAGE_EXTENSION: &str = ".apk";
pub const DEFAULT_FALLBACK_VERSION: &str = "1.0.0";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the update check needs to know about where to look and how long
/// to wait.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub api_base_url: String,
    pub repository: Repository,
    pub package_extension: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Reported as the installed version when the host cannot tell.
    pub fallback_version: String,
}

impl UpdateConfig {
    #[must_use]
    pub fn new(repository: Repository) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            repository,
            package_extension: DEFAULT_PACKAGE_EXTENSION.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            fallback_version: DEFAULT_FALLBACK_VERSION.to_string(),
        }
    }

    /// Build the GitHub-backed release source described by this config.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn release_source(&self) -> Result<GitHubReleases, FetchError> {
        let client = build_http_client(self.connect_timeout, self.read_timeout)?;
        Ok(GitHubReleases::new(
            client,
            self.api_base_url.clone(),
            self.repository.clone(),
            self.package_extension.clone(),
        ))
    }
}

/// Reports the version of the application that is currently installed.
pub trait VersionSource: Send + Sync {
    fn installed_version(&self) -> Option<String>;
}

impl<F> VersionSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn installed_version(&self) -> Option<String> {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUpdate {
    pub current_version: String,
    pub latest_version: String,
    pub notes: String,
    pub asset_url: String,
    pub release_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    NoUpdate,
    UpdateAvailable(AppUpdate),
}

impl UpdateDecision {
    #[must_use]
    pub fn update(&self) -> Option<&AppUpdate> {
        match self {
            Self::NoUpdate => None,
            Self::UpdateAvailable(update) => Some(update),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    Checking,
    Done(UpdateDecision),
}

pub struct UpdateCoordinator<R, V> {
    releases: R,
    installed: V,
    fallback_version: String,
}

impl<R, V> UpdateCoordinator<R, V>
where
    R: ReleaseSource,
    V: VersionSource,
{
    pub fn new(releases: R, installed: V, fallback_version: impl Into<String>) -> Self {
        Self {
            releases,
            installed,
            fallback_version: fallback_version.into(),
        }
    }

    /// Run one update check. Failures are logged and reported as
    /// [`UpdateDecision::NoUpdate`].
    pub async fn check(&self) -> UpdateDecision {
        match self.releases.fetch_latest().await {
            Ok(release) => self.decide(release),
            Err(error) => {
                debug!("Update check failed: {error}");
                UpdateDecision::NoUpdate
            }
        }
    }

    fn current_version(&self) -> String {
        self.installed
            .installed_version()
            .map(|version| version.trim().to_string())
            .filter(|version| !version.is_empty())
            .unwrap_or_else(|| {
                debug!(
                    "Installed version unavailable, assuming {}",
                    self.fallback_version
                );
                self.fallback_version.clone()
            })
    }

    fn decide(&self, release: ReleaseInfo) -> UpdateDecision {
        let current = self.current_version();

        if !is_newer_version(&release.version, &current) {
            debug!(
                "No update: latest {} is not newer than installed {current}",
                release.version
            );
            return UpdateDecision::NoUpdate;
        }

        let Some(asset_url) = release.asset_url.filter(|url| !url.is_empty()) else {
            debug!(
                "Release {} is newer but has no installable asset",
                release.version
            );
            return UpdateDecision::NoUpdate;
        };

        info!("Update available: {current} -> {}", release.version);
        UpdateDecision::UpdateAvailable(AppUpdate {
            current_version: current,
            latest_version: release.version,
            notes: release.notes,
            asset_url,
            release_url: release.release_url,
        })
    }
}
