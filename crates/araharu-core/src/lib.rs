//! Update checking for the Araharu shell.
//!
//! This crate holds the logic that is independent of the presentation layer:
//! - Dot-separated numeric version comparison.
//! - Fetching the latest release from the GitHub releases API.
//! - Deciding whether the installed application should offer an update.
//! - Running that decision on a background task with a one-shot handoff.

mod release;
mod task;
mod update;
pub mod version;

/// Release model, GitHub fetcher and the source trait the coordinator uses.
pub use release::{
    DEFAULT_API_BASE_URL, FetchError, GitHubAsset, GitHubRelease, GitHubReleases, ReleaseInfo,
    ReleaseSource, Repository, RepositoryParseError, build_http_client, fetch_latest_release,
};
/// Background execution of an update check.
pub use task::{PendingUpdateCheck, spawn_update_check};
/// Update decision types and the coordinator producing them.
pub use update::{
    AppUpdate, CheckState, DEFAULT_CONNECT_TIMEOUT, DEFAULT_FALLBACK_VERSION,
    DEFAULT_PACKAGE_EXTENSION, DEFAULT_READ_TIMEOUT, UpdateConfig, UpdateCoordinator,
    UpdateDecision, VersionSource,
};
/// Version comparison helpers.
pub use version::{SemanticVersion, VersionParseError, is_newer_version};
