use std::path::Path;
use std::time::Duration;

use araharu_core::{
    DEFAULT_API_BASE_URL, DEFAULT_FALLBACK_VERSION, DEFAULT_PACKAGE_EXTENSION, Repository,
    RepositoryParseError, UpdateConfig,
};
use araharu_platform::AppPaths;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_url")]
    pub app_url: String,

    #[serde(default = "default_in_app_url_prefixes")]
    pub in_app_url_prefixes: Vec<String>,

    #[serde(default = "default_true")]
    pub check_for_updates: bool,

    #[serde(default = "default_release_repository")]
    pub release_repository: String,

    #[serde(default = "default_release_api_base_url")]
    pub release_api_base_url: String,

    #[serde(default = "default_package_extension")]
    pub package_extension: String,

    #[serde(default = "default_fallback_version")]
    pub fallback_version: String,

    #[serde(default = "default_network_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_network_timeout")]
    pub read_timeout_secs: u64,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_true() -> bool {
    true
}

fn default_app_url() -> String {
    "https://araharu.pages.dev".to_string()
}

fn default_in_app_url_prefixes() -> Vec<String> {
    vec!["https://araharu".to_string()]
}

fn default_release_repository() -> String {
    "insushim/iwdaystudy".to_string()
}

fn default_release_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_package_extension() -> String {
    DEFAULT_PACKAGE_EXTENSION.to_string()
}

fn default_fallback_version() -> String {
    DEFAULT_FALLBACK_VERSION.to_string()
}

fn default_network_timeout() -> u64 {
    5
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_url: default_app_url(),
            in_app_url_prefixes: default_in_app_url_prefixes(),
            check_for_updates: true,
            release_repository: default_release_repository(),
            release_api_base_url: default_release_api_base_url(),
            package_extension: default_package_extension(),
            fallback_version: default_fallback_version(),
            connect_timeout_secs: default_network_timeout(),
            read_timeout_secs: default_network_timeout(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl AppSettings {
    /// Load settings from the platform config directory, writing the defaults
    /// there on first start.
    pub fn load_or_init(paths: Option<&AppPaths>) -> Self {
        let Some(paths) = paths else {
            return Self::default();
        };
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            return Self::load_from(&settings_path);
        }

        let settings = Self::default();
        if let Err(error) = paths
            .ensure_dirs()
            .and_then(|()| settings.save_to(&settings_path))
        {
            // Logging is not initialized yet at this point.
            eprintln!(
                "Failed to write default settings to {}: {error}",
                settings_path.display()
            );
        }
        settings
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn update_config(&self) -> Result<UpdateConfig, RepositoryParseError> {
        let repository: Repository = self.release_repository.parse()?;
        let mut config = UpdateConfig::new(repository);
        config.api_base_url.clone_from(&self.release_api_base_url);
        config.package_extension.clone_from(&self.package_extension);
        config.fallback_version.clone_from(&self.fallback_version);
        config.connect_timeout = Duration::from_secs(self.connect_timeout_secs.max(1));
        config.read_timeout = Duration::from_secs(self.read_timeout_secs.max(1));

        if self.package_extension.is_empty() {
            warn!("Empty package extension matches every asset name");
        }
        debug!(
            "Update checks use {} for {}",
            config.api_base_url, config.repository
        );
        Ok(config)
    }
}
