use std::io;

use log::{debug, info};

use crate::error::AppError;
use crate::prompt::UrlOpener;
use crate::settings::AppSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    InApp,
    External,
}

/// Decides which URLs belong to the web application.
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    app_url: String,
    in_app_prefixes: Vec<String>,
}

impl NavigationPolicy {
    pub fn new(app_url: impl Into<String>, in_app_prefixes: Vec<String>) -> Self {
        Self {
            app_url: app_url.into(),
            in_app_prefixes,
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(
            settings.app_url.clone(),
            settings.in_app_url_prefixes.clone(),
        )
    }

    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    pub fn decide(&self, url: &str) -> Navigation {
        let in_app = (!self.app_url.is_empty() && url.starts_with(&self.app_url))
            || self
                .in_app_prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && url.starts_with(prefix.as_str()));

        if in_app {
            Navigation::InApp
        } else {
            Navigation::External
        }
    }
}

/// The view that displays the web application.
pub trait BrowserView {
    fn load_url(&mut self, url: &str) -> io::Result<()>;
}

/// Delegates display to the host's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowserView;

impl BrowserView for SystemBrowserView {
    fn load_url(&mut self, url: &str) -> io::Result<()> {
        open::that(url)
    }
}

pub struct Shell<B, O> {
    policy: NavigationPolicy,
    view: B,
    opener: O,
}

impl<B, O> Shell<B, O>
where
    B: BrowserView,
    O: UrlOpener,
{
    pub fn new(policy: NavigationPolicy, view: B, opener: O) -> Self {
        Self {
            policy,
            view,
            opener,
        }
    }

    /// Show the web application's start page.
    pub fn load_app(&mut self) -> Result<(), AppError> {
        let app_url = self.policy.app_url().to_string();
        info!("Loading {app_url}");
        self.navigate(&app_url).map(|_| ())
    }

    /// Route a navigation request either into the view or out to the host.
    pub fn navigate(&mut self, url: &str) -> Result<Navigation, AppError> {
        let navigation = self.policy.decide(url);
        match navigation {
            Navigation::InApp => self
                .view
                .load_url(url)
                .map_err(|error| AppError::open_url_failed("page", url, error))?,
            Navigation::External => {
                debug!("Opening external link {url}");
                self.opener
                    .open_url(url)
                    .map_err(|error| AppError::open_url_failed("external link", url, error))?;
            }
        }
        Ok(navigation)
    }
}
