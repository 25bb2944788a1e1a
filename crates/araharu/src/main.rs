mod error;
mod logging;
mod prompt;
mod settings;
mod shell;

use std::io;

use araharu_core::{PendingUpdateCheck, UpdateCoordinator, UpdateDecision, spawn_update_check};
use araharu_platform::AppPaths;
use log::{debug, info, warn};

use crate::error::AppError;
use crate::prompt::{SystemOpener, TerminalPresenter, UpdatePresenter};
use crate::settings::AppSettings;
use crate::shell::{NavigationPolicy, Shell, SystemBrowserView};

fn installed_version() -> Option<String> {
    Some(env!("CARGO_PKG_VERSION").to_string()).filter(|version| !version.is_empty())
}

fn start_update_check(settings: &AppSettings) -> Result<PendingUpdateCheck, AppError> {
    let config = settings
        .update_config()
        .map_err(AppError::update_check_unavailable)?;
    let releases = config
        .release_source()
        .map_err(AppError::update_check_unavailable)?;
    let coordinator = UpdateCoordinator::new(releases, installed_version, config.fallback_version);
    Ok(spawn_update_check(coordinator))
}

async fn present_decision(decision: UpdateDecision) {
    let UpdateDecision::UpdateAvailable(update) = decision else {
        debug!("No update to present");
        return;
    };

    let result = tokio::task::spawn_blocking(move || {
        let mut presenter = TerminalPresenter::new(io::stdin().lock(), io::stdout(), SystemOpener);
        presenter.on_update_available(&update)
    })
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(error)) => warn!("{error}"),
        Err(error) => warn!("Update prompt task failed: {error}"),
    }
}

#[tokio::main]
async fn main() {
    let paths = AppPaths::new().ok();
    let settings = AppSettings::load_or_init(paths.as_ref());
    logging::init_logging(
        paths.as_ref(),
        settings.debug_logging,
        settings.max_log_size_bytes,
    );
    info!("Starting Araharu {}", env!("CARGO_PKG_VERSION"));

    let mut shell = Shell::new(
        NavigationPolicy::from_settings(&settings),
        SystemBrowserView,
        SystemOpener,
    );
    if let Err(error) = shell.load_app() {
        warn!("{error}");
    }

    if !settings.check_for_updates {
        debug!("Update checks disabled in settings");
        return;
    }

    match start_update_check(&settings) {
        Ok(pending) => present_decision(pending.wait().await).await,
        Err(error) => warn!("{error}"),
    }
}
