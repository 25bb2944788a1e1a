use log::debug;
use tokio::sync::oneshot;

use crate::release::ReleaseSource;
use crate::update::{CheckState, UpdateCoordinator, UpdateDecision, VersionSource};

/// Foreground end of a background update check.
///
/// Await [`wait`] to consume the handle, or call [`poll_decision`] from a loop
/// that must not block; it hands out the decision once.
///
/// [`wait`]: PendingUpdateCheck::wait
/// [`poll_decision`]: PendingUpdateCheck::poll_decision
#[derive(Debug)]
pub struct PendingUpdateCheck {
    receiver: Option<oneshot::Receiver<UpdateDecision>>,
    state: CheckState,
}

impl PendingUpdateCheck {
    #[must_use]
    pub fn state(&self) -> &CheckState {
        &self.state
    }

    /// Wait for the background check to finish.
    ///
    /// A task that ended without reporting counts as no update.
    pub async fn wait(self) -> UpdateDecision {
        match (self.receiver, self.state) {
            (Some(receiver), _) => receiver.await.unwrap_or_else(|_| {
                debug!("Update check task ended without a result");
                UpdateDecision::NoUpdate
            }),
            (None, CheckState::Done(decision)) => decision,
            (None, CheckState::Checking) => UpdateDecision::NoUpdate,
        }
    }

    /// Take the decision if the check has finished since the last call.
    ///
    /// Returns `None` while checking and after the decision was taken once.
    pub fn poll_decision(&mut self) -> Option<UpdateDecision> {
        let receiver = self.receiver.as_mut()?;
        let decision = match receiver.try_recv() {
            Ok(decision) => decision,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => {
                debug!("Update check task ended without a result");
                UpdateDecision::NoUpdate
            }
        };
        self.receiver = None;
        self.state = CheckState::Done(decision.clone());
        Some(decision)
    }
}

/// Run `coordinator.check()` on a background task.
///
/// Must be called from within a tokio runtime.
pub fn spawn_update_check<R, V>(coordinator: UpdateCoordinator<R, V>) -> PendingUpdateCheck
where
    R: ReleaseSource + 'static,
    V: VersionSource + 'static,
{
    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let decision = coordinator.check().await;
        if sender.send(decision).is_err() {
            debug!("Update check finished after its consumer went away, discarding result");
        }
    });

    PendingUpdateCheck {
        receiver: Some(receiver),
        state: CheckState::Checking,
    }
}
