// ── Momentary command switches ──
//
// A momentary command has no persistent device state: pressing it
// fires one adjustable-base command and the switch reports "on" for a
// fixed window before reverting to "off" on its own. Only the timer
// represents "off"; there is no command to send on release.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

use drowse_api::BedClient;

use crate::config::MomentaryCommandSpec;
use crate::error::CoreError;

/// How long a pressed switch reports "on" before auto-reverting.
pub const DEFAULT_REVERT_AFTER: Duration = Duration::from_millis(300);

/// One momentary command exposed as an auto-reverting switch.
///
/// Pressing reports "on" through the watch channel, fires the command,
/// and schedules the reversion to "off". A new press while a reversion
/// is pending cancels the stale timer and restarts the window, so the
/// "off" edge is observed exactly once per final press. Releasing
/// early cancels the timer and reports "off" immediately without
/// sending anything.
pub struct MomentarySwitch {
    client: Arc<BedClient>,
    spec: MomentaryCommandSpec,
    state: watch::Sender<bool>,
    revert_after: Duration,
    pending_revert: Mutex<Option<JoinHandle<()>>>,
}

impl MomentarySwitch {
    pub fn new(client: Arc<BedClient>, spec: MomentaryCommandSpec) -> Arc<Self> {
        Self::with_revert_after(client, spec, DEFAULT_REVERT_AFTER)
    }

    /// A switch with a custom reversion window.
    pub fn with_revert_after(
        client: Arc<BedClient>,
        spec: MomentaryCommandSpec,
        revert_after: Duration,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(false);
        Arc::new(Self {
            client,
            spec,
            state,
            revert_after,
            pending_revert: Mutex::new(None),
        })
    }

    /// Trigger the command: report "on", fire it at the bed, and
    /// schedule the automatic reversion.
    ///
    /// The reversion runs whether or not the send succeeded, so the
    /// switch never sticks "on". Send failures are logged here and
    /// also returned for callers that want the outcome.
    pub async fn press(self: &Arc<Self>) -> Result<(), CoreError> {
        self.cancel_pending_revert().await;
        self.state.send_replace(true);

        let outcome = self
            .client
            .send_command(&self.spec.request())
            .await
            .map(|_| ())
            .map_err(CoreError::from);

        match &outcome {
            Ok(()) => {
                info!(command = self.spec.command, name = %self.spec.name, "sent momentary command");
            }
            Err(e) => {
                error!(error = %e, command = self.spec.command, name = %self.spec.name, "momentary command failed");
            }
        }

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(this.revert_after).await;
            this.state.send_replace(false);
        });
        *self.pending_revert.lock().await = Some(handle);

        outcome
    }

    /// Release early: report "off" immediately, cancel any pending
    /// reversion, and send nothing.
    pub async fn release(&self) {
        self.cancel_pending_revert().await;
        self.state.send_replace(false);
    }

    /// Observe the switch state; `true` while triggered.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Whether the switch currently reports "on".
    pub fn is_triggered(&self) -> bool {
        *self.state.borrow()
    }

    /// The command spec this switch fires.
    pub fn spec(&self) -> &MomentaryCommandSpec {
        &self.spec
    }

    async fn cancel_pending_revert(&self) {
        if let Some(handle) = self.pending_revert.lock().await.take() {
            handle.abort();
        }
    }
}
