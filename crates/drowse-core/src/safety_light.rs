// ── Safety light reconciliation ──
//
// The bed exposes only a stateless toggle relay for its under-bed
// safety light. This module wraps it as a settable boolean: read the
// current state, compare against the desired one, and fire the relay
// only when they differ.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use drowse_api::BedClient;

use crate::error::CoreError;

/// Serializes concurrent set operations for one bed.
///
/// The read-then-toggle sequence is a check-then-act race when two
/// callers overlap: both can read the same stale state and fire the
/// relay twice, leaving the light opposite to what either wanted.
/// Supplying a gate makes the whole sequence atomic per bed.
pub type ReconcileGate = Arc<Mutex<()>>;

/// Idempotent on/off control over the stateless safety-light relay.
pub struct SafetyLight {
    client: Arc<BedClient>,
    gate: Option<ReconcileGate>,
}

impl SafetyLight {
    /// A reconciler with no serialization; overlapping
    /// [`set`](Self::set) calls may interleave their read and toggle
    /// steps.
    pub fn new(client: Arc<BedClient>) -> Self {
        Self { client, gate: None }
    }

    /// A reconciler whose set operations serialize through `gate`.
    pub fn with_gate(client: Arc<BedClient>, gate: ReconcileGate) -> Self {
        Self {
            client,
            gate: Some(gate),
        }
    }

    /// Current light state; `None` when the bed reports no snapshot.
    pub async fn current(&self) -> Result<Option<bool>, CoreError> {
        Ok(self.client.safety_light().await?)
    }

    /// Drive the light toward `desired`.
    ///
    /// Reads the current state first. Unknown state gets one
    /// best-effort toggle; a matching state sends nothing; a differing
    /// state fires the relay exactly once. There is no read-back here;
    /// callers needing confirmation use
    /// [`set_and_confirm`](Self::set_and_confirm).
    pub async fn set(&self, desired: bool) -> Result<(), CoreError> {
        let _permit = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        match self.client.safety_light().await? {
            None => {
                debug!("light state unknown, firing best-effort toggle");
                self.client.toggle_safety_light().await?;
            }
            Some(current) if current == desired => {
                debug!(desired, "light already in desired state, nothing to send");
            }
            Some(_) => {
                self.client.toggle_safety_light().await?;
            }
        }
        Ok(())
    }

    /// Drive the light toward `desired`, then re-read the actual state.
    ///
    /// Returns the confirmed state, or `None` when the confirming read
    /// found no snapshot.
    pub async fn set_and_confirm(&self, desired: bool) -> Result<Option<bool>, CoreError> {
        self.set(desired).await?;
        self.current().await
    }
}
