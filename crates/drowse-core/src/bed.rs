// ── Bed facade ──
//
// One `Bed` owns the API client, the gated safety-light reconciler,
// the configured momentary switches, and the lazily started
// environment monitor. Cloning is cheap; clones share all state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tracing::debug;

use drowse_api::{BedClient, COMMAND_SAFETY_LIGHT_TOGGLE, EnvironmentSample, StatusSnapshot};

use crate::config::{BedConfig, MomentaryCommandSpec};
use crate::error::CoreError;
use crate::monitor::EnvironmentMonitor;
use crate::safety_light::{ReconcileGate, SafetyLight};
use crate::switch::MomentarySwitch;

/// Facade over one configured bed.
#[derive(Clone)]
pub struct Bed {
    inner: Arc<BedInner>,
}

struct BedInner {
    client: Arc<BedClient>,
    light: SafetyLight,
    commands: Vec<MomentaryCommandSpec>,
    switches: Vec<Arc<MomentarySwitch>>,
    monitor: Mutex<Option<EnvironmentMonitor>>,
    env_poll_interval: Duration,
}

impl Bed {
    /// Build a bed from its runtime config.
    ///
    /// No background work starts here; the environment monitor spawns
    /// on the first [`watch_environment`](Self::watch_environment) call.
    pub fn new(config: &BedConfig) -> Result<Self, CoreError> {
        let client = Arc::new(BedClient::new(config.client_config())?);
        let gate: ReconcileGate = Arc::new(Mutex::new(()));
        let light = SafetyLight::with_gate(Arc::clone(&client), gate);

        // The safety-light code is stateful and routes through the
        // reconciler, never through a momentary switch.
        let mut switches = Vec::new();
        for spec in &config.commands {
            if spec.command == COMMAND_SAFETY_LIGHT_TOGGLE {
                debug!(name = %spec.name, "safety-light code in command list, exposed via the light interface");
                continue;
            }
            switches.push(MomentarySwitch::new(Arc::clone(&client), spec.clone()));
        }

        Ok(Self {
            inner: Arc::new(BedInner {
                client,
                light,
                commands: config.commands.clone(),
                switches,
                monitor: Mutex::new(None),
                env_poll_interval: Duration::from_secs(config.env_poll_interval_secs),
            }),
        })
    }

    /// The resolved processor id for this bed.
    pub async fn processor_id(&self) -> Result<i64, CoreError> {
        Ok(self.inner.client.processor_id().await?)
    }

    /// The canonical status snapshot, if the bed reported one.
    pub async fn status(&self) -> Result<Option<StatusSnapshot>, CoreError> {
        Ok(self.inner.client.status_snapshot().await?)
    }

    /// Current safety-light state; `None` when unknown.
    pub async fn light(&self) -> Result<Option<bool>, CoreError> {
        self.inner.light.current().await
    }

    /// Drive the safety light toward `desired` and report the
    /// confirmed state afterwards.
    pub async fn set_light(&self, desired: bool) -> Result<Option<bool>, CoreError> {
        self.inner.light.set_and_confirm(desired).await
    }

    /// Press a momentary command by configured name or raw code.
    ///
    /// Configured names resolve to their live switch; a bare integer
    /// presses a one-off switch for that code.
    pub async fn press(&self, target: &str) -> Result<(), CoreError> {
        let spec = self.resolve_command(target)?;
        if spec.command == COMMAND_SAFETY_LIGHT_TOGGLE {
            return Err(CoreError::Config {
                message: format!(
                    "'{}' drives the stateful safety light; use the light operations instead",
                    spec.name
                ),
            });
        }
        if let Some(switch) = self
            .inner
            .switches
            .iter()
            .find(|s| s.spec().name == spec.name)
        {
            return switch.press().await;
        }
        MomentarySwitch::new(Arc::clone(&self.inner.client), spec)
            .press()
            .await
    }

    /// One-shot environment fetch, bypassing the monitor.
    pub async fn environment(&self) -> Result<EnvironmentSample, CoreError> {
        Ok(self.inner.client.environment().await?)
    }

    /// Samples from the background monitor, starting it on first use.
    pub async fn watch_environment(
        &self,
    ) -> Result<watch::Receiver<Option<EnvironmentSample>>, CoreError> {
        if self.inner.env_poll_interval.is_zero() {
            return Err(CoreError::Config {
                message: "environment polling is disabled (interval 0)".into(),
            });
        }
        let mut slot = self.inner.monitor.lock().await;
        let monitor = slot.get_or_insert_with(|| {
            EnvironmentMonitor::start(Arc::clone(&self.inner.client), self.inner.env_poll_interval)
        });
        Ok(monitor.subscribe())
    }

    /// The configured momentary commands, in config order.
    pub fn commands(&self) -> &[MomentaryCommandSpec] {
        &self.inner.commands
    }

    /// The live switches backing the configured commands.
    pub fn switches(&self) -> &[Arc<MomentarySwitch>] {
        &self.inner.switches
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        if let Some(monitor) = self.inner.monitor.lock().await.take() {
            monitor.shutdown().await;
        }
    }

    fn resolve_command(&self, target: &str) -> Result<MomentaryCommandSpec, CoreError> {
        if let Some(spec) = self.inner.commands.iter().find(|c| c.name == target) {
            return Ok(spec.clone());
        }
        if let Ok(code) = target.parse::<i64>() {
            return Ok(MomentaryCommandSpec::bare(code));
        }
        Err(CoreError::UnknownCommand {
            name: target.into(),
        })
    }
}
