// ── Environment polling ──
//
// Polls the latest environment sensor data on a fixed interval and
// publishes each sample through a watch channel. A failed poll is
// logged and the loop keeps going; consumers keep the last good
// sample until a newer one lands.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use drowse_api::{BedClient, EnvironmentSample};

/// Background task polling one bed's environment sensors.
pub struct EnvironmentMonitor {
    latest: watch::Receiver<Option<EnvironmentSample>>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EnvironmentMonitor {
    /// Spawn the polling task. The first poll fires immediately and
    /// the interval starts after it. `period` must be non-zero.
    pub fn start(client: Arc<BedClient>, period: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            poll_loop(client, &tx, period, task_cancel).await;
        });
        Self {
            latest: rx,
            cancel,
            task: Mutex::new(Some(handle)),
        }
    }

    /// Subscribe to samples. The value is `None` until the first
    /// successful poll.
    pub fn subscribe(&self) -> watch::Receiver<Option<EnvironmentSample>> {
        self.latest.clone()
    }

    /// The most recent good sample, if any poll has succeeded yet.
    pub fn latest(&self) -> Option<EnvironmentSample> {
        self.latest.borrow().clone()
    }

    /// Stop polling and wait for the task to finish.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.task.lock().await.take() {
            let _ = handle.await;
        }
        debug!("environment monitor stopped");
    }
}

async fn poll_loop(
    client: Arc<BedClient>,
    tx: &watch::Sender<Option<EnvironmentSample>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match client.environment().await {
                    Ok(sample) => {
                        tx.send_replace(Some(sample));
                    }
                    Err(e) => warn!(error = %e, "environment poll failed"),
                }
            }
        }
    }
}
