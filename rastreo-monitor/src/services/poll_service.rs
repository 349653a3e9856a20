use std::sync::Arc;
use std::time::Duration;

use rastreo_api::DeviceRecord;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::fetch_service::DeviceSource;

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A fetch went out
    Started,
    /// A fetch succeeded with a fresh snapshot
    Loaded(Vec<DeviceRecord>),
    /// A fetch failed, with the message to show
    Failed(String),
}

/// Periodic fetch task. Fetches run one at a time: ticks missed during a slow
/// fetch are skipped and refresh requests made meanwhile collapse into one.
pub struct Poller {
    refresh_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Fetches immediately, then once per `period`.
    pub fn spawn(
        source: Arc<dyn DeviceSource>,
        period: Duration,
        events: mpsc::UnboundedSender<PollEvent>,
    ) -> Self {
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let task = tokio::spawn(poll_loop(source, period, refresh_rx, events));

        Self { refresh_tx, task }
    }

    /// Queues an out-of-schedule fetch. Returns `false` if one is already queued.
    pub fn refresh(&self) -> bool {
        self.refresh_tx.try_send(()).is_ok()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops polling. A fetch still in flight is dropped with its result.
    pub fn shutdown(self) {}
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop(
    source: Arc<dyn DeviceSource>,
    period: Duration,
    mut refresh_rx: mpsc::Receiver<()>,
    events: mpsc::UnboundedSender<PollEvent>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            request = refresh_rx.recv() => {
                if request.is_none() {
                    break;
                }
                tracing::debug!("Manual refresh requested");
            }
        }

        if events.send(PollEvent::Started).is_err() {
            break;
        }

        let event = match source.fetch().await {
            Ok(devices) => {
                tracing::info!(devices = devices.len(), "Device list refreshed");
                PollEvent::Loaded(devices)
            }
            Err(e) => {
                tracing::warn!(transient = e.is_transient(), "Failed to fetch devices: {}", e);
                PollEvent::Failed(e.to_string())
            }
        };

        if events.send(event).is_err() {
            break;
        }
    }

    tracing::debug!("Poller stopped");
}
