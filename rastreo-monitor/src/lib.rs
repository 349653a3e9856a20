use std::sync::Arc;

use tokio::sync::mpsc;

use crate::configs::Settings;
use crate::services::{Poller, TrackingClient};

pub mod configs;
pub mod dashboard;
pub mod errors;
pub mod services;
pub mod status;

pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<()> {
    let client = TrackingClient::new(&settings.api)?;
    if settings.api.username.is_empty() {
        tracing::warn!("No API username configured, requests will likely be rejected");
    }

    tracing::info!(
        url = client.url(),
        interval = ?settings.poll_interval(),
        "Polling tracking summary"
    );

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let poller = Poller::spawn(Arc::new(client), settings.poll_interval(), events_tx);

    dashboard::terminal::run(poller, events_rx, settings.utc_offset()).await?;

    Ok(())
}
