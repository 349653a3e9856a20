use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use rastreo_monitor::configs::Settings;
use rastreo_monitor::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Arc::new(Settings::new().context("Failed to load settings.")?);

    // The dashboard owns the terminal, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.logger.file)
        .with_context(|| format!("Failed to open log file {}", settings.logger.file))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level}").into()
        }))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    run(&settings).await
}
