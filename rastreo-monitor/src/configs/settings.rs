use std::env;
use std::time::Duration;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

pub const DEFAULT_API_URL: &str =
    "https://apps.mobile.com.py:8443/mbusiness/rest/private/rastreo/resumenzona";
pub const DEFAULT_CODUSUARIO: &str = "3542";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    pub url: String,
    pub codusuario: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Display {
    pub utc_offset_hours: i8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub api: Api,
    pub poll: Poll,
    pub display: Display,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Self::builder()?
            .add_source(File::with_name("configs/default").required(false))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Built-in values only, without files or environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("logger.level", "info")?
            .set_default("logger.file", "rastreo.log")?
            .set_default("api.url", DEFAULT_API_URL)?
            .set_default("api.codusuario", DEFAULT_CODUSUARIO)?
            .set_default("api.username", "")?
            .set_default("api.password", "")?
            .set_default("api.timeout_secs", 30_i64)?
            .set_default("api.connect_timeout_secs", 10_i64)?
            .set_default("poll.interval_secs", DEFAULT_POLL_INTERVAL_SECS as i64)?
            .set_default("display.utc_offset_hours", -3_i64)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs.max(1))
    }

    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.display.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC)
    }
}
