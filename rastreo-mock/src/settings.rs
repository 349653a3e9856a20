use std::error::Error;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

/// Route and basic credentials the mock accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub username: String,
    pub password: String,
}

/// What the endpoint answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Scenario {
    /// A generated fleet, as a list or a single object
    Simulated {
        devices: usize,
        #[serde(default)]
        single: bool,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// A verbatim JSON body
    Fixed { body: String },
    /// A bare error status
    Failing { status: u16 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub server: Server,
    pub endpoint: Endpoint,
    pub scenario: Scenario,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let settings = toml::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/mock.toml"
        )))?;

        Ok(settings)
    }
}
