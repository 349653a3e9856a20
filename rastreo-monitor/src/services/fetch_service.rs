use std::time::Duration;

use async_trait::async_trait;
use rastreo_api::{DeviceRecord, ResponseShape, TrackingResponse};
use reqwest::header::CONTENT_TYPE;

use crate::configs::Api;
use crate::errors::FetchError;

/// Anything that can produce the current device list.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<DeviceRecord>, FetchError>;
}

/// Client for the zone summary endpoint.
pub struct TrackingClient {
    http_client: reqwest::Client,
    url: String,
    codusuario: String,
    username: String,
    password: String,
}

impl TrackingClient {
    pub fn new(api: &Api) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            url: api.url.clone(),
            codusuario: api.codusuario.clone(),
            username: api.username.clone(),
            password: api.password.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DeviceSource for TrackingClient {
    async fn fetch(&self) -> Result<Vec<DeviceRecord>, FetchError> {
        let response = self
            .http_client
            .get(&self.url)
            .query(&[("codusuario", self.codusuario.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let TrackingResponse {
            devices,
            shape,
            skipped,
        } = TrackingResponse::from_slice(&body)?;

        match shape {
            ResponseShape::Unexpected => {
                tracing::warn!("Tracking summary is neither a record nor a list, treating as empty")
            }
            ResponseShape::Empty => tracing::debug!("Tracking summary is null"),
            ResponseShape::List | ResponseShape::Single => {}
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Ignored entries that are not device records");
        }

        tracing::debug!(devices = devices.len(), ?shape, "Fetched tracking summary");

        Ok(devices)
    }
}
