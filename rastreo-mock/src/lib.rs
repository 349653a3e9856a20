use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, Header};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::settings::{Endpoint, Scenario, Settings};

pub mod settings;
pub mod simulate;

#[derive(Debug, Deserialize)]
struct ZoneQuery {
    codusuario: Option<String>,
}

/// In-process stand-in for the zone summary endpoint.
pub struct MockApi {
    endpoint: Endpoint,
    scenario: RwLock<Scenario>,
    hits: AtomicUsize,
}

impl MockApi {
    pub fn new(endpoint: Endpoint, scenario: Scenario) -> Arc<Self> {
        Arc::new(Self {
            endpoint,
            scenario: RwLock::new(scenario),
            hits: AtomicUsize::new(0),
        })
    }

    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route(&self.endpoint.path, get(resumen_zona))
            .with_state(Arc::clone(self))
    }

    pub async fn set_scenario(&self, scenario: Scenario) {
        *self.scenario.write().await = scenario;
    }

    /// Requests that passed authentication.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let mut values = headers.get_all(header::AUTHORIZATION).iter();

        Authorization::<Basic>::decode(&mut values).is_ok_and(|credentials| {
            credentials.username() == self.endpoint.username
                && credentials.password() == self.endpoint.password
        })
    }
}

async fn resumen_zona(
    State(api): State<Arc<MockApi>>,
    Query(query): Query<ZoneQuery>,
    headers: HeaderMap,
) -> Response {
    if !api.authorized(&headers) {
        tracing::warn!("Rejected request without valid credentials");
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic realm=\"rastreo\""))],
        )
            .into_response();
    }

    let Some(codusuario) = query.codusuario else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    api.hits.fetch_add(1, Ordering::SeqCst);
    let scenario = api.scenario.read().await.clone();
    tracing::debug!(%codusuario, ?scenario, "Serving zone summary");

    match scenario {
        Scenario::Simulated { devices, single, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let now_millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
            let fleet = simulate::fleet(devices, now_millis, &mut rng);

            let body = if single {
                fleet.first().map(serde_json::to_string).transpose()
            } else {
                serde_json::to_string(&fleet).map(Some)
            };

            match body {
                Ok(body) => json(body.unwrap_or_else(|| "null".to_string())),
                Err(e) => {
                    tracing::error!("Failed to encode simulated fleet: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        Scenario::Fixed { body } => json(body),
        Scenario::Failing { status } => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}

fn json(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let api = MockApi::new(settings.endpoint.clone(), settings.scenario.clone());

    let ip_addr = settings.server.host.parse::<IpAddr>()?;
    let address = SocketAddr::from((ip_addr, settings.server.port));
    let listener = TcpListener::bind(&address).await?;

    tracing::info!("listening on {:?}{}", address, settings.endpoint.path);

    axum::serve(listener, api.router()).await?;

    Ok(())
}
