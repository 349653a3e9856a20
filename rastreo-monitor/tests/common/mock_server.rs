use std::net::SocketAddr;
use std::sync::Arc;

use rastreo_mock::MockApi;
use rastreo_mock::settings::{Endpoint, Scenario};
use rastreo_monitor::configs::Api;
use rastreo_monitor::services::TrackingClient;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PATH: &str = "/mbusiness/rest/private/rastreo/resumenzona";
pub const USERNAME: &str = "monitor";
pub const PASSWORD: &str = "s3creto";

/// The mock endpoint served on an ephemeral local port.
pub struct MockServer {
    pub api: Arc<MockApi>,
    pub address: SocketAddr,
    task: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(scenario: Scenario) -> Self {
        let api = MockApi::new(
            Endpoint {
                path: PATH.to_string(),
                username: USERNAME.to_string(),
                password: PASSWORD.to_string(),
            },
            scenario,
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let router = api.router();
        let task = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { api, address, task }
    }

    pub fn api_settings(&self, username: &str, password: &str) -> Api {
        Api {
            url: format!("http://{}{}", self.address, PATH),
            codusuario: String::from("3542"),
            username: username.to_string(),
            password: password.to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
        }
    }

    pub fn client(&self) -> TrackingClient {
        TrackingClient::new(&self.api_settings(USERNAME, PASSWORD)).unwrap()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
