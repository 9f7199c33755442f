#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use data_service::config::{DataConfig, MongoConfig};
use data_service::services::{DataStore, InMemoryStore};
use data_service::startup::{build_router, AppState, Application};
use http_body_util::BodyExt;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> DataConfig {
    DataConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        service_name: "data-service-test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig::default(),
        reset_on_startup: false,
    }
}

pub fn router_with(store: Arc<InMemoryStore>) -> Router {
    build_router(AppState::new(store as Arc<dyn DataStore>))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Failed to execute request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn get_data() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/data")
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/data")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn post_json(json: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/data")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub const MULTIPART_BOUNDARY: &str = "data-service-boundary";

/// `multipart/form-data` POST with one text part per `(name, value)`.
pub fn post_multipart(fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            MULTIPART_BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", MULTIPART_BOUNDARY));

    Request::builder()
        .method("POST")
        .uri("/data")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(InMemoryStore::new()), false).await
    }

    pub async fn spawn_with(store: Arc<InMemoryStore>, reset_on_startup: bool) -> Self {
        let mut config = test_config();
        config.reset_on_startup = reset_on_startup;

        let app = Application::build_with_store(config, store.clone() as Arc<dyn DataStore>)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
        }
    }

    pub fn data_url(&self) -> String {
        format!("{}/data", self.address)
    }
}
