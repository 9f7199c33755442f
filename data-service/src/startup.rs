//! Router assembly and server lifecycle.

use crate::config::DataConfig;
use crate::dtos::Envelope;
use crate::handlers;
use crate::middleware::session_middleware;
use crate::services::{initialize_store, DataStore, MongoGateway};
use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

/// All routes with their middleware stack.
///
/// The session middleware only guards `/data`; health and metrics stay
/// reachable while the store is down.
pub fn build_router(state: AppState) -> Router {
    let data_routes = Router::new()
        .route("/data", get(handlers::get_data).post(handlers::post_data))
        .route_layer(from_fn_with_state(state.clone(), session_middleware));

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(data_routes)
        .route_layer(from_fn(metrics_middleware))
        .with_state(state);

    with_common_layers(router)
}

fn with_common_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::<()> {
            message: "internal server error",
            body: None,
        }),
    )
        .into_response()
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against MongoDB as configured.
    ///
    /// The store is dialed by the first request (or by the reset, when
    /// enabled), not here.
    pub async fn build(config: DataConfig) -> Result<Self, AppError> {
        let gateway = MongoGateway::new(config.mongodb.clone());
        Self::build_with_store(config, Arc::new(gateway)).await
    }

    pub async fn build_with_store(
        config: DataConfig,
        store: Arc<dyn DataStore>,
    ) -> Result<Self, AppError> {
        if config.reset_on_startup {
            tracing::info!(database = %config.mongodb.database, "Resetting store on startup");
            initialize_store(store.as_ref()).await?;
        }

        let router = build_router(AppState::new(store));

        // port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("{} listening on port {}", config.service_name, port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until the process is killed.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_panic_becomes_500_envelope() {
        async fn boom() -> &'static str {
            panic!("kaboom")
        }

        let app = with_common_layers(Router::new().route("/boom", get(boom)));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "internal server error");
        assert!(body["body"].is_null());
    }
}
