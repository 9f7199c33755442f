//! Database session provisioning for the `/data` routes.
//!
//! Runs before every handler: makes sure the store is reachable and hands the
//! handler a typed [`DbHandle`] through the request extensions. When the store
//! cannot be reached the handler never runs.

use crate::dtos::Envelope;
use crate::handlers::data::{CANT_CONNECT_DB, CANT_REACH_DB};
use crate::services::DataStore;
use crate::startup::AppState;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Store reference made available to handlers for the current request.
#[derive(Clone)]
pub struct DbHandle(Arc<dyn DataStore>);

impl DbHandle {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self(store)
    }

    pub fn store(&self) -> &dyn DataStore {
        self.0.as_ref()
    }
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match state.store.establish_session().await {
        Ok(()) => {
            req.extensions_mut()
                .insert(DbHandle::new(state.store.clone()));
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                method = %req.method(),
                uri = %req.uri(),
                "Database unavailable, request not dispatched"
            );
            let message = if req.method() == Method::GET {
                CANT_REACH_DB
            } else {
                CANT_CONNECT_DB
            };
            Envelope::into_bad_request(message)
        }
    }
}
