//! HTTP API surface. Thin axum layer over the same tutor flow and
//! generation pipeline the CLIs use.

pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::credentials::Credentials;
use crate::config::settings::DatagenSettings;

/// Per-process state, immutable after startup. Requests clone the Arcs;
/// nothing mutable is shared between concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<Credentials>,
    pub settings: Arc<DatagenSettings>,
}

impl AppState {
    pub fn new(credentials: Credentials, settings: DatagenSettings) -> Self {
        Self {
            credentials: Arc::new(credentials),
            settings: Arc::new(settings),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/tutor", post(handlers::tutor))
        .route("/api/generate", post(handlers::generate))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
