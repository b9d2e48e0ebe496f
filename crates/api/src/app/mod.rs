//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store handles shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `extract.rs`: path, body and query extractors
//! - `errors.rs`: error kinds and the JSON error envelope

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router, routing::get};

use mascotas_infra::Config;

use crate::middleware;

pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Settings for the cross-cutting HTTP layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// CORS allow-list. Empty mirrors the request origin.
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl From<&Config> for HttpSettings {
    fn from(config: &Config) -> Self {
        Self {
            allowed_origins: config.allowed_origins(),
            request_timeout: config.request_timeout(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices, settings: &HttpSettings) -> Router {
    let router = Router::new()
        .route(
            "/health",
            get(routes::system::health).fallback(routes::system::method_not_allowed),
        )
        .route(
            "/ready",
            get(routes::system::ready).fallback(routes::system::method_not_allowed),
        )
        .merge(routes::router())
        .fallback(routes::system::not_found)
        .layer(Extension(Arc::new(services)));

    middleware::apply(router, settings)
}
