//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/clock/token wiring shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: the error body and the single result-to-response adapter

use std::sync::Arc;

use axum::{Extension, Router};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    build_router(Arc::new(AppServices::in_memory(config)))
}

/// Build the router around pre-wired services.
///
/// The identity binder wraps every route, public ones included; protected
/// handlers reject an empty identity themselves.
pub fn build_router(services: Arc<AppServices>) -> Router {
    let auth_state = services.auth_state();

    routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::bind_identity,
        ))
}
