//! Formular Server Library
//!
//! Self-hosted form assistant: infers a dynamic form schema from a
//! free-text situation, validates the answers, and writes them into a
//! fillable PDF.
//!
//! # Modules
//!
//! - `schema`: form schema model, answer sets, fallback schema
//! - `validate`: schema-to-validator compiler
//! - `pdf`: AcroForm introspection and fill engine
//! - `mapping`: name normalization and schema-to-PDF auto-mapping
//! - `infer`: pluggable schema inference with fallback policy

pub mod config;
pub mod error;
pub mod infer;
pub mod mapping;
pub mod pdf;
pub mod routes;
pub mod schema;
pub mod state;
pub mod validate;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/health", get(routes::health::health_check))
        .nest("/api/v1/schema", routes::schema::router())
        .nest("/api/v1/fill", routes::fill::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
