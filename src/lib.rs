//! MSK Suggestion Board backend.
//!
//! A REST backend with SQLite persistence for browsing, filtering,
//! creating, editing, and bulk-updating health/safety suggestions tied to
//! employees. The pure board logic — filter evaluation, selection tracking,
//! and the optimistic bulk-update projection — lives in dedicated modules
//! so presentation layers can reuse it unchanged.

pub mod api;
pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod errors;
pub mod filter;
pub mod models;
pub mod selection;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Employees (read-only)
        .route("/employees", get(api::list_employees))
        .route("/employees/{id}", get(api::get_employee))
        // Suggestions
        .route("/suggestions", get(api::list_suggestions))
        .route("/suggestions", post(api::create_suggestion))
        .route("/suggestions/batch", put(api::batch_update_status))
        .route("/suggestions/{id}", get(api::get_suggestion))
        .route("/suggestions/{id}", put(api::update_suggestion))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
