//! Route definitions for the Carlot web server
//!
//! This module defines all the routes for the web application.

use crate::{handlers, AppState};
use axum::{routing::get, Router};
use std::path::Path;
use tower_http::services::ServeDir;

/// Create page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/buy", get(handlers::buy))
        .route("/sell", get(handlers::sell_form).post(handlers::sell))
        // Health check
        .route("/health", get(handlers::health_check))
}

/// Create static file routes
pub fn static_routes(static_dir: &Path) -> Router<AppState> {
    Router::new().nest_service("/static", ServeDir::new(static_dir))
}
