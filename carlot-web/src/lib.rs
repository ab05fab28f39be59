//! Carlot Web Server
//!
//! A small car marketplace (home, login, buy, sell) served in one of two
//! variants: `vulnerable`, which keeps classic XSS/CSRF/cookie defects for
//! teaching, and `hardened`, which fixes them.

pub mod auth;
pub mod csrf;
pub mod database;
pub mod handlers;
pub mod routes;
pub mod security;
pub mod server;
pub mod state;
pub mod templates;

// Re-export main types
pub use server::CarlotServer;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    Router,
};
use carlot_core::{CarlotError, MarketConfig, Variant};
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

/// Largest accepted request body; forms are small
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(routes::page_routes())
        .merge(routes::static_routes(&state.config.static_dir))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security::security_headers_middleware,
        ));

    security::with_session_layer(router, &state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Marketplace variant served by this process
    pub variant: Variant,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Static files directory
    pub static_dir: PathBuf,
    /// Session signing secret (random per process when absent)
    pub secret_key: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from(&MarketConfig::default())
    }
}

impl From<&MarketConfig> for WebConfig {
    fn from(market: &MarketConfig) -> Self {
        Self {
            host: market.host.clone(),
            port: market.effective_port(),
            variant: market.variant,
            database_path: market.database_path.clone(),
            static_dir: market.static_dir.clone(),
            secret_key: market.secret_key.clone(),
        }
    }
}

impl WebConfig {
    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CarlotError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Request rejected");
                (StatusCode::FORBIDDEN, reason.clone())
            }
            WebError::Core(core) => {
                core.log();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        templates::render_error(status, &message)
    }
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Render an askama template into an HTML response
pub fn render<T: askama::Template>(template: T) -> WebResult<Html<String>> {
    Ok(Html(template.render()?))
}
