//! Carlot Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use carlot_core::{MarketConfig, Variant};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main Carlot web server
pub struct CarlotServer {
    config: WebConfig,
    state: AppState,
}

impl CarlotServer {
    /// Create a new server, opening the listings database
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Start the web server and run until Ctrl+C
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("🚀 Starting Carlot Web Server");
        info!("📍 Server address: http://{}", address);
        info!("🔧 Variant: {}", self.config.variant);
        info!("🗄️  Database: {}", self.config.database_path.display());

        if self.config.variant == Variant::Vulnerable {
            warn!("Serving the vulnerable variant; do not expose it to untrusted networks");
        }

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("✅ Server listening on http://{}", address);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Builder for CarlotServer.
///
/// Holds the marketplace configuration so the port keeps following the
/// variant until one is set explicitly.
pub struct CarlotServerBuilder {
    market: MarketConfig,
}

impl CarlotServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::from_market(MarketConfig::default())
    }

    /// Start from loaded configuration
    pub fn from_market(market: MarketConfig) -> Self {
        Self { market }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.market.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.market.port = Some(port);
        self
    }

    /// Set the variant to serve
    pub fn variant(mut self, variant: Variant) -> Self {
        self.market.variant = variant;
        self
    }

    /// Set the SQLite database file
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.market.database_path = path.into();
        self
    }

    /// Set static files directory
    pub fn static_dir<P: Into<PathBuf>>(mut self, static_dir: P) -> Self {
        self.market.static_dir = static_dir.into();
        self
    }

    /// Resolved server configuration
    pub fn config(&self) -> WebConfig {
        WebConfig::from(&self.market)
    }

    /// Validate the configuration and build the server
    pub async fn build(self) -> WebResult<CarlotServer> {
        self.market.validate()?;
        CarlotServer::new(self.config()).await
    }
}

impl Default for CarlotServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
