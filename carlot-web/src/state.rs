//! Application state shared by all handlers

use crate::{database::SqliteListingStore, security, WebConfig, WebResult};
use axum::http::{HeaderName, HeaderValue};
use carlot_core::{ListingStore, SecurityProfile};
use std::sync::Arc;
use tower_sessions::{cookie::Key, MemoryStore};
use tracing::info;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<WebConfig>,
    /// Policies of the variant this process serves
    pub profile: Arc<SecurityProfile>,
    /// Listing storage
    pub store: Arc<dyn ListingStore>,
    /// Headers attached to every response
    pub response_headers: Arc<Vec<(HeaderName, HeaderValue)>>,
    /// In-process session store
    pub session_store: MemoryStore,
    /// Session cookie signing key
    pub session_key: Key,
}

impl AppState {
    /// Create state backed by the configured SQLite file
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let store = SqliteListingStore::open(&config.database_path).await?;
        Self::with_store(config, Arc::new(store))
    }

    /// Create state around an existing listing store
    pub fn with_store(config: WebConfig, store: Arc<dyn ListingStore>) -> WebResult<Self> {
        let profile = config.variant.profile();
        let response_headers = security::response_headers(&profile.headers)?;
        let session_key = security::session_key(config.secret_key.as_deref());

        info!(
            variant = %config.variant,
            sanitization = ?profile.sanitization,
            csrf = ?profile.csrf,
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            profile: Arc::new(profile),
            store,
            response_headers: Arc::new(response_headers),
            session_store: MemoryStore::default(),
            session_key,
        })
    }
}
