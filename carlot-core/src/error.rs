//! Unified error handling system
//!
//! Structured error types with context and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type CarlotResult<T> = Result<T, CarlotError>;

/// Error context carried by structured errors for log correlation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }
}

/// Main error type for the Carlot domain
#[derive(Error, Debug)]
pub enum CarlotError {
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CarlotError {
    /// Build a storage error wrapping the underlying driver error
    pub fn storage<E>(operation: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CarlotError::Storage {
            message: format!("{} failed: {}", operation, source),
            source: Some(Box::new(source)),
            context: ErrorContext::new("storage").with_operation(operation),
        }
    }

    /// Build a configuration error without an underlying cause
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CarlotError::Config {
            message: message.into(),
            source: None,
            context: ErrorContext::new("config"),
        }
    }

    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            CarlotError::Storage { context, .. } => Some(context),
            CarlotError::Config { context, .. } => Some(context),
            CarlotError::Validation { context, .. } => Some(context),
            CarlotError::Io(_) => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            CarlotError::Validation { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Validation error"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

impl From<::config::ConfigError> for CarlotError {
    fn from(err: ::config::ConfigError) -> Self {
        CarlotError::Config {
            message: format!("Failed to load configuration: {}", err),
            source: Some(Box::new(err)),
            context: ErrorContext::new("config").with_operation("load"),
        }
    }
}
