//! Carlot Core - Domain types, storage contract and security policies
//!
//! This module defines the listing model, the storage abstraction and the
//! policy types that distinguish the vulnerable and hardened marketplace variants.

pub mod settings;
pub mod error;
pub mod logging;
pub mod policy;
pub mod sanitize;
pub mod traits;
pub mod types;

pub use settings::*;
pub use error::*;
pub use logging::*;
pub use policy::*;
pub use sanitize::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
