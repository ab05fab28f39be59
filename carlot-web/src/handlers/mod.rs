//! HTTP request handlers for the Carlot web server
//!
//! This module contains all the HTTP request handlers organized by page.

pub mod health;
pub mod listings;
pub mod login;
pub mod pages;

pub use health::*;
pub use listings::*;
pub use login::*;
pub use pages::*;
