//! Template system for server-side rendering
//!
//! Pages are askama templates extending `base.html`. Values are escaped
//! unless a template marks them `|safe`, which only happens for text the
//! active variant declares markup-safe.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use carlot_core::{Listing, Variant};

/// Values every page layout needs
#[derive(Debug, Clone)]
pub struct PageContext {
    pub variant: &'static str,
    pub current_user: Option<String>,
}

impl PageContext {
    pub fn new(variant: Variant, current_user: Option<String>) -> Self {
        Self {
            variant: variant.as_str(),
            current_user,
        }
    }
}

/// Home page template
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub page: PageContext,
}

/// Login form template
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub page: PageContext,
    pub csrf_token: Option<String>,
}

/// Catalog template
#[derive(Template)]
#[template(path = "buy.html")]
pub struct BuyTemplate {
    pub title: String,
    pub page: PageContext,
    pub q: String,
    /// Descriptions are emitted unescaped, as prepared by the catalog policy
    pub listings: Vec<Listing>,
}

/// Sell form and confirmation template
#[derive(Template)]
#[template(path = "sell.html")]
pub struct SellTemplate {
    pub title: String,
    pub page: PageContext,
    pub csrf_token: Option<String>,
    pub message: Option<String>,
    pub message_is_html: bool,
}

/// Error page template
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub error_code: u16,
    pub error_message: String,
}

impl IndexTemplate {
    pub fn new(page: PageContext) -> Self {
        Self {
            title: "Carlot - Buy and sell cars".to_string(),
            page,
        }
    }
}

impl LoginTemplate {
    pub fn new(page: PageContext, csrf_token: Option<String>) -> Self {
        Self {
            title: "Log in - Carlot".to_string(),
            page,
            csrf_token,
        }
    }
}

impl BuyTemplate {
    pub fn new(page: PageContext, q: String, listings: Vec<Listing>) -> Self {
        Self {
            title: "Buy a car - Carlot".to_string(),
            page,
            q,
            listings,
        }
    }
}

impl SellTemplate {
    pub fn new(page: PageContext, csrf_token: Option<String>) -> Self {
        Self {
            title: "Sell your car - Carlot".to_string(),
            page,
            csrf_token,
            message: None,
            message_is_html: false,
        }
    }

    pub fn with_message(mut self, message: String, is_html: bool) -> Self {
        self.message = Some(message);
        self.message_is_html = is_html;
        self
    }
}

impl ErrorTemplate {
    pub fn new(error_code: u16, error_message: String) -> Self {
        Self {
            title: format!("Error {} - Carlot", error_code),
            error_code,
            error_message,
        }
    }
}

/// Render an error page, falling back to plain text if the template fails
pub fn render_error(status: StatusCode, message: &str) -> Response {
    match ErrorTemplate::new(status.as_u16(), message.to_string()).render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, message.to_string()).into_response()
        }
    }
}
