//! Integration test helpers
//!
//! Each [`TestApp`] owns a fresh SQLite file and drives the router in-process
//! with `oneshot`, carrying the session cookie between requests like a browser.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use carlot_core::Variant;
use carlot_web::{create_app, AppState, WebConfig};
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SESSION_COOKIE: &str = "carlot_session";
pub const XSS_PAYLOAD: &str = "<script>alert(1)</script>";

/// Test application instance
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub cookie: Option<String>,
    _dir: TempDir,
}

/// Response with its body already read
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION)
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.header(header::SET_COOKIE)
    }
}

/// Start an app serving `variant` with its own database
pub async fn spawn_app(variant: Variant) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = WebConfig {
        variant,
        database_path: dir.path().join("cars.db"),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        secret_key: Some("integration-test-secret".to_string()),
        ..WebConfig::default()
    };

    let state = AppState::new(config)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: create_app(state.clone()),
        state,
        cookie: None,
        _dir: dir,
    }
}

impl TestApp {
    /// Send a request, attaching and then updating the session cookie
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                cookie.parse().expect("Invalid cookie header"),
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        self.remember_cookie(&response);
        read_response(response).await
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Log in as `user`, fetching a CSRF token first when the form has one
    pub async fn login(&mut self, user: &str) -> TestResponse {
        let page = self.get("/login").await;
        match csrf_token(&page.body) {
            Some(token) => {
                self.post_form("/login", &[("user", user), ("csrf_token", &token)])
                    .await
            }
            None => self.post_form("/login", &[("user", user)]).await,
        }
    }

    /// Submit the sell form with a fresh token (when the variant issues one)
    pub async fn sell(&mut self, fields: &[(&str, &str)]) -> TestResponse {
        let page = self.get("/sell").await;
        let token = csrf_token(&page.body);

        let mut fields = fields.to_vec();
        if let Some(token) = token.as_deref() {
            fields.push(("csrf_token", token));
        }
        self.post_form("/sell", &fields).await
    }

    pub async fn listing_count(&self) -> i64 {
        self.state.store.count().await.expect("Failed to count listings")
    }

    fn remember_cookie(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else { continue };
            let Some((name, cookie_value)) = pair.split_once('=') else { continue };

            if name.trim() != SESSION_COOKIE {
                continue;
            }

            let removed = cookie_value.is_empty() || value.contains("Max-Age=0");
            self.cookie = if removed {
                None
            } else {
                Some(pair.trim().to_string())
            };
        }
    }
}

async fn read_response(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hidden CSRF field value from a rendered form
pub fn csrf_token(html: &str) -> Option<String> {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')? + start;
    Some(html[start..end].to_string())
}

pub fn sample_listing<'a>(description: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("make", "Ford"),
        ("model", "Focus"),
        ("year", "2021"),
        ("price", "9999"),
        ("description", description),
    ]
}
