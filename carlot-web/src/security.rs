//! Response hardening: security headers and session cookie attributes
//!
//! Both are process-wide and follow the variant's [`SecurityProfile`](carlot_core::SecurityProfile).

use crate::{AppState, WebError, WebResult};
use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
    Router,
};
use carlot_core::{CookiePolicy, SameSitePolicy, SecurityHeaders};
use rand::RngCore;
use sha2::{Digest, Sha512};
use tower_sessions::{
    cookie::{Key, SameSite},
    SessionManagerLayer,
};
use tracing::debug;

/// Turn the configured headers into ready-to-insert header pairs
pub fn response_headers(headers: &SecurityHeaders) -> WebResult<Vec<(HeaderName, HeaderValue)>> {
    let mut pairs = Vec::new();

    if let Some(csp) = &headers.content_security_policy {
        pairs.push((header::CONTENT_SECURITY_POLICY, header_value(csp)?));
    }

    if headers.x_content_type_options {
        pairs.push((
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));
    }

    if let Some(referrer) = &headers.referrer_policy {
        pairs.push((header::REFERRER_POLICY, header_value(referrer)?));
    }

    Ok(pairs)
}

fn header_value(value: &str) -> WebResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| WebError::Config(format!("Invalid header value '{}': {}", value, e)))
}

/// Security headers middleware
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in state.response_headers.iter() {
        headers.insert(name.clone(), value.clone());
    }

    response
}

/// Derive the cookie signing key from the configured secret, or generate a
/// random one that lives as long as the process.
pub fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            debug!("No session secret configured, generating a random key");
            let mut bytes = [0u8; 64];
            rand::thread_rng().fill_bytes(&mut bytes);
            Key::from(&bytes)
        }
    }
}

fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::None => SameSite::None,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::Strict => SameSite::Strict,
    }
}

/// Wrap `router` in a session manager whose cookie follows the variant's policy
pub fn with_session_layer(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let cookie: &CookiePolicy = &state.profile.cookie;

    let layer = SessionManagerLayer::new(state.session_store.clone())
        .with_name(cookie.name.clone())
        .with_same_site(same_site(cookie.same_site))
        .with_secure(cookie.secure)
        .with_http_only(cookie.http_only)
        .with_signed(state.session_key.clone());

    router.layer(layer)
}
