//! Synchronizer-token CSRF protection
//!
//! A random token is kept in the session and echoed back by forms in a
//! hidden field. With [`CsrfPolicy::Disabled`] nothing is issued or checked.

use crate::{WebError, WebResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use carlot_core::CsrfPolicy;
use rand::RngCore;
use tower_sessions::Session;

/// Session key holding the token
pub const CSRF_SESSION_KEY: &str = "csrf_token";

/// Form field carrying the submitted token
pub const CSRF_FORM_FIELD: &str = "csrf_token";

const TOKEN_BYTES: usize = 32;

/// Generate a fresh URL-safe token
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Token to embed in a form, created on first use
pub async fn issue_token(session: &Session, policy: CsrfPolicy) -> WebResult<Option<String>> {
    if !policy.is_enforced() {
        return Ok(None);
    }

    if let Some(token) = session.get::<String>(CSRF_SESSION_KEY).await? {
        return Ok(Some(token));
    }

    let token = generate_token();
    session.insert(CSRF_SESSION_KEY, &token).await?;
    Ok(Some(token))
}

/// Check a submitted token against the session's
pub async fn verify_token(
    session: &Session,
    policy: CsrfPolicy,
    submitted: Option<&str>,
) -> WebResult<()> {
    if !policy.is_enforced() {
        return Ok(());
    }

    let expected = session.get::<String>(CSRF_SESSION_KEY).await?;
    match (expected, submitted) {
        (Some(expected), Some(submitted)) if tokens_match(&expected, submitted) => Ok(()),
        (None, _) => Err(WebError::Forbidden(
            "CSRF token missing from session".to_string(),
        )),
        (_, None) => Err(WebError::Forbidden("CSRF token missing".to_string())),
        _ => Err(WebError::Forbidden("CSRF token invalid".to_string())),
    }
}

/// Compare without short-circuiting on the first differing byte
fn tokens_match(expected: &str, submitted: &str) -> bool {
    let (a, b) = (expected.as_bytes(), submitted.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
