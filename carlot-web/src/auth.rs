//! Session-based sign-in
//!
//! There are no passwords: signing in stores a username in the session.
//! Pages that need a user take [`CurrentUser`], which redirects anonymous
//! visitors to the login page.

use crate::{WebError, WebResult};
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::{debug, warn};

/// Session key holding the signed-in username
pub const SESSION_USER_KEY: &str = "user";

/// Username used when the login form is submitted blank
pub const DEFAULT_USERNAME: &str = "demo";

/// Redirect response for unauthenticated users
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

/// Signed-in user, required
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session
            .get::<String>(SESSION_USER_KEY)
            .await
            .map_err(|e| WebError::from(e).into_response())?
        {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                debug!(path = %parts.uri.path(), "Anonymous request, redirecting to login");
                Err(AuthRedirect.into_response())
            }
        }
    }
}

/// Signed-in user, if any
#[derive(Debug, Clone, Default)]
pub struct OptionalUser(pub Option<String>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(session) = Session::from_request_parts(parts, state).await else {
            return Ok(OptionalUser(None));
        };

        match session.get::<String>(SESSION_USER_KEY).await {
            Ok(user) => Ok(OptionalUser(user)),
            Err(e) => {
                warn!("Failed to read session user: {}", e);
                Ok(OptionalUser(None))
            }
        }
    }
}

/// Trim the submitted name, falling back to [`DEFAULT_USERNAME`] when blank
pub fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_USERNAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Record `raw` as the signed-in user. The session id is rotated first.
pub async fn sign_in(session: &Session, raw: &str) -> WebResult<String> {
    let username = normalize_username(raw);
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, &username).await?;
    debug!(user = %username, "User signed in");
    Ok(username)
}

/// Drop the whole session
pub async fn sign_out(session: &Session) -> WebResult<()> {
    session.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("alice"), "alice");
        assert_eq!(normalize_username("  bob  "), "bob");
        assert_eq!(normalize_username(""), DEFAULT_USERNAME);
        assert_eq!(normalize_username(" \t\n"), DEFAULT_USERNAME);
        assert_eq!(normalize_username("<b>x</b>"), "<b>x</b>");
    }

    #[test]
    fn test_auth_redirect_points_at_login() {
        let response = AuthRedirect.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }
}
