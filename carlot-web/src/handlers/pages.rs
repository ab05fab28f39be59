//! Static pages

use crate::{
    auth::OptionalUser,
    render,
    templates::{render_error, IndexTemplate, PageContext},
    AppState, WebResult,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Response},
};

/// Home page
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> WebResult<Html<String>> {
    render(IndexTemplate::new(PageContext::new(
        state.config.variant,
        user,
    )))
}

/// Fallback for unknown paths
pub async fn not_found() -> Response {
    render_error(StatusCode::NOT_FOUND, "Page not found")
}
