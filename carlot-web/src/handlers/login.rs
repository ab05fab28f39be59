//! Login and logout handlers

use crate::{
    auth::{self, OptionalUser},
    csrf, render,
    templates::{LoginTemplate, PageContext},
    AppState, WebResult,
};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

/// Login form submission
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub user: String,
    pub csrf_token: Option<String>,
}

/// Login page
pub async fn login_form(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
) -> WebResult<Html<String>> {
    let csrf_token = csrf::issue_token(&session, state.profile.csrf).await?;
    render(LoginTemplate::new(
        PageContext::new(state.config.variant, user),
        csrf_token,
    ))
}

/// Sign in with any username and continue to the sell page
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> WebResult<Redirect> {
    csrf::verify_token(&session, state.profile.csrf, form.csrf_token.as_deref()).await?;

    let user = auth::sign_in(&session, &form.user).await?;
    info!(user = %user, "User logged in");

    Ok(Redirect::to("/sell"))
}

/// Clear the session and go home
pub async fn logout(session: Session) -> WebResult<Redirect> {
    auth::sign_out(&session).await?;
    Ok(Redirect::to("/"))
}
