//! Catalog search and listing creation

use crate::{
    auth::{CurrentUser, OptionalUser},
    csrf, render,
    templates::{BuyTemplate, PageContext, SellTemplate},
    AppState, WebResult,
};
use axum::{
    extract::{Query, State},
    response::Html,
    Form,
};
use carlot_core::{coerce_int, NewListing};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{debug, info};

/// Catalog query parameters
#[derive(Debug, Default, Deserialize)]
pub struct BuyQuery {
    #[serde(default)]
    pub q: String,
}

/// Sell form submission. Every field is optional text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SellForm {
    pub make: String,
    pub model: String,
    pub year: String,
    pub price: String,
    pub description: String,
    pub csrf_token: Option<String>,
}

/// Catalog page with optional search
pub async fn buy(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<BuyQuery>,
) -> WebResult<Html<String>> {
    let catalog = state.profile.catalog;

    let mut listings = state.store.search(&query.q).await?;
    for listing in &mut listings {
        listing.description = catalog.render(&listing.description).into_owned();
    }

    debug!(q = %query.q, results = listings.len(), "Rendering catalog");
    render(BuyTemplate::new(
        PageContext::new(state.config.variant, user),
        query.q,
        listings,
    ))
}

/// Sell form
pub async fn sell_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> WebResult<Html<String>> {
    let csrf_token = csrf::issue_token(&session, state.profile.csrf).await?;
    render(SellTemplate::new(
        PageContext::new(state.config.variant, Some(user)),
        csrf_token,
    ))
}

/// Store a new listing and confirm it
pub async fn sell(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Form(form): Form<SellForm>,
) -> WebResult<Html<String>> {
    let profile = &state.profile;
    csrf::verify_token(&session, profile.csrf, form.csrf_token.as_deref()).await?;

    let description = profile.sanitization.sanitize(&form.description);
    let listing = NewListing::new(
        form.make.as_str(),
        form.model.as_str(),
        coerce_int(&form.year),
        coerce_int(&form.price),
        description.into_owned(),
    );
    let id = state.store.insert(&listing).await?;
    info!(id, user = %user, "Listing created");

    let message = profile.message.confirmation(
        &form.make,
        &form.model,
        &form.year,
        &form.price,
        &form.description,
    );
    let csrf_token = csrf::issue_token(&session, profile.csrf).await?;

    render(
        SellTemplate::new(PageContext::new(state.config.variant, Some(user)), csrf_token)
            .with_message(message, profile.message.renders_raw()),
    )
}
