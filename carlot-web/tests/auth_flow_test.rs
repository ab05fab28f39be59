//! Login, session and logout behavior shared by both variants

mod helpers;

use axum::http::StatusCode;
use carlot_core::Variant;
use helpers::spawn_app;

const VARIANTS: [Variant; 2] = [Variant::Vulnerable, Variant::Hardened];

#[tokio::test]
async fn test_sell_requires_login() {
    for variant in VARIANTS {
        let mut app = spawn_app(variant).await;

        let response = app.get("/sell").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", variant);
        assert_eq!(response.location(), Some("/login"));

        let response = app
            .post_form("/sell", &helpers::sample_listing("sneaky"))
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", variant);
        assert_eq!(response.location(), Some("/login"));
        assert_eq!(app.listing_count().await, 4);
    }
}

#[tokio::test]
async fn test_login_then_sell_page_is_available() {
    for variant in VARIANTS {
        let mut app = spawn_app(variant).await;

        let response = app.login("alice").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", variant);
        assert_eq!(response.location(), Some("/sell"));
        assert!(app.cookie.is_some());

        let response = app.get("/sell").await;
        assert_eq!(response.status, StatusCode::OK, "{}", variant);
        assert!(response.body.contains("Signed in as alice"));
    }
}

#[tokio::test]
async fn test_blank_username_falls_back_to_demo() {
    let mut app = spawn_app(Variant::Hardened).await;

    app.login("   ").await;
    let response = app.get("/").await;
    assert!(response.body.contains("Signed in as demo"));
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    for variant in VARIANTS {
        let mut app = spawn_app(variant).await;
        app.login("bob").await;

        let response = app.get("/logout").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", variant);
        assert_eq!(response.location(), Some("/"));

        let response = app.get("/sell").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", variant);
        assert_eq!(response.location(), Some("/login"));
    }
}

#[tokio::test]
async fn test_logout_without_session_redirects_home() {
    let mut app = spawn_app(Variant::Vulnerable).await;

    let response = app.get("/logout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}
