mod common;

use anyhow::Result;
use futures::StreamExt;
use serde_json::json;

use common::{session_json, FakeBackend};
use impronta_backoffice::models::LoginRequest;
use impronta_backoffice::navigation::Route;
use impronta_backoffice::screens::LoginScreen;
use impronta_backoffice::session::MemorySessionStorage;

#[tokio::test]
async fn login_then_logout_drives_authenticated_stream() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.reply("POST", "auth/login", 200, session_json(4, &["DIRETTIVO"]));
    backend.ok("POST", "auth/logout");

    let app = backend.app()?;
    let mut auth_states = app.session().observe_authenticated();
    assert_eq!(auth_states.next().await, Some(false));

    let session = app
        .auth()
        .login(&LoginRequest::new(" anna@uni.it ", "secret"))
        .await?;
    assert_eq!(session.user_id, 4);
    assert_eq!(auth_states.next().await, Some(true));

    let login = &backend.requests_to("POST", "auth/login")[0];
    assert_eq!(login.json(), json!({"email": "anna@uni.it", "password": "secret"}));

    app.auth().logout().await;
    assert_eq!(auth_states.next().await, Some(false));
    assert!(!app.session().is_authenticated());

    let logout = &backend.requests_to("POST", "auth/logout")[0];
    assert_eq!(logout.authorization.as_deref(), Some("Bearer token-4"));
    Ok(())
}

#[tokio::test]
async fn session_survives_restart_through_storage() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.reply("POST", "auth/login", 200, session_json(2, &["STAFF"]));

    let storage = MemorySessionStorage::new();
    let app = backend.app_with_storage(storage.clone())?;
    app.auth().login(&LoginRequest::new("anna@uni.it", "secret")).await?;
    assert!(storage.raw().is_some());

    let restarted = backend.app_with_storage(storage)?;
    assert_eq!(restarted.session().token().as_deref(), Some("token-2"));
    assert_eq!(restarted.navigator().navigate(Route::Login).await, Route::Dashboard);
    Ok(())
}

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    backend.reply("POST", "auth/logout", 500, json!({"message": "boom"}));

    let landed = app.sign_out().await;

    assert_eq!(landed, Route::Login);
    assert!(!app.session().is_authenticated());
    assert_eq!(backend.requests_to("POST", "auth/logout").len(), 1);
    Ok(())
}

#[tokio::test]
async fn wrong_credentials_stay_on_login_with_message() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.reply("POST", "auth/login", 401, json!({}));

    let app = backend.app()?;
    let mut notices = app.notifier().subscribe();
    app.navigator().navigate(Route::Login).await;

    let mut screen = LoginScreen::new(&app);
    screen.form.email = "anna@uni.it".into();
    screen.form.password = "wrong-password".into();

    assert!(!screen.submit().await);
    assert_eq!(screen.error_msg.as_deref(), Some("Credenziali errate."));
    assert!(!screen.loading);
    assert!(!app.session().is_authenticated());
    assert_eq!(app.navigator().current(), Route::Login);
    // a failed login is not an expired session
    assert!(notices.try_recv().is_err());
    Ok(())
}

#[tokio::test]
async fn server_message_replaces_fallback() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.reply("POST", "auth/login", 403, json!({"message": "Utente disabilitato"}));

    let app = backend.app()?;
    let mut screen = LoginScreen::new(&app);
    screen.form.email = "anna@uni.it".into();
    screen.form.password = "secret".into();

    assert!(!screen.submit().await);
    assert_eq!(screen.error_msg.as_deref(), Some("Utente disabilitato"));
    Ok(())
}

#[tokio::test]
async fn invalid_form_sends_nothing() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.app()?;

    let mut screen = LoginScreen::new(&app);
    screen.form.email = "not-an-email".into();
    screen.form.password = "pw".into();

    assert!(!screen.submit().await);
    assert!(screen.form.touched);
    assert!(backend.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn successful_login_lands_on_dashboard() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.reply("POST", "auth/login", 200, session_json(3, &["ADMIN"]));

    let app = backend.app()?;
    let mut screen = LoginScreen::new(&app);
    screen.form.email = "anna@uni.it".into();
    screen.form.password = "secret".into();

    assert!(screen.submit().await);
    assert_eq!(app.navigator().current(), Route::Dashboard);
    Ok(())
}

#[tokio::test]
async fn forgot_password_requests_link_for_trimmed_address() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.ok("GET", "auth/richiesta/modifica/password/anna%40uni.it");

    let app = backend.app()?;
    let mut screen = LoginScreen::new(&app);
    screen.form.email = "  anna@uni.it ".into();
    screen.open_forgot();
    assert_eq!(screen.forgot.email, "anna@uni.it");

    screen.submit_forgot().await;

    assert!(screen.forgot.success);
    assert!(screen.forgot.error_msg.is_none());
    assert_eq!(
        backend
            .requests_to("GET", "auth/richiesta/modifica/password/anna%40uni.it")
            .len(),
        1
    );
    Ok(())
}
