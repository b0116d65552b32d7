// =====================================
// tests/integration/session_flow_tests.rs
// =====================================
//! Session lifetime across expiry and restarts
use crate::test_utils::{
    build_app, form_request, register, request, send, session_id_from, setup_test_env,
    test_settings,
};
use axum::http::{header, Method, StatusCode};
use chrono::Duration;
use sessiongate_backend::{
    auth::FileSessionStore,
    config::{AuthType, DEFAULT_SESSION_NAME},
};

async fn login(router: &axum::Router) -> String {
    let (status, headers, _) = send(
        router,
        form_request(Method::POST, "/api/v1/auth_session/login", "email=a%40x.com&password=pw1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session_id = session_id_from(&headers, DEFAULT_SESSION_NAME).unwrap();
    format!("{DEFAULT_SESSION_NAME}={session_id}")
}

#[tokio::test]
async fn test_expiring_session_is_rejected_after_ttl() {
    let app = setup_test_env(AuthType::SessionExpAuth, 60).await;
    register(&app.router, "a@x.com", "pw1").await;
    let cookie = login(&app.router).await;

    app.clock.advance(Duration::seconds(60));
    let (status, ..) = send(
        &app.router,
        request(Method::GET, "/api/v1/users/me", &[(header::COOKIE, cookie.clone())]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::seconds(1));
    let (status, ..) = send(
        &app.router,
        request(Method::GET, "/api/v1/users/me", &[(header::COOKIE, cookie)]),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_persisted_sessions_survive_restart() {
    let app = setup_test_env(AuthType::SessionDbAuth, 3600).await;
    register(&app.router, "a@x.com", "pw1").await;
    let cookie = login(&app.router).await;
    assert!(app.temp_dir.path().join(FileSessionStore::FILE_NAME).exists());

    // a second app over the same directory plays the restarted process
    let settings = test_settings(&app.temp_dir, AuthType::SessionDbAuth, 3600);
    let (_state, restarted) = build_app(settings, app.clock.clone()).await;

    let (status, _, body) = send(
        &restarted,
        request(Method::GET, "/api/v1/users/me", &[(header::COOKIE, cookie.clone())]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");

    let (status, ..) = send(
        &restarted,
        request(Method::DELETE, "/api/v1/auth_session/logout", &[(header::COOKIE, cookie.clone())]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let settings = test_settings(&app.temp_dir, AuthType::SessionDbAuth, 3600);
    let (_state, restarted_again) = build_app(settings, app.clock.clone()).await;
    let (status, ..) = send(
        &restarted_again,
        request(Method::GET, "/api/v1/users/me", &[(header::COOKIE, cookie)]),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_in_memory_sessions_do_not_survive_restart() {
    let app = setup_test_env(AuthType::SessionAuth, 0).await;
    register(&app.router, "a@x.com", "pw1").await;
    let cookie = login(&app.router).await;

    let settings = test_settings(&app.temp_dir, AuthType::SessionAuth, 0);
    let (_state, restarted) = build_app(settings, app.clock.clone()).await;
    let (status, ..) = send(
        &restarted,
        request(Method::GET, "/api/v1/users/me", &[(header::COOKIE, cookie)]),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sweep_removes_expired_persisted_sessions() {
    let app = setup_test_env(AuthType::SessionDbAuth, 10).await;
    register(&app.router, "a@x.com", "pw1").await;
    login(&app.router).await;
    login(&app.router).await;

    assert_eq!(app.state.strategy.sweep_expired_sessions().await.unwrap(), 0);
    app.clock.advance(Duration::seconds(11));
    assert_eq!(app.state.strategy.sweep_expired_sessions().await.unwrap(), 2);

    let raw = std::fs::read_to_string(app.temp_dir.path().join(FileSessionStore::FILE_NAME)).unwrap();
    let sessions: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(sessions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_without_cookie_is_unauthorized() {
    let app = setup_test_env(AuthType::SessionDbAuth, 0).await;
    let (status, ..) = send(&app.router, request(Method::GET, "/api/v1/users/me", &[])).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, ..) = send(
        &app.router,
        request(
            Method::GET,
            "/api/v1/users/me",
            &[(header::COOKIE, format!("{DEFAULT_SESSION_NAME}=not-a-session"))],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
