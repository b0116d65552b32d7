// ==================================
// tests/integration/auth_flow_tests.rs
// ==================================
//! End-to-end flows through the router
use crate::test_utils::{
    basic_header, form_request, register, request, send, session_id_from, setup_test_env,
};
use axum::http::{header, Method, StatusCode};
use sessiongate_backend::{
    auth::AuthRequest,
    config::{AuthType, DEFAULT_SESSION_NAME},
};

#[tokio::test]
async fn test_status_is_open_without_credentials() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;

    let (status, _, body) = send(&app.router, request(Method::GET, "/api/v1/status", &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_fixed_error_routes() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;

    let (status, _, body) =
        send(&app.router, request(Method::GET, "/api/v1/unauthorized", &[])).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Unauthorized");

    let (status, _, body) = send(&app.router, request(Method::GET, "/api/v1/forbidden", &[])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Forbidden");
}

#[tokio::test]
async fn test_register_then_valid_login() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;
    assert_eq!(register(&app.router, "a@x.com", "pw1").await, StatusCode::OK);

    assert!(app.state.auth.valid_login("a@x.com", "pw1").await.unwrap());
    assert!(!app.state.auth.valid_login("a@x.com", "wrong").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;
    assert_eq!(register(&app.router, "a@x.com", "pw1").await, StatusCode::OK);

    let (status, _, body) = send(
        &app.router,
        form_request(Method::POST, "/api/v1/users", "email=a%40x.com&password=other"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "email already registered");
}

#[tokio::test]
async fn test_registration_requires_fields() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;

    let (status, _, body) =
        send(&app.router, form_request(Method::POST, "/api/v1/users", "password=pw1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "email missing");

    let (status, _, body) =
        send(&app.router, form_request(Method::POST, "/api/v1/users", "email=a%40x.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "password missing");
}

#[tokio::test]
async fn test_basic_auth_gate() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;
    register(&app.router, "a@x.com", "pw:with:colons").await;

    let (status, _, body) = send(
        &app.router,
        request(
            Method::GET,
            "/api/v1/users/me",
            &[(header::AUTHORIZATION, basic_header("a@x.com", "pw:with:colons"))],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");

    let (status, ..) = send(&app.router, request(Method::GET, "/api/v1/users/me", &[])).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_basic_user_is_forbidden_not_unauthorized() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;

    let headers = [(header::AUTHORIZATION, basic_header("bob", "pw"))];
    let (status, _, body) =
        send(&app.router, request(Method::GET, "/api/v1/users/me", &headers)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "AUTH_002");
}

#[tokio::test]
async fn test_unknown_route_is_still_gated() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;
    let (status, ..) = send(&app.router, request(Method::GET, "/api/v1/nowhere", &[])).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let app = setup_test_env(AuthType::NoAuth, 0).await;
    let (status, ..) = send(&app.router, request(Method::GET, "/api/v1/nowhere", &[])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_cookie_flow_ends_in_forbidden() {
    let app = setup_test_env(AuthType::SessionAuth, 0).await;
    register(&app.router, "a@x.com", "pw1").await;

    let token = app.state.auth.create_session("a@x.com").await.unwrap().unwrap();
    let cookie = format!("{DEFAULT_SESSION_NAME}={token}");

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(header::COOKIE, cookie.parse().unwrap());
    let user = app
        .state
        .strategy
        .current_user(&AuthRequest::new("/api/v1/users/me", &headers))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "a@x.com");

    let (status, ..) = send(
        &app.router,
        request(Method::GET, "/api/v1/users/me", &[(header::COOKIE, cookie.clone())]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(app.state.auth.destroy_session(&token).await.unwrap());
    assert!(app
        .state
        .strategy
        .current_user(&AuthRequest::new("/api/v1/users/me", &headers))
        .await
        .unwrap()
        .is_none());

    let (status, ..) = send(
        &app.router,
        request(Method::GET, "/api/v1/users/me", &[(header::COOKIE, cookie)]),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_and_logout_over_http() {
    let app = setup_test_env(AuthType::SessionExpAuth, 3600).await;
    register(&app.router, "a@x.com", "pw1").await;

    let (status, headers, body) = send(
        &app.router,
        form_request(
            Method::POST,
            "/api/v1/auth_session/login",
            "email=a%40x.com&password=pw1",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=3600"));

    let session_id = session_id_from(&headers, DEFAULT_SESSION_NAME).unwrap();
    let cookie = format!("{DEFAULT_SESSION_NAME}={session_id}");

    let (status, ..) = send(
        &app.router,
        request(Method::DELETE, "/api/v1/auth_session/logout", &[(header::COOKIE, cookie.clone())]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // the session is gone, so the gate now rejects the same cookie
    let (status, ..) = send(
        &app.router,
        request(Method::DELETE, "/api/v1/auth_session/logout", &[(header::COOKIE, cookie)]),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = setup_test_env(AuthType::SessionAuth, 0).await;
    register(&app.router, "a@x.com", "pw1").await;

    let (wrong_status, _, wrong_body) = send(
        &app.router,
        form_request(Method::POST, "/api/v1/auth_session/login", "email=a%40x.com&password=nope"),
    )
    .await;
    let (unknown_status, _, unknown_body) = send(
        &app.router,
        form_request(Method::POST, "/api/v1/auth_session/login", "email=b%40x.com&password=pw1"),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_without_session_scheme_is_not_found() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;
    register(&app.router, "a@x.com", "pw1").await;

    let (status, headers, _) = send(
        &app.router,
        form_request(Method::POST, "/api/v1/auth_session/login", "email=a%40x.com&password=pw1"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.get(header::SET_COOKIE).is_none());

    // the scheme is checked before the password, so bad credentials are 404 too
    let (status, ..) = send(
        &app.router,
        form_request(Method::POST, "/api/v1/auth_session/login", "email=a%40x.com&password=nope"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reset_password_flow() {
    let app = setup_test_env(AuthType::BasicAuth, 0).await;
    register(&app.router, "a@x.com", "pw1").await;

    let (status, ..) = send(
        &app.router,
        form_request(Method::POST, "/api/v1/reset_password", "email=b%40x.com"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = send(
        &app.router,
        form_request(Method::POST, "/api/v1/reset_password", "email=a%40x.com"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["reset_token"].as_str().unwrap().to_string();

    let (status, ..) = send(
        &app.router,
        form_request(
            Method::PUT,
            "/api/v1/reset_password",
            "email=a%40x.com&reset_token=bogus&new_password=pw2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = send(
        &app.router,
        form_request(
            Method::PUT,
            "/api/v1/reset_password",
            &format!("email=a%40x.com&reset_token={token}&new_password=pw2"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated");

    let headers = [(header::AUTHORIZATION, basic_header("a@x.com", "pw2"))];
    let (status, ..) = send(&app.router, request(Method::GET, "/api/v1/users/me", &headers)).await;
    assert_eq!(status, StatusCode::OK);
}
