mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    PASSWORD, create_staff, create_student, get_request, json_request, login, send,
    setup_test_app,
};

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_login_returns_user_and_tokens(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "admin1", "password": PASSWORD }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "admin1");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["tokens"]["access_token"].is_string());
    assert!(body["tokens"]["refresh_token"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_login_by_registration_number(pool: PgPool) {
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "21A91A0501", "password": PASSWORD }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "21A91A0501");
    assert_eq!(body["user"]["role"], "student");
    assert_eq!(body["user"]["first_name"], "Student");
    assert_eq!(body["user"]["last_name"], "21A91A0501");
    assert_eq!(body["user"]["department"], "CSE");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_wrong_password(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "faculty1", "password": "not-the-password" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_user(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "nobody", "password": PASSWORD }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_missing_field(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        json_request("POST", "/api/auth/login", None, json!({ "username": "admin1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_then_logout_revokes_token(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);

    let (_, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "faculty1", "password": PASSWORD }),
        ),
    )
    .await;
    let refresh_token = body["tokens"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/auth/refresh",
            None,
            json!({ "refresh_token": refresh_token }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/auth/logout",
            None,
            json!({ "refresh_token": refresh_token }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/auth/refresh",
            None,
            json!({ "refresh_token": refresh_token }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_access_token(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let access_token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/auth/refresh",
            None,
            json!({ "refresh_token": access_token }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_returns_claims(pool: PgPool) {
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "21A91A0501", PASSWORD).await;

    let (status, body) = send(app, get_request("/api/auth/me", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sub"], "21A91A0501");
    assert_eq!(body["role"], "student");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_without_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(app, get_request("/api/auth/me", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_accepted_as_query_parameter(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(app, get_request(&format!("/api/auth/me?token={token}"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "faculty1");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_route_returns_json_404(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(app, get_request("/api/does-not-exist", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}
