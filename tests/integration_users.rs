mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    PASSWORD, create_staff, delete_request, get_request, json_request, login, send,
    setup_test_app,
};

fn new_faculty() -> serde_json::Value {
    json!({
        "username": "jdoe",
        "password": "longenough1",
        "first_name": "John",
        "last_name": "Doe",
        "email": "jdoe@example.com",
        "role": "faculty",
        "department": "CSE"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_creates_faculty_who_can_log_in(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request("POST", "/api/users", Some(&token), new_faculty()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "jdoe");
    assert_eq!(body["role"], "faculty");
    assert!(body.get("password_hash").is_none());

    let faculty_token = login(app, "jdoe", "longenough1").await;
    assert!(!faculty_token.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_conflicts(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, _) = send(
        app.clone(),
        json_request("POST", "/api/users", Some(&token), new_faculty()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        json_request("POST", "/api/users", Some(&token), new_faculty()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username 'jdoe' already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_user_validation(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let mut body = new_faculty();
    body["email"] = json!("not-an-email");

    let (status, _) = send(app, json_request("POST", "/api/users", Some(&token), body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_faculty_cannot_manage_users(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, _) = send(app.clone(), get_request("/api/users", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        app,
        json_request("POST", "/api/users", Some(&token), new_faculty()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_users_require_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(app, get_request("/api/users", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_user(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let faculty_id = create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/api/users/{faculty_id}"),
            Some(&token),
            json!({ "department": "ECE", "is_active": false }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["department"], "ECE");
    assert_eq!(body["is_active"], false);

    let (status, _) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "faculty1", "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        app.clone(),
        delete_request(&format!("/api/users/{faculty_id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app,
        get_request(&format!("/api/users/{faculty_id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_update_is_rejected(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let faculty_id = create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, _) = send(
        app,
        json_request(
            "PUT",
            &format!("/api/users/{faculty_id}"),
            Some(&token),
            json!({}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_delete_own_account(pool: PgPool) {
    let admin_id = create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        delete_request(&format!("/api/users/{admin_id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You cannot delete your own account");

    let (status, _) = send(
        app,
        get_request(&format!("/api/users/{admin_id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
