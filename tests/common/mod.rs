use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
#[allow(unused_imports)]
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use campuslens::campuslens_core::file_storage::LocalFileStorage;
use campuslens::campuslens_core::hash_password;
use campuslens::router::init_router;
use campuslens::state::AppState;

pub const PASSWORD: &str = "testpass123";

/// App state over the test pool with uploads going to a throwaway directory.
pub fn test_state(pool: PgPool) -> AppState {
    dotenvy::dotenv().ok();
    let mut state = AppState::from_pool(pool);
    let upload_dir = std::env::temp_dir().join(format!("campuslens-test-{}", Uuid::new_v4()));
    state.storage = Arc::new(LocalFileStorage::with_max_size(
        upload_dir.clone(),
        state.storage_config.public_path.clone(),
        state.storage_config.max_file_size,
    ));
    state.storage_config.upload_dir = upload_dir;
    state
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

/// Inserts a staff account; `role` is `admin` or `faculty`.
pub async fn create_staff(pool: &PgPool, username: &str, role: &str) -> Uuid {
    let hashed = hash_password(PASSWORD).unwrap();
    sqlx::query_scalar(
        r#"INSERT INTO users (username, password_hash, first_name, last_name, email, role)
           VALUES ($1, $2, 'Test', 'User', $3, $4::user_role)
           RETURNING id"#,
    )
    .bind(username)
    .bind(hashed)
    .bind(format!("{username}@test.com"))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts a student with a portal login using [`PASSWORD`].
pub async fn create_student(pool: &PgPool, registration_number: &str, branch: &str, semester: i32) {
    sqlx::query(
        r#"INSERT INTO students (registration_number, name, email, branch, current_semester)
           VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(registration_number)
    .bind(format!("Student {registration_number}"))
    .bind(format!("{}@test.com", registration_number.to_lowercase()))
    .bind(branch)
    .bind(semester)
    .execute(pool)
    .await
    .unwrap();

    let hashed = hash_password(PASSWORD).unwrap();
    sqlx::query("INSERT INTO student_users (registration_number, password_hash) VALUES ($1, $2)")
        .bind(registration_number)
        .bind(hashed)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_course(pool: &PgPool, course_code: &str, credits: i32, semester: i32) {
    sqlx::query(
        "INSERT INTO courses (course_code, course_name, credits, semester) VALUES ($1, $2, $3, $4)",
    )
    .bind(course_code)
    .bind(format!("Course {course_code}"))
    .bind(credits)
    .bind(semester)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_grade(pool: &PgPool, registration_number: &str, course_code: &str, points: f64) {
    sqlx::query(
        r#"INSERT INTO grades (registration_number, course_code, semester, grade_points)
           SELECT $1, course_code, semester, $3 FROM courses WHERE course_code = $2"#,
    )
    .bind(registration_number)
    .bind(course_code)
    .bind(points)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn map_student(pool: &PgPool, faculty_username: &str, registration_number: &str) {
    sqlx::query(
        "INSERT INTO faculty_username_mapping (faculty_username, registration_number) VALUES ($1, $2)",
    )
    .bind(faculty_username)
    .bind(registration_number)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn login(app: Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request("POST", "/api/auth/login", None, json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["tokens"]["access_token"].as_str().unwrap().to_string()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn delete_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

const BOUNDARY: &str = "campuslens-test-boundary";

/// Builds a `multipart/form-data` request from text fields and an optional
/// `certificate` file given as `(file_name, content)`.
#[allow(dead_code)]
pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"certificate\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

/// Sends a request and parses the body as JSON (`Null` when empty or not JSON).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Sends a request and returns the raw response parts.
#[allow(dead_code)]
pub async fn send_raw(
    app: Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes)
}
