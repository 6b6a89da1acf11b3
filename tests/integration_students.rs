mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    PASSWORD, create_course, create_grade, create_staff, create_student, delete_request,
    get_request, json_request, login, map_student, send, setup_test_app,
};

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_creates_student_with_portal_login(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/students",
            Some(&token),
            json!({
                "registration_number": "21A91A0501",
                "name": "Asha Rani",
                "email": "asha@example.com",
                "branch": "CSE",
                "current_semester": 3,
                "password": "asha-secret"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registration_number"], "21A91A0501");
    assert_eq!(body["current_semester"], 3);

    let student_token = login(app, "21A91A0501", "asha-secret").await;
    assert!(!student_token.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_registration_number_conflicts(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/students",
            Some(&token),
            json!({
                "registration_number": "21A91A0501",
                "name": "Someone Else",
                "branch": "ECE",
                "current_semester": 1
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_registration_number_is_rejected(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/students",
            Some(&token),
            json!({
                "registration_number": "21 A9-1",
                "name": "Asha",
                "branch": "CSE",
                "current_semester": 3
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_faculty_cannot_create_student(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/students",
            Some(&token),
            json!({
                "registration_number": "21A91A0501",
                "name": "Asha",
                "branch": "CSE",
                "current_semester": 3
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_with_filters(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    create_student(&pool, "21A91A0502", "CSE", 5).await;
    create_student(&pool, "21A91A0401", "ECE", 3).await;
    map_student(&pool, "faculty1", "21A91A0502").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        get_request("/api/students?branch=CSE", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(
        app.clone(),
        get_request("/api/students?semester=3", Some(&token)),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(
        app,
        get_request("/api/students?filter=proctoring", Some(&token)),
    )
    .await;
    let students = body.as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["registration_number"], "21A91A0502");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_sees_only_own_record(pool: PgPool) {
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    create_student(&pool, "21A91A0502", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "21A91A0501", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        get_request("/api/students/21A91A0501", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration_number"], "21A91A0501");
    assert!(body.get("counseling_notes").is_none());

    let (status, _) = send(
        app.clone(),
        get_request("/api/students/21A91A0502", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app, get_request("/api/students", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grades_drive_cgpa_and_credits(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    create_course(&pool, "CS101", 4, 1).await;
    create_course(&pool, "CS102", 2, 1).await;
    create_course(&pool, "CS201", 3, 2).await;
    create_grade(&pool, "21A91A0501", "CS101", 9.0).await;
    create_grade(&pool, "21A91A0501", "CS102", 6.0).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            "/api/students/21A91A0501/grades",
            Some(&token),
            json!({ "course_code": "CS201", "grade_points": 3.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["semester"], 2);
    assert_eq!(body["course_name"], "Course CS201");

    let (status, body) = send(app, get_request("/api/students/21A91A0501", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    // (9*4 + 6*2 + 3*3) / 9
    assert_eq!(body["cgpa"], 6.33);
    assert_eq!(body["status"], "Average");
    assert_eq!(body["total_credits"], 9);
    assert_eq!(body["completed_credits"], 6);
    assert_eq!(body["grades"].as_array().unwrap().len(), 3);
    let sgpa = body["sgpa_data"].as_array().unwrap();
    assert_eq!(sgpa.len(), 2);
    assert_eq!(sgpa[0]["semester"], 1);
    assert_eq!(sgpa[0]["sgpa"], 8.0);
    assert!(body["counseling_notes"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_for_unknown_course(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(
        app,
        json_request(
            "PUT",
            "/api/students/21A91A0501/grades",
            Some(&token),
            json!({ "course_code": "NOPE1", "grade_points": 7.5 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_student(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            "/api/students/21A91A0501",
            Some(&token),
            json!({ "current_semester": 4, "city": "Guntur" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_semester"], 4);
    assert_eq!(body["city"], "Guntur");
    assert_eq!(body["branch"], "CSE");

    let (status, _) = send(
        app.clone(),
        delete_request("/api/students/21A91A0501", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app, get_request("/api/students/21A91A0501", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_nested_achievement_must_belong_to_student(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    create_student(&pool, "21A91A0502", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/students/21A91A0501/achievements",
            Some(&token),
            json!({ "title": "Hackathon winner", "category": "Technical" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registration_number"], "21A91A0501");
    let id = body["id"].as_str().unwrap().to_string();

    let update = json!({ "title": "Renamed", "category": "Technical" });

    let (status, _) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/api/students/21A91A0502/achievements/{id}"),
            Some(&token),
            update.clone(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        app.clone(),
        delete_request(&format!("/api/students/21A91A0502/achievements/{id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/api/students/21A91A0501/achievements/{id}"),
            Some(&token),
            update,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Renamed");

    let (status, _) = send(
        app,
        delete_request(&format!("/api/students/21A91A0501/achievements/{id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_number_is_stored_as_sent(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "admin1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/students",
            Some(&token),
            json!({
                "registration_number": "21a91a0577",
                "name": "Lower Case",
                "email": "lower@test.com",
                "branch": "CSE",
                "current_semester": 1,
                "password": "portalpass1"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registration_number"], "21a91a0577");

    let student = login(app.clone(), "21a91a0577", "portalpass1").await;
    let (status, body) = send(app, get_request("/api/students/21a91a0577", Some(&student))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration_number"], "21a91a0577");
}
