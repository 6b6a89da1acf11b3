mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    PASSWORD, create_course, create_grade, create_staff, create_student, delete_request,
    get_request, json_request, login, map_student, send, setup_test_app,
};

#[sqlx::test(migrations = "./migrations")]
async fn test_menu_depends_on_role(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);
    let admin = login(app.clone(), "admin1", PASSWORD).await;
    let faculty = login(app.clone(), "faculty1", PASSWORD).await;
    let student = login(app.clone(), "21A91A0501", PASSWORD).await;

    let (status, body) = send(app.clone(), get_request("/api/menu/faculty", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 8);

    let (_, body) = send(app.clone(), get_request("/api/menu/faculty", Some(&faculty))).await;
    assert_eq!(body.as_array().unwrap().len(), 7);

    let (status, _) = send(app, get_request("/api/menu/faculty", Some(&student))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_courses_catalogue(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let admin = login(app.clone(), "admin1", PASSWORD).await;
    let faculty = login(app.clone(), "faculty1", PASSWORD).await;

    let course = json!({
        "course_code": "CS301",
        "course_name": "Operating Systems",
        "credits": 4,
        "semester": 5
    });

    let (status, _) = send(
        app.clone(),
        json_request("POST", "/api/courses", Some(&faculty), course.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app.clone(),
        json_request("POST", "/api/courses", Some(&admin), course.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["course_code"], "CS301");

    let (status, _) = send(
        app.clone(),
        json_request("POST", "/api/courses", Some(&admin), course),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        app.clone(),
        get_request("/api/courses?semester=5", Some(&faculty)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(app, get_request("/api/courses?semester=1", Some(&faculty))).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_manages_proctor_mappings(pool: PgPool) {
    create_staff(&pool, "admin1", "admin").await;
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    create_student(&pool, "21A91A0502", "CSE", 3).await;
    let app = setup_test_app(pool);
    let admin = login(app.clone(), "admin1", PASSWORD).await;
    let faculty = login(app.clone(), "faculty1", PASSWORD).await;

    let mapping = json!({
        "faculty_username": "faculty1",
        "registration_numbers": ["21A91A0501", "21A91A0502", "21A91A0599"]
    });

    let (status, _) = send(
        app.clone(),
        json_request("POST", "/api/faculty/mappings", Some(&faculty), mapping.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app.clone(),
        json_request("POST", "/api/faculty/mappings", Some(&admin), mapping.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected"], 2);

    let (_, body) = send(
        app.clone(),
        json_request("POST", "/api/faculty/mappings", Some(&admin), mapping),
    )
    .await;
    assert_eq!(body["affected"], 0);

    let (status, body) = send(
        app.clone(),
        get_request("/api/faculty/my-students?username=faculty1", Some(&faculty)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(
        app.clone(),
        json_request(
            "DELETE",
            "/api/faculty/mappings",
            Some(&admin),
            json!({ "faculty_username": "faculty1", "registration_numbers": ["21A91A0501"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected"], 1);

    let (_, body) = send(
        app,
        get_request("/api/faculty/my-students?username=faculty1", Some(&faculty)),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_students_requires_username(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(app, get_request("/api/faculty/my-students", Some(&token))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_all_students_lists_everyone(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    create_student(&pool, "21A91A0401", "ECE", 5).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        get_request("/api/faculty/all-students", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(
        app,
        get_request("/api/faculty/all-students?branch=ECE", Some(&token)),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["registration_number"], "21A91A0401");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_scopes(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    create_student(&pool, "21A91A0401", "ECE", 3).await;
    create_course(&pool, "CS101", 4, 1).await;
    create_grade(&pool, "21A91A0501", "CS101", 8.0).await;
    create_grade(&pool, "21A91A0401", "CS101", 6.0).await;
    map_student(&pool, "faculty1", "21A91A0501").await;
    sqlx::query(
        r#"INSERT INTO achievements (registration_number, title, category, achievement_date)
           VALUES ('21A91A0501', 'Hackathon winner', 'Technical', '2024-08-15')"#,
    )
    .execute(&pool)
    .await
    .unwrap();
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(app.clone(), get_request("/api/faculty/dashboard", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total_students"], 1);
    assert_eq!(body["stats"]["avg_cgpa"], 8.0);
    assert_eq!(body["stats"]["achievements"], 1);
    assert_eq!(body["top_students"][0]["registration_number"], "21A91A0501");
    assert_eq!(body["recent_activities"][0]["title"], "Hackathon winner");
    assert_eq!(body["branch_distribution"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        app,
        get_request("/api/faculty/dashboard?filter=all", Some(&token)),
    )
    .await;
    assert_eq!(body["stats"]["total_students"], 2);
    assert_eq!(body["stats"]["avg_cgpa"], 7.0);
    assert_eq!(body["performance_data"][0]["semester"], 1);
    assert_eq!(body["performance_data"][0]["average_sgpa"], 7.0);
    assert_eq!(body["branch_distribution"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_counseling_notes_lifecycle(pool: PgPool) {
    create_staff(&pool, "faculty1", "faculty").await;
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "faculty1", PASSWORD).await;

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/counseling/student/21A91A0501",
            Some(&token),
            json!({ "note": "Discussed backlog plan", "counseling_date": "12/09/2024" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["counseling_date"], "2024-09-12");
    assert_eq!(body["faculty_name"], "Test User");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/api/counseling/{id}"),
            Some(&token),
            json!({ "note": "Backlog cleared" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["note"], "Backlog cleared");
    assert_eq!(body["counseling_date"], "2024-09-12");

    let (status, _) = send(
        app.clone(),
        json_request("PUT", &format!("/api/counseling/{id}"), Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        app.clone(),
        get_request("/api/counseling/student/21A91A0501", Some(&token)),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(
        app.clone(),
        delete_request(&format!("/api/counseling/{id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        app,
        get_request("/api/counseling/student/21A91A0599", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_cannot_read_counseling(pool: PgPool) {
    create_student(&pool, "21A91A0501", "CSE", 3).await;
    let app = setup_test_app(pool);
    let token = login(app.clone(), "21A91A0501", PASSWORD).await;

    let (status, _) = send(
        app,
        get_request("/api/counseling/student/21A91A0501", Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
