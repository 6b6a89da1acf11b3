use axum::{
    Router,
    routing::{post, put},
};

use crate::modules::students::controller::{
    add_student_achievement, add_student_certification, create_student, delete_student,
    delete_student_achievement, get_student, get_students, update_student,
    update_student_achievement, upsert_grade,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route(
            "/{reg_no}",
            put(update_student).get(get_student).delete(delete_student),
        )
        .route("/{reg_no}/grades", put(upsert_grade))
        .route("/{reg_no}/achievements", post(add_student_achievement))
        .route(
            "/{reg_no}/achievements/{id}",
            put(update_student_achievement).delete(delete_student_achievement),
        )
        .route("/{reg_no}/certifications", post(add_student_certification))
}
