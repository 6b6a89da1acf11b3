use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::counseling::controller::{
    create_note, delete_note, get_student_notes, update_note,
};
use crate::state::AppState;

pub fn init_counseling_router() -> Router<AppState> {
    Router::new()
        .route("/student/{reg_no}", get(get_student_notes).post(create_note))
        .route("/{id}", put(update_note).delete(delete_note))
}
