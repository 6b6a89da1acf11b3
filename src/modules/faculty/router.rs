use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::faculty::controller::{
    add_mappings, get_all_students, get_dashboard, get_my_students, remove_mappings,
};
use crate::state::AppState;

pub fn init_faculty_router() -> Router<AppState> {
    Router::new()
        .route("/all-students", get(get_all_students))
        .route("/my-students", get(get_my_students))
        .route("/mappings", post(add_mappings).delete(remove_mappings))
        .route("/dashboard", get(get_dashboard))
}
