use axum::{Router, routing::get};

use crate::modules::courses::controller::{create_course, get_courses};
use crate::state::AppState;

pub fn init_courses_router() -> Router<AppState> {
    Router::new().route("/", get(get_courses).post(create_course))
}
