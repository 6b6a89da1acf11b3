use axum::{Router, routing::get};

use crate::modules::admissions::controller::{get_admissions, get_analytics, get_filter_options};
use crate::state::AppState;

pub fn init_admissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_admissions))
        .route("/analytics", get(get_analytics))
        .route("/filter-options", get(get_filter_options))
}
