use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::achievements::controller::{
    create_achievement, delete_achievement, export_csv, export_excel, export_pdf,
    get_achievements, get_link_status, get_student_achievements, set_link_status,
    update_achievement,
};
use crate::state::AppState;

pub fn init_achievements_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_achievement).get(get_achievements))
        .route("/student/{reg_no}", get(get_student_achievements))
        .route("/link-status", get(get_link_status).post(set_link_status))
        .route("/export/pdf", get(export_pdf))
        .route("/export/excel", get(export_excel))
        .route("/export/csv", get(export_csv))
        .route("/{id}", put(update_achievement).delete(delete_achievement))
}
