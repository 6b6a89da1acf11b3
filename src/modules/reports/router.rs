use axum::{Router, routing::get};

use crate::modules::reports::controller::{
    download_reports, export_csv, export_excel, generate_report, get_report_types,
    get_semester_performance, preview_reports,
};
use crate::state::AppState;

pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/types", get(get_report_types))
        .route(
            "/semester-performance/{reg_no}",
            get(get_semester_performance),
        )
        .route("/generate-pdf/{reg_no}", get(generate_report))
        .route("/preview-pdf", get(preview_reports))
        .route("/download-pdf", get(download_reports))
        .route("/excel", get(export_excel))
        .route("/csv", get(export_csv))
}
