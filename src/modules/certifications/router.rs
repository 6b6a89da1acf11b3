use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{post, put},
};

use crate::modules::certifications::controller::{
    create_certification, delete_certification, generate_dummy_certificate, get_certifications,
    update_certification, upload_certificate, verify_certification,
};
use crate::state::AppState;

/// Room for a maximum size certificate plus the text fields.
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn init_certifications_router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(create_certification).get(get_certifications))
        .route("/upload-certificate", post(upload_certificate))
        .route(
            "/generate-dummy-certificate",
            post(generate_dummy_certificate),
        )
        .route(
            "/{id}",
            put(update_certification).delete(delete_certification),
        )
        .route("/{id}/verify", put(verify_certification))
        .layer(DefaultBodyLimit::max(max_file_size + FORM_OVERHEAD))
}
