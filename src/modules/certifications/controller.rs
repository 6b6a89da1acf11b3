use anyhow::anyhow;
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_core::file_storage::{CERTIFICATE_EXTENSIONS, LocalFileStorage, StorageError};
use campuslens_models::{
    Certification, CertificationFields, DummyCertificateRequest, MessageResponse, UploadResponse,
};
use campuslens_reports::{DocumentFormat, html};

use crate::download::Document;
use crate::metrics::track_certificate_upload;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::certifications::service::CertificationService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

const FILE_FIELD: &str = "certificate";
const UPLOAD_PREFIX: &str = "certificates";

/// Multipart form of a certification: text fields plus an optional
/// `certificate` file (pdf, jpg, jpeg or png).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct CertificationForm {
    registration_number: Option<String>,
    title: Option<String>,
    description: Option<String>,
    issuing_organization: Option<String>,
    issue_date: Option<String>,
    expiry_date: Option<String>,
    credential_id: Option<String>,
    certification_type: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    certificate: Option<Vec<u8>>,
}

struct UploadedFile {
    name: String,
    content: Bytes,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::bad_request(anyhow!("Invalid multipart body: {e}"))
}

fn storage_error(e: StorageError) -> AppError {
    if e.is_client_error() {
        AppError::bad_request(anyhow!(e))
    } else {
        AppError::internal(anyhow!(e))
    }
}

async fn read_form(
    mut multipart: Multipart,
) -> Result<(CertificationFields, Option<UploadedFile>), AppError> {
    let mut fields = CertificationFields::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == FILE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content = field.bytes().await.map_err(multipart_error)?;
            if !file_name.is_empty() && !content.is_empty() {
                file = Some(UploadedFile {
                    name: file_name,
                    content,
                });
            }
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            fields
                .set(&name, value)
                .map_err(|e| AppError::unprocessable(anyhow!(e)))?;
        }
    }

    Ok((fields, file))
}

async fn save_upload(state: &AppState, file: &UploadedFile) -> Result<String, StorageError> {
    let key = LocalFileStorage::generate_key(UPLOAD_PREFIX, &file.name, &CERTIFICATE_EXTENSIONS)?;
    state.storage.save(&key, &file.content).await?;
    state.storage.get_url(&key)
}

/// Writes the file under `certificates/` and returns its public URL.
async fn store_file(state: &AppState, file: &UploadedFile) -> Result<String, AppError> {
    let result = save_upload(state, file).await;
    track_certificate_upload(result.is_ok());
    result.map_err(storage_error)
}

/// Best effort removal; a missing or foreign file is only logged.
async fn remove_file(state: &AppState, url: &str) {
    let Some(key) = state.storage.key_from_url(url) else {
        return;
    };
    if let Err(e) = state.storage.delete(&key).await {
        tracing::warn!(error = %e, key = %key, "Failed to remove certificate file");
    }
}

#[utoipa::path(
    get,
    path = "/api/certifications",
    responses(
        (status = 200, description = "All certifications, newest first", body = Vec<Certification>),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Certifications"
)]
#[instrument(skip(state))]
pub async fn get_certifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Certification>>, AppError> {
    auth_user.ensure_staff()?;
    let certifications = CertificationService::get_all(&state.db).await?;
    Ok(Json(certifications))
}

/// Record a certification with an optional certificate file
#[utoipa::path(
    post,
    path = "/api/certifications",
    request_body(content = CertificationForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Certification created", body = Certification),
        (status = 400, description = "Bad file type or size", body = ErrorResponse),
        (status = 403, description = "Not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Missing or invalid fields", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Certifications"
)]
#[instrument(skip(state, multipart))]
pub async fn create_certification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Certification>), AppError> {
    let (fields, file) = read_form(multipart).await?;
    if let Some(reg) = fields.registration_number.as_deref() {
        auth_user.ensure_can_access_student(reg)?;
    }

    let certificate_url = match &file {
        Some(file) => Some(store_file(&state, file).await?),
        None => None,
    };

    match CertificationService::create_certification(&state.db, fields, certificate_url.clone())
        .await
    {
        Ok(certification) => Ok((StatusCode::CREATED, Json(certification))),
        Err(e) => {
            if let Some(url) = certificate_url {
                remove_file(&state, &url).await;
            }
            Err(e)
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/certifications/{id}",
    params(("id" = Uuid, Path, description = "Certification ID")),
    request_body(content = CertificationForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated certification", body = Certification),
        (status = 400, description = "Bad file type or size", body = ErrorResponse),
        (status = 404, description = "Certification not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Certifications"
)]
#[instrument(skip(state, multipart))]
pub async fn update_certification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Certification>, AppError> {
    let existing = CertificationService::get_certification(&state.db, id).await?;
    auth_user.ensure_can_access_student(&existing.registration_number)?;

    let (fields, file) = read_form(multipart).await?;
    let certificate_url = match &file {
        Some(file) => Some(store_file(&state, file).await?),
        None => None,
    };

    let (certification, replaced) =
        CertificationService::update_certification(&state.db, id, fields, certificate_url).await?;
    if let Some(url) = replaced {
        remove_file(&state, &url).await;
    }

    Ok(Json(certification))
}

#[utoipa::path(
    delete,
    path = "/api/certifications/{id}",
    params(("id" = Uuid, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Certification deleted", body = MessageResponse),
        (status = 404, description = "Certification not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Certifications"
)]
#[instrument(skip(state))]
pub async fn delete_certification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = CertificationService::get_certification(&state.db, id).await?;
    auth_user.ensure_can_access_student(&existing.registration_number)?;

    let deleted = CertificationService::delete_certification(&state.db, id).await?;
    if let Some(url) = deleted.certificate_url.as_deref() {
        remove_file(&state, url).await;
    }

    Ok(Json(MessageResponse::new("Certification deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/certifications/{id}/verify",
    params(("id" = Uuid, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Certification verified", body = Certification),
        (status = 403, description = "Staff role required", body = ErrorResponse),
        (status = 404, description = "Certification not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Certifications"
)]
#[instrument(skip(state))]
pub async fn verify_certification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Certification>, AppError> {
    auth_user.ensure_staff()?;
    let certification =
        CertificationService::verify_certification(&state.db, id, auth_user.user_id()?).await?;
    Ok(Json(certification))
}

/// Store a certificate file without creating a record
#[utoipa::path(
    post,
    path = "/api/certifications/upload-certificate",
    request_body(content = CertificationForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored file URL", body = UploadResponse),
        (status = 400, description = "No file, or bad file type or size", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Certifications"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_certificate(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (_, file) = read_form(multipart).await?;
    let file = file.ok_or_else(|| AppError::bad_request(anyhow!("No file uploaded")))?;
    let url = store_file(&state, &file).await?;
    Ok(Json(UploadResponse { url }))
}

/// Render a sample certificate as HTML
#[utoipa::path(
    post,
    path = "/api/certifications/generate-dummy-certificate",
    request_body = DummyCertificateRequest,
    responses(
        (status = 200, description = "Certificate HTML", content_type = "text/html"),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Certifications"
)]
#[instrument(skip(dto))]
pub async fn generate_dummy_certificate(
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DummyCertificateRequest>,
) -> Document {
    Document::inline(
        DocumentFormat::Html,
        html::dummy_certificate(&dto).into_bytes(),
    )
}
