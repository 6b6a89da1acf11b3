use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::{
    CounselingNote, CreateCounselingNoteDto, MessageResponse, UpdateCounselingNoteDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::counseling::service::CounselingService;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/counseling/student/{reg_no}",
    params(("reg_no" = String, Path, description = "Registration number")),
    responses(
        (status = 200, description = "Counseling notes, newest first", body = Vec<CounselingNote>),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Counseling"
)]
#[instrument(skip(state))]
pub async fn get_student_notes(
    State(state): State<AppState>,
    Path(reg_no): Path<String>,
) -> Result<Json<Vec<CounselingNote>>, AppError> {
    StudentService::ensure_exists(&state.db, &reg_no).await?;
    let notes = CounselingService::list_notes(&state.db, &reg_no).await?;
    Ok(Json(notes))
}

/// Add a counseling note written by the caller
#[utoipa::path(
    post,
    path = "/api/counseling/student/{reg_no}",
    params(("reg_no" = String, Path, description = "Registration number")),
    request_body = CreateCounselingNoteDto,
    responses(
        (status = 201, description = "Note created", body = CounselingNote),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Counseling"
)]
#[instrument(skip(state, dto))]
pub async fn create_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateCounselingNoteDto>,
) -> Result<(StatusCode, Json<CounselingNote>), AppError> {
    let note =
        CounselingService::create_note(&state.db, &reg_no, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    put,
    path = "/api/counseling/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    request_body = UpdateCounselingNoteDto,
    responses(
        (status = 200, description = "Updated note", body = CounselingNote),
        (status = 400, description = "No fields to update", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Counseling"
)]
#[instrument(skip(state, dto))]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCounselingNoteDto>,
) -> Result<Json<CounselingNote>, AppError> {
    let note = CounselingService::update_note(&state.db, id, dto).await?;
    Ok(Json(note))
}

#[utoipa::path(
    delete,
    path = "/api/counseling/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Counseling"
)]
#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    CounselingService::delete_note(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Counseling note deleted successfully")))
}
