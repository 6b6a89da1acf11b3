use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::{
    Achievement, AchievementExportParams, CreateAchievementDto, LinkStatus, MessageResponse,
    UpdateAchievementDto,
};
use campuslens_reports::achievements::{achievements_table, export_file_stem};
use campuslens_reports::export::{CsvWriter, TableWriter, XlsxWriter};
use campuslens_reports::pdf::{AchievementPdfOptions, achievements_pdf};
use campuslens_reports::DocumentFormat;

use crate::download::{Document, render_blocking};
use crate::middleware::auth::AuthUser;
use crate::modules::achievements::service::AchievementService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Students may only submit for themselves, and only while the submission
/// link is open. Staff can always submit.
pub(crate) async fn ensure_can_submit(
    db: &PgPool,
    auth_user: &AuthUser,
    registration_number: &str,
) -> Result<(), AppError> {
    if auth_user.is_staff() {
        return Ok(());
    }
    auth_user.ensure_can_access_student(registration_number)?;
    if !AchievementService::link_status(db).await? {
        return Err(AppError::forbidden(
            "Achievement submissions are currently closed",
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/achievements",
    responses(
        (status = 200, description = "All achievements, newest first", body = Vec<Achievement>),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn get_achievements(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Achievement>>, AppError> {
    auth_user.ensure_staff()?;
    let achievements = AchievementService::get_all(&state.db).await?;
    Ok(Json(achievements))
}

#[utoipa::path(
    get,
    path = "/api/achievements/student/{reg_no}",
    params(("reg_no" = String, Path, description = "Registration number")),
    responses(
        (status = 200, description = "Achievements of one student", body = Vec<Achievement>),
        (status = 403, description = "Not your record", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn get_student_achievements(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    auth_user.ensure_can_access_student(&reg_no)?;
    let achievements = AchievementService::get_by_student(&state.db, &reg_no).await?;
    Ok(Json(achievements))
}

/// Record an achievement
#[utoipa::path(
    post,
    path = "/api/achievements",
    request_body = CreateAchievementDto,
    responses(
        (status = 201, description = "Achievement created", body = Achievement),
        (status = 403, description = "Submission link closed or not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state, dto))]
pub async fn create_achievement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAchievementDto>,
) -> Result<(StatusCode, Json<Achievement>), AppError> {
    ensure_can_submit(&state.db, &auth_user, &dto.registration_number).await?;
    let achievement = AchievementService::create_achievement(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(achievement)))
}

#[utoipa::path(
    put,
    path = "/api/achievements/{id}",
    params(("id" = Uuid, Path, description = "Achievement ID")),
    request_body = UpdateAchievementDto,
    responses(
        (status = 200, description = "Updated achievement", body = Achievement),
        (status = 404, description = "Achievement not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state, dto))]
pub async fn update_achievement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAchievementDto>,
) -> Result<Json<Achievement>, AppError> {
    auth_user.ensure_staff()?;
    let achievement = AchievementService::update_achievement(&state.db, id, None, dto).await?;
    Ok(Json(achievement))
}

#[utoipa::path(
    delete,
    path = "/api/achievements/{id}",
    params(("id" = Uuid, Path, description = "Achievement ID")),
    responses(
        (status = 200, description = "Achievement deleted", body = MessageResponse),
        (status = 404, description = "Achievement not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn delete_achievement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.ensure_staff()?;
    AchievementService::delete_achievement(&state.db, id, None).await?;
    Ok(Json(MessageResponse::new("Achievement deleted successfully")))
}

/// Whether students can currently submit achievements
#[utoipa::path(
    get,
    path = "/api/achievements/link-status",
    responses(
        (status = 200, description = "Submission link status", body = LinkStatus)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn get_link_status(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<LinkStatus>, AppError> {
    let active = AchievementService::link_status(&state.db).await?;
    Ok(Json(LinkStatus { active }))
}

#[utoipa::path(
    post,
    path = "/api/achievements/link-status",
    request_body = LinkStatus,
    responses(
        (status = 200, description = "Submission link status updated", body = LinkStatus),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn set_link_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(body): Json<LinkStatus>,
) -> Result<Json<LinkStatus>, AppError> {
    auth_user.ensure_staff()?;
    let active = AchievementService::set_link_status(&state.db, body.active).await?;
    tracing::info!(active, changed_by = %auth_user.username(), "Achievement link status changed");
    Ok(Json(LinkStatus { active }))
}

async fn export_rows(
    db: &PgPool,
    params: &AchievementExportParams,
) -> Result<Vec<Achievement>, AppError> {
    let since = params.time_range.start_date(Utc::now().date_naive());
    AchievementService::list_for_export(db, &params.categories, since).await
}

/// Achievement report as PDF
#[utoipa::path(
    get,
    path = "/api/achievements/export/pdf",
    params(AchievementExportParams),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf"),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn export_pdf(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<AchievementExportParams>,
) -> Result<Document, AppError> {
    auth_user.ensure_staff()?;
    let achievements = export_rows(&state.db, &params).await?;
    let today = Utc::now().date_naive();

    let body = render_blocking("achievements", DocumentFormat::Pdf, move || {
        achievements_pdf(
            &achievements,
            &AchievementPdfOptions {
                time_range: params.time_range,
                categories: &params.categories,
                include_details: params.include_details,
                include_charts: params.include_charts,
                generated_on: today,
            },
        )
    })
    .await?;

    Ok(Document::attachment(
        DocumentFormat::Pdf,
        export_file_stem(today),
        body,
    ))
}

async fn export_table<W>(
    state: &AppState,
    params: AchievementExportParams,
    writer: W,
) -> Result<Document, AppError>
where
    W: TableWriter + Send + 'static,
{
    let achievements = export_rows(&state.db, &params).await?;
    let format = writer.format();

    let body = render_blocking("achievements", format, move || {
        writer.write(&achievements_table(&achievements, params.include_details))
    })
    .await?;

    Ok(Document::attachment(
        format,
        export_file_stem(Utc::now().date_naive()),
        body,
    ))
}

/// Achievement list as an Excel workbook
#[utoipa::path(
    get,
    path = "/api/achievements/export/excel",
    params(AchievementExportParams),
    responses(
        (status = 200, description = "Excel workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn export_excel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<AchievementExportParams>,
) -> Result<Document, AppError> {
    auth_user.ensure_staff()?;
    export_table(&state, params, XlsxWriter).await
}

#[utoipa::path(
    get,
    path = "/api/achievements/export/csv",
    params(AchievementExportParams),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Achievements"
)]
#[instrument(skip(state))]
pub async fn export_csv(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<AchievementExportParams>,
) -> Result<Document, AppError> {
    auth_user.ensure_staff()?;
    export_table(&state, params, CsvWriter).await
}
