use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use campuslens_core::AppError;
use campuslens_models::{
    DashboardParams, DashboardScope, FacultyDashboard, FacultyStudentParams, MappingResult,
    ProctorMappingDto, StudentSummary,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::faculty::service::FacultyService;
use crate::modules::students::service::{StudentQuery, StudentService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/faculty/all-students",
    params(FacultyStudentParams),
    responses(
        (status = 200, description = "Students with CGPA and status", body = Vec<StudentSummary>),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Faculty"
)]
#[instrument(skip(state))]
pub async fn get_all_students(
    State(state): State<AppState>,
    Query(params): Query<FacultyStudentParams>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    let students = StudentService::list_students(
        &state.db,
        StudentQuery {
            branch: params.branch.as_deref(),
            semester: params.semester,
            mapped_to: None,
        },
    )
    .await?;
    Ok(Json(students))
}

/// Students proctored by a faculty member
#[utoipa::path(
    get,
    path = "/api/faculty/my-students",
    params(FacultyStudentParams),
    responses(
        (status = 200, description = "Mapped students", body = Vec<StudentSummary>),
        (status = 400, description = "Username is required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Faculty"
)]
#[instrument(skip(state))]
pub async fn get_my_students(
    State(state): State<AppState>,
    Query(params): Query<FacultyStudentParams>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    let username = params
        .username
        .as_deref()
        .ok_or_else(|| AppError::bad_request(anyhow!("Username is required")))?;

    let students = StudentService::list_students(
        &state.db,
        StudentQuery {
            branch: params.branch.as_deref(),
            semester: params.semester,
            mapped_to: Some(username),
        },
    )
    .await?;
    Ok(Json(students))
}

#[utoipa::path(
    post,
    path = "/api/faculty/mappings",
    request_body = ProctorMappingDto,
    responses(
        (status = 200, description = "Number of new mappings", body = MappingResult),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Faculty"
)]
#[instrument(skip(state))]
pub async fn add_mappings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ProctorMappingDto>,
) -> Result<Json<MappingResult>, AppError> {
    auth_user.ensure_admin()?;
    let result = FacultyService::add_mappings(&state.db, &dto).await?;
    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/api/faculty/mappings",
    request_body = ProctorMappingDto,
    responses(
        (status = 200, description = "Number of removed mappings", body = MappingResult),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Faculty"
)]
#[instrument(skip(state))]
pub async fn remove_mappings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ProctorMappingDto>,
) -> Result<Json<MappingResult>, AppError> {
    auth_user.ensure_admin()?;
    let result = FacultyService::remove_mappings(&state.db, &dto).await?;
    Ok(Json(result))
}

/// Dashboard figures for the caller's proctees, or for everyone
#[utoipa::path(
    get,
    path = "/api/faculty/dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Dashboard", body = FacultyDashboard),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Faculty"
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<DashboardParams>,
) -> Result<Json<FacultyDashboard>, AppError> {
    let mapped_to = match params.filter {
        DashboardScope::Proctoring => {
            Some(params.username.as_deref().unwrap_or(auth_user.username()))
        }
        DashboardScope::All => None,
    };

    let dashboard = FacultyService::dashboard(&state.db, mapped_to).await?;
    Ok(Json(dashboard))
}
