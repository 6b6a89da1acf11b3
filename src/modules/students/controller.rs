use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::{
    Achievement, Certification, CreateStudentCertificationDto, CreateStudentDto, GradeDetail,
    MessageResponse, Student, StudentAchievementDto, StudentDetail, StudentFilterParams,
    StudentSummary, UpdateAchievementDto, UpdateStudentDto, UpsertGradeDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::achievements::controller::ensure_can_submit;
use crate::modules::achievements::service::AchievementService;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::certifications::service::CertificationService;
use crate::modules::students::service::{StudentQuery, StudentService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List students with their CGPA
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Students with CGPA and status", body = Vec<StudentSummary>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<StudentFilterParams>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    auth_user.ensure_staff()?;

    let mapped_to = params
        .is_proctoring()
        .then(|| params.username.as_deref().unwrap_or(auth_user.username()));

    let students = StudentService::list_students(
        &state.db,
        StudentQuery {
            branch: params.branch.as_deref(),
            semester: params.semester,
            mapped_to,
        },
    )
    .await?;

    Ok(Json(students))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 409, description = "Registration number already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    auth_user.ensure_admin()?;
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Full student record with grades, achievements and certifications
#[utoipa::path(
    get,
    path = "/api/students/{reg_no}",
    params(("reg_no" = String, Path, description = "Registration number")),
    responses(
        (status = 200, description = "Student detail", body = StudentDetail),
        (status = 403, description = "Students can only view their own record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
) -> Result<Json<StudentDetail>, AppError> {
    auth_user.ensure_can_access_student(&reg_no)?;
    let detail =
        StudentService::get_student_detail(&state.db, &reg_no, auth_user.is_staff()).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/students/{reg_no}",
    params(("reg_no" = String, Path, description = "Registration number")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 400, description = "No fields to update", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    auth_user.ensure_admin()?;
    let student = StudentService::update_student(&state.db, &reg_no, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{reg_no}",
    params(("reg_no" = String, Path, description = "Registration number")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.ensure_admin()?;
    StudentService::delete_student(&state.db, &reg_no).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

/// Insert or replace a grade
#[utoipa::path(
    put,
    path = "/api/students/{reg_no}/grades",
    params(("reg_no" = String, Path, description = "Registration number")),
    request_body = UpsertGradeDto,
    responses(
        (status = 200, description = "Saved grade", body = GradeDetail),
        (status = 404, description = "Student or course not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn upsert_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpsertGradeDto>,
) -> Result<Json<GradeDetail>, AppError> {
    auth_user.ensure_staff()?;
    let grade = StudentService::upsert_grade(&state.db, &reg_no, dto).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    post,
    path = "/api/students/{reg_no}/achievements",
    params(("reg_no" = String, Path, description = "Registration number")),
    request_body = StudentAchievementDto,
    responses(
        (status = 201, description = "Achievement created", body = Achievement),
        (status = 403, description = "Submission link closed or not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn add_student_achievement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
    ValidatedJson(dto): ValidatedJson<StudentAchievementDto>,
) -> Result<(StatusCode, Json<Achievement>), AppError> {
    ensure_can_submit(&state.db, &auth_user, &reg_no).await?;
    let achievement =
        AchievementService::create_achievement(&state.db, dto.for_student(&reg_no)).await?;
    Ok((StatusCode::CREATED, Json(achievement)))
}

#[utoipa::path(
    put,
    path = "/api/students/{reg_no}/achievements/{id}",
    params(
        ("reg_no" = String, Path, description = "Registration number"),
        ("id" = Uuid, Path, description = "Achievement ID")
    ),
    request_body = UpdateAchievementDto,
    responses(
        (status = 200, description = "Updated achievement", body = Achievement),
        (status = 404, description = "Achievement not found for this student", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student_achievement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((reg_no, id)): Path<(String, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateAchievementDto>,
) -> Result<Json<Achievement>, AppError> {
    auth_user.ensure_staff()?;
    let achievement =
        AchievementService::update_achievement(&state.db, id, Some(&reg_no), dto).await?;
    Ok(Json(achievement))
}

#[utoipa::path(
    delete,
    path = "/api/students/{reg_no}/achievements/{id}",
    params(
        ("reg_no" = String, Path, description = "Registration number"),
        ("id" = Uuid, Path, description = "Achievement ID")
    ),
    responses(
        (status = 200, description = "Achievement deleted", body = MessageResponse),
        (status = 404, description = "Achievement not found for this student", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student_achievement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((reg_no, id)): Path<(String, Uuid)>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.ensure_staff()?;
    AchievementService::delete_achievement(&state.db, id, Some(&reg_no)).await?;
    Ok(Json(MessageResponse::new("Achievement deleted successfully")))
}

/// Record a certification without a file
#[utoipa::path(
    post,
    path = "/api/students/{reg_no}/certifications",
    params(("reg_no" = String, Path, description = "Registration number")),
    request_body = CreateStudentCertificationDto,
    responses(
        (status = 201, description = "Certification created", body = Certification),
        (status = 403, description = "Not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn add_student_certification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateStudentCertificationDto>,
) -> Result<(StatusCode, Json<Certification>), AppError> {
    auth_user.ensure_can_access_student(&reg_no)?;
    let (fields, certificate_url) = dto.into_fields(&reg_no);
    let certification =
        CertificationService::create_certification(&state.db, fields, certificate_url).await?;
    Ok((StatusCode::CREATED, Json(certification)))
}
