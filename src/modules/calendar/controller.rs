use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::{
    CalendarEventDto, CalendarEventView, CalendarFilterParams, MessageResponse,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::calendar::service::CalendarService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Academic calendar events with display colors
#[utoipa::path(
    get,
    path = "/api/calendar/events",
    params(CalendarFilterParams),
    responses(
        (status = 200, description = "Events ordered by start", body = Vec<CalendarEventView>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn get_events(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<CalendarFilterParams>,
) -> Result<Json<Vec<CalendarEventView>>, AppError> {
    let events = CalendarService::get_events(&state.db, &filters).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/calendar/events",
    request_body = CalendarEventDto,
    responses(
        (status = 201, description = "Event created", body = CalendarEventView),
        (status = 403, description = "Staff role required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
#[instrument(skip(state, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CalendarEventDto>,
) -> Result<(StatusCode, Json<CalendarEventView>), AppError> {
    auth_user.ensure_staff()?;
    let event = CalendarService::create_event(&state.db, dto, auth_user.user_id()?).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

#[utoipa::path(
    put,
    path = "/api/calendar/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = CalendarEventDto,
    responses(
        (status = 200, description = "Updated event", body = CalendarEventView),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
#[instrument(skip(state, dto))]
pub async fn update_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CalendarEventDto>,
) -> Result<Json<CalendarEventView>, AppError> {
    auth_user.ensure_staff()?;
    let event = CalendarService::update_event(&state.db, id, dto, auth_user.user_id()?).await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    delete,
    path = "/api/calendar/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.ensure_staff()?;
    CalendarService::delete_event(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
