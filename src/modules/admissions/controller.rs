use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use campuslens_core::{AppError, PageParams};
use campuslens_models::{
    AdmissionAnalytics, AdmissionFilterOptions, AdmissionFilters, AdmissionPage,
};

use crate::modules::admissions::service::AdmissionService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Admission counts grouped for charts
#[utoipa::path(
    get,
    path = "/api/admissions/analytics",
    params(AdmissionFilters),
    responses(
        (status = 200, description = "Totals and breakdowns", body = AdmissionAnalytics),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admissions"
)]
#[instrument(skip(state))]
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(filters): Query<AdmissionFilters>,
) -> Result<Json<AdmissionAnalytics>, AppError> {
    let analytics = AdmissionService::analytics(&state.db, &filters).await?;
    Ok(Json(analytics))
}

#[utoipa::path(
    get,
    path = "/api/admissions",
    params(AdmissionFilters, PageParams),
    responses(
        (status = 200, description = "One page of admissions", body = AdmissionPage),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admissions"
)]
#[instrument(skip(state))]
pub async fn get_admissions(
    State(state): State<AppState>,
    Query(filters): Query<AdmissionFilters>,
    Query(page): Query<PageParams>,
) -> Result<Json<AdmissionPage>, AppError> {
    let page = AdmissionService::list(&state.db, &filters, &page).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/admissions/filter-options",
    responses(
        (status = 200, description = "Distinct filter values", body = AdmissionFilterOptions),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admissions"
)]
#[instrument(skip(state))]
pub async fn get_filter_options(
    State(state): State<AppState>,
) -> Result<Json<AdmissionFilterOptions>, AppError> {
    let options = AdmissionService::filter_options(&state.db).await?;
    Ok(Json(options))
}
