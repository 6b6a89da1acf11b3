use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::{require_admin, require_staff};
use crate::modules::achievements::init_achievements_router;
use crate::modules::admissions::init_admissions_router;
use crate::modules::auth::init_auth_router;
use crate::modules::calendar::init_calendar_router;
use crate::modules::certifications::init_certifications_router;
use crate::modules::counseling::init_counseling_router;
use crate::modules::courses::init_courses_router;
use crate::modules::faculty::init_faculty_router;
use crate::modules::menu::init_menu_router;
use crate::modules::reports::init_reports_router;
use crate::modules::students::init_students_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let staff = || middleware::from_fn_with_state(state.clone(), require_staff);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest("/menu", init_menu_router().route_layer(staff()))
                .nest("/courses", init_courses_router().route_layer(staff()))
                .nest("/faculty", init_faculty_router().route_layer(staff()))
                .nest("/counseling", init_counseling_router().route_layer(staff()))
                .nest("/admissions", init_admissions_router().route_layer(staff()))
                .nest("/students", init_students_router())
                .nest("/achievements", init_achievements_router())
                .nest(
                    "/certifications",
                    init_certifications_router(state.storage_config.max_file_size),
                )
                .nest("/calendar", init_calendar_router())
                .nest("/reports", init_reports_router()),
        )
        .nest_service(
            &state.storage_config.public_path,
            ServeDir::new(&state.storage_config.upload_dir),
        )
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
