use axum::Json;
use tracing::instrument;

use campuslens_models::MenuItem;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::menu::service::MenuService;

/// Faculty portal menu for the caller's role
#[utoipa::path(
    get,
    path = "/api/menu/faculty",
    responses(
        (status = 200, description = "Menu entries", body = Vec<MenuItem>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Menu"
)]
#[instrument]
pub async fn get_faculty_menu(auth_user: AuthUser) -> Json<Vec<MenuItem>> {
    Json(MenuService::faculty_menu(auth_user.role()))
}
