//! Role-based authorization middleware.
//!
//! Guards are attached with `route_layer` so that unmatched routes still
//! fall through to the 404 handler:
//!
//! ```rust,ignore
//! use axum::middleware;
//! use crate::middleware::role::require_admin;
//!
//! let users = init_users_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use campuslens_auth::Role;
use campuslens_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Lets the request through when the caller has one of `allowed_roles`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.contains(&auth_user.role()) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}",
            role_list(allowed_roles)
        )));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Admin and faculty.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin, Role::Faculty]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_list_is_readable() {
        assert_eq!(role_list(&[Role::Admin, Role::Faculty]), "admin, faculty");
    }
}
