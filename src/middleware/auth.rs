use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::Deserialize;
use uuid::Uuid;

use campuslens_auth::{Claims, Role, verify_token};
use campuslens_core::AppError;

use crate::state::AppState;

/// Extractor that validates the access token and provides its claims.
///
/// The token is read from `Authorization: Bearer <token>`. Links that open
/// documents directly in a browser cannot set headers, so a `token` query
/// parameter is accepted when the header is absent.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl AuthUser {
    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    pub fn is_staff(&self) -> bool {
        self.0.is_staff()
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    /// Staff user id. Student tokens carry a registration number instead.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    /// Fails with 403 unless the caller is staff or the student themself.
    pub fn ensure_can_access_student(&self, registration_number: &str) -> Result<(), AppError> {
        if self.0.can_access_student(registration_number) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Access denied. You can only access your own records.",
            ))
        }
    }

    pub fn ensure_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Access denied. Administrator privileges required.",
            ))
        }
    }

    pub fn ensure_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::forbidden("Access denied. Staff privileges required."))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
            Err(rejection) if rejection.is_missing() => {
                Query::<TokenQuery>::try_from_uri(&parts.uri)
                    .ok()
                    .and_then(|Query(q)| q.token)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
            }
            Err(_) => {
                return Err(AppError::unauthorized(
                    "Invalid authorization header format",
                ));
            }
        };

        let claims = verify_token(&token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(sub: &str, role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: sub.to_string(),
            username: sub.to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn students_only_reach_their_own_record() {
        let student = auth_user("21A91A0501", Role::Student);
        assert!(student.ensure_can_access_student("21A91A0501").is_ok());
        let err = student.ensure_can_access_student("21A91A0502").unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert!(student.ensure_staff().is_err());
    }

    #[test]
    fn staff_reach_every_record() {
        let faculty = auth_user(&Uuid::new_v4().to_string(), Role::Faculty);
        assert!(faculty.ensure_can_access_student("21A91A0502").is_ok());
        assert!(faculty.ensure_staff().is_ok());
        assert!(!faculty.is_admin());
    }

    #[test]
    fn user_id_requires_a_uuid_subject() {
        let id = Uuid::new_v4();
        assert_eq!(auth_user(&id.to_string(), Role::Admin).user_id().unwrap(), id);
        assert!(auth_user("21A91A0501", Role::Student).user_id().is_err());
    }
}
