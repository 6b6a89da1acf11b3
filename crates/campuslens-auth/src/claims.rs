//! JWT claim structures and the role model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Who a token belongs to.
///
/// `Student` is never stored in `users`; it is assigned to logins that
/// match a row in `student_users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Faculty,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Faculty => "faculty",
            Role::Student => "student",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Faculty)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "faculty" => Ok(Role::Faculty),
            "student" => Ok(Role::Student),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

/// Access token claims.
///
/// `sub` is the user UUID for staff and the registration number for students.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Staff can see every student; a student only themself.
    pub fn can_access_student(&self, registration_number: &str) -> bool {
        self.is_staff() || (self.role == Role::Student && self.sub == registration_number)
    }
}

/// Refresh token claims. `jti` keeps consecutive tokens distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, role: Role) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: sub.to_string(),
            role,
            exp: 1234567890,
            iat: 1234567800,
        }
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Faculty).unwrap();
        assert_eq!(json, r#""faculty""#);
        let role: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn role_from_str_is_case_insensitive() {
        assert_eq!("Faculty".parse::<Role>(), Ok(Role::Faculty));
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn staff_can_access_any_student() {
        assert!(claims("u-1", Role::Faculty).can_access_student("21A91A0501"));
        assert!(claims("u-2", Role::Admin).can_access_student("21A91A0501"));
    }

    #[test]
    fn students_only_access_themselves() {
        let student = claims("21A91A0501", Role::Student);
        assert!(student.can_access_student("21A91A0501"));
        assert!(!student.can_access_student("21A91A0502"));
        assert!(!student.is_staff());
    }

    #[test]
    fn claims_round_trip_through_json() {
        let original = claims("u-1", Role::Admin);
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains(r#""role":"admin""#));
        let parsed: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sub, "u-1");
        assert!(parsed.is_admin());
    }
}
