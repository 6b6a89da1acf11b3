use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campuslens_auth::{
    Role, create_access_token, create_refresh_token, verify_refresh_token,
};
use campuslens_config::JwtConfig;
use campuslens_core::{AppError, verify_password};
use campuslens_models::{
    AccessTokenResponse, LoginRequest, LoginResponse, LoginUser, TokenPair,
};

use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(sqlx::FromRow)]
struct StaffCredentials {
    id: Uuid,
    username: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    email: String,
    role: Role,
    department: Option<String>,
}

#[derive(sqlx::FromRow)]
struct StudentCredentials {
    registration_number: String,
    password_hash: String,
    name: String,
    email: Option<String>,
    branch: String,
}

/// Splits a full name at the first space: `"Asha Rani Rao"` becomes
/// `("Asha", "Rani Rao")`.
pub(crate) fn split_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

pub struct AuthService;

impl AuthService {
    /// Staff accounts are tried first; otherwise the username is treated as a
    /// student registration number.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let staff = sqlx::query_as::<_, StaffCredentials>(
            r#"SELECT id, username, password_hash, first_name, last_name, email, role, department
               FROM users
               WHERE username = $1 AND is_active = TRUE"#,
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await
        .context("Failed to look up staff account")
        .map_err(AppError::database)?;

        if let Some(staff) = staff {
            if !verify_password(&dto.password, &staff.password_hash)? {
                track_login_failure("invalid_password");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }

            let subject = staff.id.to_string();
            let tokens = Self::issue_tokens(&subject, &staff.username, staff.role, jwt_config)?;

            sqlx::query(
                "UPDATE users SET refresh_token = $1, last_login = NOW() WHERE id = $2",
            )
            .bind(&tokens.refresh_token)
            .bind(staff.id)
            .execute(db)
            .await
            .context("Failed to store refresh token")
            .map_err(AppError::database)?;

            track_login_success(staff.role.as_str());

            return Ok(LoginResponse {
                user: LoginUser {
                    id: subject,
                    username: staff.username,
                    first_name: staff.first_name,
                    last_name: staff.last_name,
                    email: Some(staff.email),
                    role: staff.role,
                    department: staff.department,
                },
                tokens,
            });
        }

        let student = sqlx::query_as::<_, StudentCredentials>(
            r#"SELECT su.registration_number, su.password_hash, s.name, s.email, s.branch
               FROM student_users su
               JOIN students s ON s.registration_number = su.registration_number
               WHERE su.registration_number = $1"#,
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await
        .context("Failed to look up student account")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            track_login_failure("unknown_user");
            AppError::unauthorized(INVALID_CREDENTIALS)
        })?;

        if !verify_password(&dto.password, &student.password_hash)? {
            track_login_failure("invalid_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let reg = student.registration_number;
        let tokens = Self::issue_tokens(&reg, &reg, Role::Student, jwt_config)?;

        sqlx::query(
            r#"UPDATE student_users SET refresh_token = $1, last_login = NOW()
               WHERE registration_number = $2"#,
        )
        .bind(&tokens.refresh_token)
        .bind(&reg)
        .execute(db)
        .await
        .context("Failed to store refresh token")
        .map_err(AppError::database)?;

        track_login_success(Role::Student.as_str());

        let (first_name, last_name) = split_name(&student.name);
        Ok(LoginResponse {
            user: LoginUser {
                id: reg.clone(),
                username: reg,
                first_name,
                last_name,
                email: student.email,
                role: Role::Student,
                department: Some(student.branch),
            },
            tokens,
        })
    }

    fn issue_tokens(
        subject: &str,
        username: &str,
        role: Role,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AppError> {
        let access_token = create_access_token(subject, username, role, jwt_config)?;
        let refresh_token = create_refresh_token(subject, role, jwt_config)?;
        track_jwt_issued();
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a refresh token for a new access token. The token must
    /// still be the one stored for its subject, so logging out revokes it.
    #[instrument(skip_all)]
    pub async fn refresh(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<AccessTokenResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;

        let username: Option<String> = match claims.role {
            Role::Student => sqlx::query_scalar(
                r#"SELECT registration_number FROM student_users
                   WHERE registration_number = $1 AND refresh_token = $2"#,
            )
            .bind(&claims.sub)
            .bind(refresh_token)
            .fetch_optional(db)
            .await
            .context("Failed to verify refresh token")
            .map_err(AppError::database)?,
            Role::Admin | Role::Faculty => {
                let id = Uuid::parse_str(&claims.sub)
                    .map_err(|_| AppError::forbidden("Invalid refresh token"))?;
                sqlx::query_scalar(
                    r#"SELECT username FROM users
                       WHERE id = $1 AND refresh_token = $2 AND is_active = TRUE"#,
                )
                .bind(id)
                .bind(refresh_token)
                .fetch_optional(db)
                .await
                .context("Failed to verify refresh token")
                .map_err(AppError::database)?
            }
        };

        let username = username.ok_or_else(|| AppError::forbidden("Invalid refresh token"))?;
        let access_token = create_access_token(&claims.sub, &username, claims.role, jwt_config)?;
        track_jwt_issued();

        Ok(AccessTokenResponse { access_token })
    }

    /// Clears the refresh token wherever it is stored. Unknown tokens are
    /// not an error.
    #[instrument(skip_all)]
    pub async fn logout(db: &PgPool, refresh_token: &str) -> Result<(), AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        sqlx::query("UPDATE users SET refresh_token = NULL WHERE refresh_token = $1")
            .bind(refresh_token)
            .execute(&mut *tx)
            .await
            .context("Failed to clear staff refresh token")
            .map_err(AppError::database)?;

        sqlx::query("UPDATE student_users SET refresh_token = NULL WHERE refresh_token = $1")
            .bind(refresh_token)
            .execute(&mut *tx)
            .await
            .context("Failed to clear student refresh token")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit logout")
            .map_err(AppError::database)?;

        Ok(())
    }
}
