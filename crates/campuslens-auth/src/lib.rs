//! # CampusLens Auth
//!
//! Roles, JWT claims, and token helpers.
//!
//! Staff accounts (`admin`, `faculty`) live in the `users` table; students
//! authenticate with their registration number and receive the `student`
//! role. Access tokens are short-lived and signed with `JWT_SECRET`;
//! refresh tokens use a separate secret and are also persisted so that
//! logout can revoke them.
//!
//! # Example
//!
//! ```ignore
//! use campuslens_auth::{Role, create_access_token, verify_token};
//! use campuslens_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token("6f1c...", "jdoe", Role::Faculty, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert!(claims.is_staff());
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, RefreshTokenClaims, Role};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
