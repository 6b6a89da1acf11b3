//! Middleware and extractors for authentication and authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor and per-record access checks
//! - [`role`]: route guards for admin-only and staff-only routers
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>` (or `?token=` for downloads)
//! 2. `AuthUser` validates the JWT and exposes the claims
//! 3. Route guards check the role before the handler runs
//! 4. Handlers apply record-level rules such as "students see only themselves"

pub mod auth;
pub mod role;
