//! # CampusLens Core
//!
//! Core types, errors, and utilities for the CampusLens API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`file_storage`]: Local storage for uploaded certificate files
//! - [`pagination`]: Zero-based page parameters used by list endpoints
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Lenient deserializers for dates, booleans and comma lists
//! - [`validation`]: Custom `validator` functions shared by DTOs
//!
//! # Example
//!
//! ```ignore
//! use campuslens_core::errors::AppError;
//! use campuslens_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Student not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod serde;
pub mod validation;

pub use errors::AppError;
pub use pagination::PageParams;
pub use password::{hash_password, verify_password};
