//! # CampusLens Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token secrets and lifetimes
//! - [`cors`]: allowed browser origins
//! - [`storage`]: upload directory and size limit
//! - [`server`]: bind address
//! - [`observability`]: metrics and OpenTelemetry switches
//!
//! # Example
//!
//! ```ignore
//! use campuslens_config::{JwtConfig, CorsConfig, StorageConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod observability;
pub mod server;
pub mod storage;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use observability::ObservabilityConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
