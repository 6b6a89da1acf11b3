use std::sync::Arc;

use campuslens_config::{CorsConfig, JwtConfig, ObservabilityConfig, StorageConfig};
use campuslens_core::file_storage::{FileStorage, LocalFileStorage};
use campuslens_db::{PgPool, init_db_pool};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
    pub storage: Arc<dyn FileStorage>,
    pub observability: ObservabilityConfig,
}

impl AppState {
    /// Builds state around an existing pool, reading the rest from the environment.
    pub fn from_pool(db: PgPool) -> Self {
        let storage_config = StorageConfig::from_env();
        let storage = LocalFileStorage::with_max_size(
            storage_config.upload_dir.clone(),
            storage_config.public_path.clone(),
            storage_config.max_file_size,
        );

        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            storage: Arc::new(storage),
            storage_config,
            observability: ObservabilityConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool().await?;
    Ok(AppState::from_pool(db))
}
