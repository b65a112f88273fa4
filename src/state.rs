use std::sync::Arc;

use sqlx::PgPool;

use eduplatform_config::{CorsConfig, JwtConfig, ServerConfig, StorageConfig};
use eduplatform_core::{FileStorage, LocalFileStorage};
use eduplatform_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
    pub storage: Arc<dyn FileStorage>,
}

impl AppState {
    /// Builds the state around an existing pool, storing uploads on local disk.
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        storage_config: StorageConfig,
    ) -> Self {
        let storage = Arc::new(LocalFileStorage::new(
            storage_config.upload_dir.clone(),
            storage_config.public_prefix.clone(),
        ));

        Self {
            db,
            jwt_config,
            cors_config,
            storage_config,
            storage,
        }
    }
}

/// Loads every config from the environment and connects the pool.
///
/// Fails when `JWT_SECRET` or `DATABASE_URL` is missing, or when the
/// database cannot be reached.
pub async fn init_app_state(server_config: &ServerConfig) -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env()?;
    let db = init_db_pool(&server_config.database_url).await?;

    Ok(AppState::new(
        db,
        jwt_config,
        CorsConfig::from_env(),
        StorageConfig::from_env(),
    ))
}
