use std::fmt;
use std::sync::Arc;

use campuskit_core::{FileStorage, LocalFileStorage};
use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::storage::StorageConfig;

/// Shared application state: the database pool, the blob-store handle, and
/// environment-driven configuration.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: Arc<dyn FileStorage>,
    pub storage_config: StorageConfig,
    pub cors_config: CorsConfig,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("storage_config", &self.storage_config)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> AppState {
    let storage_config = StorageConfig::from_env();
    let storage = LocalFileStorage::new(
        storage_config.upload_dir.clone(),
        storage_config.base_url.clone(),
    );

    AppState {
        db: init_db_pool().await,
        storage: Arc::new(storage),
        storage_config,
        cors_config: CorsConfig::from_env(),
    }
}
