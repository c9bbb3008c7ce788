use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::connection::DbConnection;
use crate::database::store::ResourceStore;
use crate::hosting::cloudinary::CloudinaryHost;
use crate::hosting::FileHost;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ResourceStore>,
    pub host: Arc<dyn FileHost>,
}

impl AppState {
    pub fn new<S: ResourceStore, H: FileHost>(config: AppConfig, store: S, host: H) -> Self {
        Self {
            config,
            store: Arc::new(store),
            host: Arc::new(host),
        }
    }

    pub async fn try_init(config: &AppConfig, init_schema: bool) -> anyhow::Result<Self> {
        let db_connection = DbConnection::connect(&config.database).await?;
        if init_schema {
            db_connection.init_schema().await?;
        }
        tokio::fs::create_dir_all(&config.uploads.temp_dir).await?;
        let host = CloudinaryHost::new(&config.hosting);
        Ok(Self::new(config.clone(), db_connection, host))
    }
}
