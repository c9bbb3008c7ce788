use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::commands;
use crate::database::connection::DbConnection;
use crate::models::user::{CreateUserRequest, UserId};
use crate::server::state::AppState;

pub mod extract;
pub mod my_list;
pub mod resources;
pub mod router;
pub mod state;
pub mod upload;

pub async fn run_all(config: &AppConfig, init_schema: bool) -> anyhow::Result<()> {
    let app_state = Arc::new(AppState::try_init(config, init_schema).await?);
    router::serve(app_state).await?;
    Ok(())
}

pub async fn create_user(
    config: &AppConfig,
    init_schema: bool,
    name: &str,
) -> anyhow::Result<UserId> {
    let db_connection = DbConnection::connect(&config.database).await?;
    if init_schema {
        db_connection.init_schema().await?;
    }
    let request = CreateUserRequest {
        name: name.to_string(),
    };
    Ok(commands::create_user(db_connection.pool(), &request).await?)
}
