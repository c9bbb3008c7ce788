use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

pub(crate) mod config;
pub(crate) mod database;
pub(crate) mod error;
pub(crate) mod hosting;
pub(crate) mod models;
pub(crate) mod server;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(version, about = "Upload, list and bookmark hosted note files")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
    /// Create missing database tables before serving
    #[arg(long)]
    init_schema: bool,
    /// Insert a user with this name, print its id and exit
    #[arg(long, value_name = "NAME")]
    create_user: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // hosting credentials may come from a local .env file
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    match dotenv {
        Ok(path) => debug!("loaded environment from {path:?}"),
        Err(e) => debug!("no .env loaded: {e}"),
    }

    let args = Args::parse();
    let config = AppConfig::from_yaml_file(args.config)?;
    match args.create_user {
        Some(name) => {
            let user_id = server::create_user(&config, args.init_schema, &name).await?;
            println!("{user_id}");
        }
        None => server::run_all(&config, args.init_schema).await?,
    }

    Ok(())
}
