//! Portal server with in-memory collaborators
//!
//! Reads its configuration from the YAML file named by `TOURNEY_CONFIG`, or
//! uses the built-in defaults when the variable is unset.

use anyhow::Result;
use tourney::prelude::*;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "TOURNEY_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tourney=debug")),
        )
        .init();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            PortalConfig::from_yaml_file(&path)?
        }
        Err(_) => PortalConfig::default_config(),
    };
    config.validate()?;

    let addr = config.server.bind.clone();
    tracing::info!(
        fee = config.registration.fee,
        roster_size = config.registration.roster_size,
        admins = config.auth.admins.len(),
        "Starting tourney portal"
    );

    ServerBuilder::new()
        .with_config(config)
        .with_in_memory_backends()
        .serve(&addr)
        .await
}
