//! Backend entry-point: loads settings, prepares the ledger store and serves
//! the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr as _};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use inventory::inbound::http::health::HealthState;
use inventory::outbound::persistence::{DbPool, PoolConfig};

use server::{InventorySettings, ServerConfig, create_server, migrations};

async fn server_config(settings: &InventorySettings) -> Result<ServerConfig> {
    let mut config = ServerConfig::new(
        settings.bind_addr()?,
        settings.blob_root(),
        settings.blob_public_base_url()?,
    );

    if let Some(url) = settings.webhook_url()? {
        config = config.with_webhook(url, settings.webhook_timeout());
    }

    if let Some(database_url) = settings.database_url() {
        migrations::run_pending(database_url)
            .await
            .wrap_err("database migrations")?;
        let mut pool_config = PoolConfig::new(database_url);
        if let Some(max) = settings.database_max_connections {
            pool_config = pool_config.with_max_size(max);
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("database pool")?;
        config = config.with_db_pool(pool);
    }

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = InventorySettings::load().wrap_err("loading settings")?;
    let config = server_config(&settings).await?;
    let bind_addr = config.bind_addr;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("starting server")?;
    info!(%bind_addr, "inventory ledger listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated")
}
