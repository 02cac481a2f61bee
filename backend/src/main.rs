//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use travel_backend::inbound::http::health::HealthState;
use travel_backend::outbound::persistence::{DbPool, run_pending_migrations};

use server::{AppSettings, BuildMode, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load configuration")?;
    let bind_addr = settings.bind_addr()?;
    let signing_secret = settings.signing_secret(BuildMode::from_debug_assertions())?;
    let mut config = ServerConfig::new(bind_addr, signing_secret, settings.token_ttl()?)
        .with_cors_origins(settings.cors_origins()?);
    let mut health_state = HealthState::new();

    if let Some(pool_config) = settings.pool_config() {
        if settings.run_migrations {
            run_pending_migrations(pool_config.database_url())
                .await
                .wrap_err("failed to apply database migrations")?;
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        health_state = health_state.with_db_pool(pool.clone());
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "example-data")]
    let config = seed_example_data(config).await?;

    let health_state = web::Data::new(health_state);
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}

/// Seed example travellers into the configured store and pin the server to
/// that store.
///
/// Settings come from `EXAMPLE_DATA_*` variables and the config file; CLI
/// flags belong to [`AppSettings`].
#[cfg(feature = "example-data")]
async fn seed_example_data(config: ServerConfig) -> color_eyre::Result<ServerConfig> {
    use std::ffi::OsString;
    use std::sync::Arc;

    use travel_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
    use travel_backend::outbound::security::Argon2Hasher;

    let settings = ExampleDataSettings::load_from_iter([OsString::from("travel-backend")])
        .wrap_err("failed to load example data configuration")?;
    let repositories = server::repository_ports(&config);
    seed_example_data_on_startup(&settings, &repositories, Arc::new(Argon2Hasher::default()))
        .await
        .wrap_err("failed to seed example data")?;
    Ok(config.with_repositories(repositories))
}
