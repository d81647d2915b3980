use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::FromEnv;
use database::common::RetryConfig;
use database::postgres::{DatabaseConnection, PostgresConfig, connect, run_migrations};
use domain_users::{InMemoryUserRepository, PgUserRepository, UserRepository, UserService};
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod seed;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        storage = %config.storage,
        "Starting users API"
    );

    let db = match &config.database {
        Some(pg) => Some(connect_postgres(pg, &config).await?),
        None => None,
    };

    let api_routes = match &db {
        Some(db) => build_api(PgUserRepository::new(db.clone()), &config).await?,
        None => build_api(InMemoryUserRepository::new(), &config).await?,
    };

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes, &config.environment, &config.server)?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    // - /health: liveness with app name/version
    // - /ready: pings Postgres when configured
    let app = router
        .merge(health_router(config.app))
        .merge(api::ready_router(state.clone()));

    create_production_app(app, &config.server, async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(()) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}

async fn connect_postgres(pg: &PostgresConfig, config: &Config) -> eyre::Result<DatabaseConnection> {
    let retry = RetryConfig::from_env()?;
    let db = connect(pg, retry)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    Ok(db)
}

/// Wraps `repository` in the service, seeds it when enabled and returns the
/// `/v1/users` routes.
async fn build_api<R: UserRepository + 'static>(
    repository: R,
    config: &Config,
) -> eyre::Result<axum::Router> {
    let service = UserService::new(repository);

    if config.should_seed() {
        seed::seed_demo_data(&service)
            .await
            .map_err(|e| eyre::eyre!("Seeding demo data failed: {}", e))?;
    }

    Ok(api::routes(service))
}
