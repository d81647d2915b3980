use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where user records live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Application-specific configuration
/// Composes shared config components from the `core_config` and `database` libraries
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageBackend,
    /// Present only for the Postgres backend
    pub database: Option<PostgresConfig>,
    pub run_migrations: bool,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080
        let storage: StorageBackend = env_parse("USER_STORE", "postgres")?;

        let database = match storage {
            StorageBackend::Postgres => Some(PostgresConfig::from_env()?), // DATABASE_URL required
            StorageBackend::Memory => None,
        };

        let seed_default = if environment.is_development() { "true" } else { "false" };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            storage,
            database,
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
            seed_demo_data: env_parse("SEED_DEMO_DATA", seed_default)?,
        })
    }

    /// Demo records are only ever written in development.
    pub fn should_seed(&self) -> bool {
        self.environment.is_development() && self.seed_demo_data
    }
}
