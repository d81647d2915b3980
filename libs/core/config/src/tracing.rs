use crate::{env_parse, Environment};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter, Layer, Registry};

/// Installs the color-eyre report hook. Call before anything fallible;
/// repeated calls are no-ops.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Shape of each log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// One flattened JSON object per event
    Json,
    /// Multi-line human output
    Pretty,
}

impl LogFormat {
    /// JSON in production, pretty elsewhere.
    pub fn for_environment(environment: &Environment) -> Self {
        if environment.is_production() {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}', expected json or pretty")),
        }
    }
}

fn default_directives(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,sqlx=warn,sea_orm=warn"
    } else {
        "debug,tower_http=debug,sqlx=info,hyper=info"
    }
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .pretty()
            .boxed(),
    }
}

/// Installs the global subscriber with span-trace capture for eyre reports.
///
/// `RUST_LOG` replaces the per-environment filter and `LOG_FORMAT`
/// (`json`/`pretty`) replaces the per-environment format. An invalid
/// `LOG_FORMAT` falls back to the default. Later calls are ignored.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));
    let format = env_parse("LOG_FORMAT", "")
        .unwrap_or_else(|_| LogFormat::for_environment(environment));

    let installed = tracing_subscriber::registry()
        .with(fmt_layer(format))
        .with(tracing_error::ErrorLayer::default())
        .with(filter)
        .try_init();

    match installed {
        Ok(()) => info!(?environment, ?format, "Tracing initialized"),
        Err(_) => debug!("Global subscriber already set"),
    }
}
