use crate::{env_parse, ConfigError, FromEnv};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Listener address and request lifecycle limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// A request still running after this is answered with 408
    pub request_timeout: Duration,
    /// Budget for cleanup tasks after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// `HOST` (0.0.0.0), `PORT` (8080), `REQUEST_TIMEOUT_SECS` (30),
/// `SHUTDOWN_TIMEOUT_SECS` (30).
impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secs = |key: &str| env_parse::<u64>(key, "30").map(Duration::from_secs);

        Ok(Self {
            host: env_parse("HOST", "0.0.0.0")?,
            port: env_parse("PORT", "8080")?,
            request_timeout: secs("REQUEST_TIMEOUT_SECS")?,
            shutdown_timeout: secs("SHUTDOWN_TIMEOUT_SECS")?,
        })
    }
}
