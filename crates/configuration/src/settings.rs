use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub log: LogSettings,
}

/// Where the records live and how the pool talks to it.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string, e.g. `sqlite://school.db`. Usually supplied through
    /// `DATABASE_URL`; `None` leaves the gateway disconnected.
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
    /// How long a call may wait for a pooled connection.
    pub acquire_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Address the remote call boundary listens on.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::ValidationError(format!("server.host {:?} is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Default `tracing` filter directive when `RUST_LOG` is not set.
    pub level: String,
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Path of the TOML settings file.
    #[cfg_attr(feature = "clap", arg(long))]
    pub config: Option<PathBuf>,

    /// Database connection string (overrides DATABASE_URL).
    #[cfg_attr(feature = "clap", arg(long))]
    pub database_url: Option<String>,

    /// Address to bind the server to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<String>,

    /// Port to bind the server to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub port: Option<u16>,
}
