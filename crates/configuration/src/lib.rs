use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, LogSettings, Overrides, ServerSettings, Settings};

/// Default settings file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application settings.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults
/// 2. the TOML file (`config.toml` unless `--config` says otherwise), if it exists
/// 3. `SCHOOL__SECTION__KEY` environment variables
/// 4. `DATABASE_URL`
/// 5. command-line overrides
pub fn load_settings(overrides: &Overrides) -> Result<Settings, ConfigError> {
    build_settings(overrides, std::env::var("DATABASE_URL").ok())
}

fn build_settings(
    overrides: &Overrides,
    database_url: Option<String>,
) -> Result<Settings, ConfigError> {
    let path = overrides
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    let builder = config::Config::builder()
        .set_default("database.max_connections", 5_i64)?
        .set_default("database.acquire_timeout_secs", 5_i64)?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000_i64)?
        .set_default("log.level", "info")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("SCHOOL")
                .prefix_separator("__")
                .separator("__"),
        )
        .set_override_option("database.url", database_url)?
        .set_override_option("database.url", overrides.database_url.clone())?
        .set_override_option("server.host", overrides.host.clone())?
        .set_override_option("server.port", overrides.port.map(i64::from))?
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be at least 1".to_string(),
        ));
    }
    if let Some(url) = &settings.database.url {
        if url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url is set but empty".to_string(),
            ));
        }
    }
    settings.server.socket_addr()?;
    Ok(())
}
