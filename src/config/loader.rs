//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RaindropConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override the core options.
pub const ENV_NODE_ENDPOINT: &str = "HYDRO_NODE_ENDPOINT";
pub const ENV_CONTRACT_ADDRESS: &str = "HYDRO_CONTRACT_ADDRESS";
pub const ENV_ACCOUNT_ID: &str = "HYDRO_ACCOUNT_ID";
pub const ENV_ACCOUNT_SECRET: &str = "HYDRO_ACCOUNT_SECRET";
pub const ENV_API_USERNAME: &str = "HYDRO_API_USERNAME";
pub const ENV_API_KEY: &str = "HYDRO_API_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a TOML file without validating it.
///
/// A missing file yields the defaults so the client can run purely from
/// environment variables and flags.
pub fn read_config(path: &Path) -> Result<RaindropConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(RaindropConfig::default());
    }
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply overrides from a variable lookup (normally `std::env::var`).
pub fn apply_env_overrides<F>(config: &mut RaindropConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_NODE_ENDPOINT) {
        config.node.endpoint = v;
    }
    if let Some(v) = lookup(ENV_CONTRACT_ADDRESS) {
        config.contract.address = v;
    }
    if let Some(v) = lookup(ENV_ACCOUNT_ID) {
        config.account.id = Some(v);
    }
    if let Some(v) = lookup(ENV_ACCOUNT_SECRET) {
        config.account.secret = v;
    }
    if let Some(v) = lookup(ENV_API_USERNAME) {
        config.api.username = v;
    }
    if let Some(v) = lookup(ENV_API_KEY) {
        config.api.key = v;
    }
}

/// Load configuration from a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<RaindropConfig, ConfigError> {
    let mut config = read_config(path)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
