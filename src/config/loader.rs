//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::HarnessConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables that override file values, for CI runners that
/// publish the deployment's ports dynamically.
pub const ENV_APIM_HTTP_URL: &str = "MGW_APIM_HTTP_URL";
pub const ENV_APIM_HTTPS_URL: &str = "MGW_APIM_HTTPS_URL";
pub const ENV_GATEWAY_HTTPS_URL: &str = "MGW_GATEWAY_HTTPS_URL";
pub const ENV_USERNAME: &str = "MGW_USERNAME";
pub const ENV_PASSWORD: &str = "MGW_PASSWORD";

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_str(&content)
}

/// Parse, apply environment overrides, and validate.
pub fn load_config_str(content: &str) -> Result<HarnessConfig, ConfigError> {
    let mut config: HarnessConfig = toml::from_str(content)?;
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Defaults plus environment overrides, validated. Used when no file is given.
pub fn default_config() -> Result<HarnessConfig, ConfigError> {
    load_config_str("")
}

pub(crate) fn apply_overrides<F>(config: &mut HarnessConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 5] = [
        (ENV_APIM_HTTP_URL, &mut config.apim.service_url_http),
        (ENV_APIM_HTTPS_URL, &mut config.apim.service_url_https),
        (ENV_GATEWAY_HTTPS_URL, &mut config.gateway.service_url_https),
        (ENV_USERNAME, &mut config.user.username),
        (ENV_PASSWORD, &mut config.user.password),
    ];

    for (key, slot) in targets {
        if let Some(value) = lookup(key) {
            tracing::debug!(key, "Applying configuration override from environment");
            *slot = value;
        }
    }
}
