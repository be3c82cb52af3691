//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the upstream credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

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

/// Load and validate configuration.
///
/// Reads the optional TOML file, then overlays the credential from the
/// `GEMINI_API_KEY` environment variable. The environment always wins so a
/// key committed to a config file by mistake cannot take effect. Validation
/// failure (including a missing credential) is fatal: the process must not
/// serve requests it cannot fulfill.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = fs::read_to_string(p).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    if let Ok(key) = std::env::var(API_KEY_VAR) {
        if !key.is_empty() {
            config.upstream.api_key = key;
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_without_credential_is_rejected() {
        // Only run meaningfully when the variable is unset in the test env.
        if std::env::var(API_KEY_VAR).is_ok() {
            return;
        }
        let err = load_config(None).expect_err("must refuse to load without a credential");
        assert!(err.to_string().contains(API_KEY_VAR));
    }
}
