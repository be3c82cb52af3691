//! Configuration validation.
//!
//! Semantic checks on top of what serde enforces syntactically. Pure
//! function over the config; returns all errors, not just the first, so an
//! operator can fix a broken file in one pass.

use std::net::SocketAddr;

use url::Url;

use crate::config::loader::API_KEY_VAR;
use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. "upstream.api_key").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".into(),
            message: format!("not a valid socket address: {}", config.listener.bind_address),
        });
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError {
            field: "listener.max_body_bytes".into(),
            message: "must be greater than zero".into(),
        });
    }

    if config.upstream.api_key.is_empty() {
        errors.push(ValidationError {
            field: "upstream.api_key".into(),
            message: format!("missing credential; set the {} environment variable", API_KEY_VAR),
        });
    }

    if config.upstream.model.is_empty() {
        errors.push(ValidationError {
            field: "upstream.model".into(),
            message: "must not be empty".into(),
        });
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: "upstream.base_url".into(),
            message: format!("unsupported scheme: {}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: "upstream.base_url".into(),
            message: format!("not a valid URL: {}", e),
        }),
    }

    for (field, value) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError {
                field: field.into(),
                message: "must be greater than zero".into(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".into(),
            message: format!(
                "not a valid socket address: {}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
