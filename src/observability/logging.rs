//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Respect `RUST_LOG` when set, config level otherwise
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Request-scoped fields (request_id, outcome) over formatted strings

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the configured level applies to
/// this crate with quieter middleware defaults.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("gemini_relay={},tower_http=info", default_level))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
