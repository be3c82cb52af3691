//! OS signal handling.
//!
//! # Responsibilities
//! - Translate Ctrl-C / SIGINT into the internal shutdown signal
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)

use crate::lifecycle::shutdown::Shutdown;

/// Wait for Ctrl-C and trigger graceful shutdown.
pub async fn listen_for_shutdown(shutdown: Shutdown) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    }
}
