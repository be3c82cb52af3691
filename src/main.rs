//! Gemini Relay
//!
//! A single-endpoint HTTP proxy for the Google generative-language API.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 GEMINI RELAY                  │
//!                    │                                               │
//!   POST /query      │  ┌────────┐   ┌─────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│ payload │──▶│  upstream  │──┼──▶ Gemini
//!                    │  │ server │   │ builder │   │   client   │  │    API
//!                    │  └────────┘   └─────────┘   └─────┬──────┘  │
//!                    │                                    │         │
//!   {"answer"} /     │  ┌────────┐   ┌────────────┐      ▼         │
//!   {"error"}        │  │response│◀──│ normalizer │◀── outcome     │
//!   ◀────────────────┼──│  body  │   │ (pure fn)  │                │
//!                    │  └────────┘   └────────────┘                │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gemini_relay::config::load_config;
use gemini_relay::http::HttpServer;
use gemini_relay::lifecycle::{signals, Shutdown};
use gemini_relay::observability;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "gemini-relay", about = "HTTP relay for the Gemini API")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted;
    /// GEMINI_API_KEY must be set either way.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Fail-fast: a process without a valid credential must not serve.
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gemini-relay: {}", e);
            std::process::exit(1);
        }
    };

    observability::init_logging(&config.observability.log_level);

    tracing::info!("gemini-relay v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        model = %config.upstream.model,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen_for_shutdown(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
