//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler outcome
//!     → logging.rs (structured records, request-ID correlated)
//!     → metrics.rs (per-outcome counters, latency histogram)
//! ```
//!
//! # Design Decisions
//! - Raw upstream payloads appear only in operator-facing logs
//! - Metrics exporter runs on a separate address, off by default

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
