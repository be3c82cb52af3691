//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional) + GEMINI_API_KEY env
//!     → loader.rs (parse & overlay credential)
//!     → validation.rs (semantic checks, all errors collected)
//!     → RelayConfig (validated, immutable)
//!     → shared via AppState to handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so only the credential is mandatory
//! - The credential comes from the environment, never from the file
//! - Missing credential is fatal at startup, not per-request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, API_KEY_VAR};
pub use schema::{ListenerConfig, ObservabilityConfig, RelayConfig, TimeoutConfig, UpstreamConfig};
