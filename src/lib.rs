//! Gemini Relay Library
//!
//! A single-endpoint HTTP relay in front of the Google generative-language
//! API, for clients too small to carry TLS, credentials, or the upstream
//! JSON schema themselves.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::RelayConfig;
pub use error::RelayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
