//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → [upstream subsystem builds, sends, normalizes]
//!     → response.rs (answer/error body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use response::{AnswerBody, ErrorBody};
pub use server::HttpServer;
