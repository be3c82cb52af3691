//! Upstream provider subsystem.
//!
//! # Data Flow
//! ```text
//! GenerationRequest (caller JSON)
//!     → payload.rs (validate, map to upstream schema)
//!     → client.rs (one bounded POST, produces FetchOutcome)
//!     → normalize.rs (pure classification → UpstreamResult)
//!     → handler (answer text or classified error)
//! ```
//!
//! # Design Decisions
//! - The wire document is typed-optional at every level (schema.rs)
//! - Classification is a pure function; transport and logging stay outside
//! - No retries: one inbound request, at most one upstream call

pub mod client;
pub mod normalize;
pub mod payload;
pub mod schema;

pub use client::{ClientBuildError, UpstreamClient};
pub use normalize::{normalize, BlockSource, FetchOutcome, UpstreamResult};
pub use payload::{build_payload, GenerationRequest};
pub use schema::GenerateContentResponse;
