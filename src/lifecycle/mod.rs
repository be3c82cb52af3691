//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate (fail-fast) → Initialize subsystems → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Missing credential aborts startup; the process never serves requests
//!   it cannot fulfill
//! - In-flight upstream calls are abandoned on shutdown; there is no state
//!   to roll back

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
