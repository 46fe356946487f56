//! # a2a-telemetry
//!
//! Structured logging and distributed tracing for the delegation host.
//!
//! ## Features
//! - Structured logging with `tracing`, filtered by `RUST_LOG`, as text or JSON lines
//! - Optional OTLP span export through OpenTelemetry
//! - Span helpers for delegations, card fetches, and skill registration
//!
//! ## Usage
//!
//! ```rust
//! use a2a_telemetry::{init_telemetry, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("a2a-host")?;
//!     info!("ready");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use init::{LogFormat, TelemetryError, init_telemetry, init_with_format, init_with_otlp, shutdown_telemetry};
pub use spans::*;
