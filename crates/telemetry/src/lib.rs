//! Logging setup for the Amplitude session plugin.
//!
//! Output always goes to stderr; stdout is reserved for tagged events.

pub mod tracing_setup;

pub use tracing_setup::*;
