//! Internal telemetry for the fraud analytics engine.
//!
//! Structured logging via `tracing` plus lock-free in-process counters;
//! there is no external metrics backend.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
