//! Observability setup for Concierge.
//!
//! Installs the global `tracing` subscriber used by the `concierge` binary
//! and optionally bridges spans to OpenTelemetry.

pub mod tracing_setup;
