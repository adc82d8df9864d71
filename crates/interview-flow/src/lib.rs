//! Interview lifecycle coordination between employers and service providers.
//!
//! The crate exposes the lifecycle state machine, its storage and
//! notification boundaries, and an axum router; the `interview-flow-api`
//! service wires these to in-memory infrastructure and a CLI.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
