//! Observability for the assurance engine.
//! `tracing` with `EnvFilter`, per-module log levels.

pub mod setup;

pub use setup::{init_tracing, init_tracing_with_default};
