//! Tests for tracing initialization.

use assurance_core::tracing::{init_tracing, init_tracing_with_default};

#[test]
fn init_is_idempotent() {
    init_tracing();
    init_tracing();
    init_tracing_with_default("assurance_engine=debug");
    tracing::info!(target: "assurance_core", "tracing initialized");
}
