//! Pending attestation edits, staged per control and applied on save.

pub mod pending;

pub use pending::{AttestationEdit, PendingAttestationEdits};
