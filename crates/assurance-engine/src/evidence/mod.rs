//! Evidence request/submission/review state machine.
//!
//! ```text
//!            submit              review(accepted)           close
//!   open ───────────► submitted ─────────────────► accepted ──────► closed
//!    │                 ▲     │
//!    │          submit │     │ review(rejected, notes)
//!    │                 │     ▼
//!    │               rejected
//!    │  cancel          │ cancel
//!    └──────────► cancelled ◄┘
//! ```

pub mod workflow;

pub use workflow::{EvidenceAction, EvidenceWorkflow, NewEvidenceRequest};
