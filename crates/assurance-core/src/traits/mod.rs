//! Seams between the engine and its collaborators.

pub mod clock;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{AssuranceStore, AttestationWrite};
