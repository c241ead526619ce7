//! Activation gate: may a risk's controls move from draft to active?

pub mod activation;

pub use activation::ActivationGate;
