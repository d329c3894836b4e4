//! # Adapters
//!
//! Concrete implementations around the sender service.

pub mod verification_hub;

pub use verification_hub::{HubError, StaticVerificationHub};
