//! # Domain Module
//!
//! Core types of the verification receiver.

pub mod entities;
pub mod errors;
pub mod trust_registry;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use trust_registry::TrustRegistry;
pub use value_objects::*;
