//! # Ports Module
//!
//! The receiver is driven by its transport endpoint through
//! [`shared_bus::MessageRecipient`], polled through [`VerificationQueries`],
//! and reads its identity on the bus from the endpoint itself.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
