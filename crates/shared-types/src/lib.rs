//! # Shared Types Crate
//!
//! Value types, the failure taxonomy and the verification message codec used
//! by both ledgers of the verification relay.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The wire layout lives only in [`codec`]; the
//!   sender encodes and the receiver decodes through the same functions.
//! - **Fixed Widths**: Identifiers and identities are typed by width
//!   (`Address` = 20 bytes, `Bytes32` = 32 bytes), never raw slices.
//! - **Distinguishable Failures**: Every error maps onto an [`ErrorKind`].

pub mod codec;
pub mod entities;
pub mod errors;

pub use codec::{decode_verification, encode_verification, VerificationMessage};
pub use entities::*;
pub use errors::*;
