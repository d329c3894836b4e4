//! # Verification Receiver (vr-02)
//!
//! Destination-ledger half of the verification relay.
//!
//! ## Responsibilities
//!
//! - Authenticate inbound messages: caller, origin domain, optional sender
//!   allow-list ([`TrustRegistry`]). The trusted caller and the local domain
//!   both come from the endpoint the receiver is bound to.
//! - Decode verification payloads
//! - Persist [`VerificationRecord`]s keyed by subject address, last write wins
//! - Answer status queries ([`VerificationQueries`])
//!
//! ## Replay tolerance
//!
//! Redelivering a message rewrites the same record with the same values, so
//! the stored state is idempotent. `verification_count` still counts every
//! accepted delivery and is not a count of unique subjects.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::{ReceiverConfig, ReceiverError, TrustRegistry, VerificationRecord};
pub use events::ReceiverEvent;
pub use ports::inbound::VerificationQueries;
pub use service::VerificationReceiver;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
