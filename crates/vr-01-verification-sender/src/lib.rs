//! # Verification Sender (vr-01)
//!
//! Source-ledger half of the verification relay.
//!
//! ## Responsibilities
//!
//! - Accept verification results from the verification authority
//!   ([`VerificationCallback`]) and keep the most recent one in a single slot
//! - Derive the subject address from the identifier (low-order 20 bytes)
//! - Encode the verification and dispatch it through the local transport
//!   endpoint, paying from the sender's own balance
//!
//! ## Relay paths
//!
//! ```text
//! authority ──callback──→ store ──balance > 0──→ dispatch(entire balance)
//!                           │
//!                           └──balance = 0──→ stored, not relayed
//!
//! operator ──relay(fee, recipient)──→ dispatch(stored verification)
//! ```
//!
//! Only the most recent verification can ever be (re-)relayed; the slot is
//! not a history.

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use adapters::{HubError, StaticVerificationHub};
pub use domain::{
    derive_subject_address, AutoRelayOutcome, DisclosureOutput, LastVerification,
    RelayFailurePolicy, SenderConfig, SenderError, SenderPhase, SenderVerificationState,
};
pub use events::SenderEvent;
pub use ports::inbound::VerificationCallback;
pub use service::VerificationSender;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
