//! # Outbound Ports
//!
//! The local transport endpoint: the only caller `handle` accepts, and the
//! source of the receiver's local domain.

pub use shared_bus::Mailbox;
