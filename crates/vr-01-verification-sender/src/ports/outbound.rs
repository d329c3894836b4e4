//! # Outbound Ports
//!
//! The sender depends only on its local transport endpoint.

pub use shared_bus::{BusError, DispatchReceipt, DispatchRequest, Mailbox};
