//! # Shared Bus - Cross-Ledger Message Transport
//!
//! The asynchronous, at-least-once message bus between the source and
//! destination ledgers, and an in-memory implementation of it.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐  dispatch()   ┌──────────────┐          ┌──────────────┐
//! │   Sender     │ ────────────▶ │ Origin       │          │ Destination  │
//! │  (source)    │ ◀──────────── │ Mailbox      │          │ Mailbox      │
//! └──────────────┘  message id   └──────┬───────┘          └──────┬───────┘
//!                                       │      Relayer            │ handle()
//!                                       └────────────────────────▶│
//!                                                                 ▼
//!                                                          ┌──────────────┐
//!                                                          │  Recipient   │
//!                                                          └──────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **FIFO per channel:** a channel is `(origin, destination, recipient)`.
//! - **At-least-once:** failed deliveries stay pending and are retried.
//! - **Caller identity:** a recipient is always invoked with its local
//!   endpoint as the caller.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod mailbox;
pub mod message;
pub mod recipient;
pub mod relayer;

pub use mailbox::{BusError, DeliveryError, InMemoryMailbox, Mailbox};
pub use message::{DispatchReceipt, DispatchRequest, TransportMessage, MESSAGE_VERSION};
pub use recipient::MessageRecipient;
pub use relayer::{RelayReport, Relayer};
