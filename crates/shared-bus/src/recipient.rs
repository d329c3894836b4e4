//! # Message Recipients
//!
//! The receiving side of the bus. A destination endpoint delivers a message by
//! calling [`MessageRecipient::handle`] with itself as the caller.

use async_trait::async_trait;
use shared_types::{Address, Bytes32, CallContext, DomainId};

/// A contract that accepts messages from its local transport endpoint.
#[async_trait]
pub trait MessageRecipient: Send {
    /// Error the recipient rejects a message with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Address the recipient is deployed at.
    fn address(&self) -> Address;

    /// Accept one inbound message.
    ///
    /// `ctx.caller` is whoever invoked the call; recipients must check it is
    /// their configured endpoint.
    async fn handle(
        &mut self,
        ctx: &CallContext,
        origin: DomainId,
        sender: Bytes32,
        body: &[u8],
    ) -> Result<(), Self::Error>;
}
