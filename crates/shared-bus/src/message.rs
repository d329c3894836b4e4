//! # Transport Messages
//!
//! The envelope the bus carries between ledgers and the receipt handed back
//! to a dispatcher.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::{Bytes32, DomainId, MessageId, U256};

/// Current envelope version.
pub const MESSAGE_VERSION: u8 = 3;

/// A message in flight between two domains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportMessage {
    /// Envelope version.
    pub version: u8,
    /// Per-origin dispatch counter.
    pub nonce: u32,
    /// Domain the message was dispatched on.
    pub origin: DomainId,
    /// Dispatching contract, left-padded.
    pub sender: Bytes32,
    /// Domain the message is addressed to.
    pub destination: DomainId,
    /// Recipient contract on the destination, left-padded.
    pub recipient: Bytes32,
    /// Opaque application payload.
    pub body: Vec<u8>,
}

impl TransportMessage {
    /// Packed encoding the message id is computed over.
    ///
    /// `version | nonce | origin | sender | destination | recipient | body`
    #[must_use]
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(77 + self.body.len());
        out.push(self.version);
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&self.origin.to_be_bytes());
        out.extend_from_slice(self.sender.as_bytes());
        out.extend_from_slice(&self.destination.to_be_bytes());
        out.extend_from_slice(self.recipient.as_bytes());
        out.extend_from_slice(&self.body);
        out
    }

    /// Keccak-256 of the packed encoding.
    #[must_use]
    pub fn id(&self) -> MessageId {
        let digest = Keccak256::digest(self.to_packed());
        let mut id = [0u8; 32];
        id.copy_from_slice(&digest);
        Bytes32(id)
    }

    /// Whether this message travels on the channel `(destination, recipient)`.
    #[must_use]
    pub fn is_for(&self, destination: DomainId, recipient: Bytes32) -> bool {
        self.destination == destination && self.recipient == recipient
    }
}

/// Parameters of a dispatch call.
///
/// There is no sender field: the endpoint stamps the caller of `dispatch` as
/// the message sender.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Destination domain.
    pub destination: DomainId,
    /// Recipient identity on the destination.
    pub recipient: Bytes32,
    /// Application payload.
    pub body: Vec<u8>,
}

/// What a successful dispatch returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Handle of the enqueued message.
    pub message_id: MessageId,
    /// Nonce assigned by the origin endpoint.
    pub nonce: u32,
    /// Fee retained by the transport.
    pub fee_charged: U256,
    /// Overpayment returned to the dispatcher.
    pub refund: U256,
}
