//! # Sender Events
//!
//! Append-only log of what the sender did, in emission order.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes32, DomainId, MessageId, U256};

/// Observable sender events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SenderEvent {
    /// A verification was stored.
    VerificationCompleted {
        /// Identifier from the proof.
        user_identifier: Bytes32,
        /// Derived subject address.
        subject_address: Address,
        /// Ledger time of the verification.
        verified_at: U256,
        /// Caller-supplied bytes.
        auxiliary_data: Vec<u8>,
    },

    /// The stored verification was dispatched.
    VerificationRelayed {
        /// Transport handle.
        message_id: MessageId,
        /// Destination domain.
        destination: DomainId,
        /// Receiver address.
        recipient: Address,
        /// Subject of the relayed verification.
        subject_address: Address,
        /// Fee paid for the dispatch.
        fee: U256,
    },

    /// Owner changed the default recipient.
    DefaultRecipientUpdated {
        /// Previous value.
        previous: Address,
        /// New value.
        current: Address,
    },

    /// Ownership moved.
    OwnershipTransferred {
        /// Previous owner.
        previous: Address,
        /// New owner.
        current: Address,
    },
}
