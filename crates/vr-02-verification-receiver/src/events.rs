//! # Receiver Events

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes32, DomainId};

/// Observable receiver events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiverEvent {
    /// A verification was persisted.
    VerificationReceived {
        /// Subject the record is stored under.
        subject_address: Address,
        /// Identifier from the payload.
        user_identifier: Bytes32,
        /// Origin domain of the message.
        origin: DomainId,
        /// Source-side sender identity.
        sender: Bytes32,
        /// Destination time of delivery.
        received_at: u64,
    },

    /// Trust enforcement toggled.
    TrustEnforcementChanged {
        /// New setting.
        enforced: bool,
    },

    /// Sender added to the allow-list.
    TrustedSenderAdded {
        /// Sender identity.
        sender: Bytes32,
    },

    /// Sender removed from the allow-list.
    TrustedSenderRemoved {
        /// Sender identity.
        sender: Bytes32,
    },

    /// Registry ownership moved.
    OwnershipTransferred {
        /// Previous owner.
        previous: Address,
        /// New owner.
        current: Address,
    },
}
