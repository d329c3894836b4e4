//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes32, VerificationMessage, U256};

/// Durable verification record at the destination, keyed by subject address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Identifier bound to the verified subject.
    pub user_identifier: Bytes32,
    /// Subject the record is stored under.
    pub subject_address: Address,
    /// Caller-supplied bytes, passed through unmodified.
    pub auxiliary_data: Vec<u8>,
    /// Source-ledger time of the verification.
    pub verified_at: U256,
    /// Destination-ledger time of delivery. Says nothing about how recent the
    /// verification itself is.
    pub received_at: u64,
    /// Record is present.
    pub exists: bool,
    /// Subject is verified. Never reset once set.
    pub is_verified: bool,
}

impl VerificationRecord {
    /// Record built from a decoded message delivered at `received_at`.
    pub fn from_message(message: VerificationMessage, received_at: u64) -> Self {
        Self {
            user_identifier: message.user_identifier,
            subject_address: message.subject_address,
            auxiliary_data: message.auxiliary_data,
            verified_at: message.verified_at,
            received_at,
            exists: true,
            is_verified: true,
        }
    }
}
