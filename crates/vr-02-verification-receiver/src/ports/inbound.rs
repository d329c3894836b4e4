//! # Inbound Ports
//!
//! Side-effect-free reads the presentation layer polls.

use crate::domain::VerificationRecord;
use shared_types::{Address, Bytes32, DomainId};

/// Read-only view of the receiver.
pub trait VerificationQueries {
    /// Whether `subject` holds a verified record.
    fn is_verified(&self, subject: Address) -> bool;

    /// Full record for `subject`; an absent record has `exists == false`.
    fn verification_record(&self, subject: Address) -> VerificationRecord;

    /// Subject most recently bound to `user_identifier`, zero if none.
    fn address_by_user_identifier(&self, user_identifier: Bytes32) -> Address;

    /// Whether `sender` is on the trust allow-list.
    fn is_trusted_sender(&self, sender: Bytes32) -> bool;

    /// Domain of the destination ledger.
    fn local_domain(&self) -> DomainId;

    /// Number of accepted messages, duplicates included.
    fn verification_count(&self) -> u64;
}
