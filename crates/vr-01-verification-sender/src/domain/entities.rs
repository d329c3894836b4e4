//! # Domain Entities
//!
//! The verification slot held by the sender and the proof output it is
//! built from.

use super::value_objects::SenderPhase;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes32, VerificationMessage, U256};

/// Public outputs of a verified disclosure proof, as handed to the callback.
///
/// Only `user_identifier` is consumed by the sender.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureOutput {
    /// Attestation scheme the proof was produced under.
    pub attestation_id: Bytes32,
    /// Opaque identifier of the verified person; its low-order 20 bytes are
    /// the subject address.
    pub user_identifier: Bytes32,
    /// Proof nullifier.
    pub nullifier: Bytes32,
}

impl DisclosureOutput {
    /// Output carrying only an identifier.
    pub fn for_identifier(user_identifier: Bytes32) -> Self {
        Self {
            user_identifier,
            ..Self::default()
        }
    }
}

/// The most recent successful verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastVerification {
    /// Identifier from the proof output.
    pub user_identifier: Bytes32,
    /// Address derived from the identifier.
    pub subject_address: Address,
    /// Caller-supplied bytes, stored verbatim.
    pub auxiliary_data: Vec<u8>,
    /// Ledger time of the verification.
    pub verified_at: U256,
    /// Always true once stored.
    pub successful: bool,
    /// Times this verification has been dispatched.
    pub relay_count: u32,
}

impl LastVerification {
    /// The payload relayed for this verification.
    pub fn to_message(&self) -> VerificationMessage {
        VerificationMessage {
            user_identifier: self.user_identifier,
            subject_address: self.subject_address,
            auxiliary_data: self.auxiliary_data.clone(),
            verified_at: self.verified_at,
        }
    }
}

/// Single-slot verification state. Each new verification overwrites the slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderVerificationState {
    last: Option<LastVerification>,
}

impl SenderVerificationState {
    /// Replace the slot with a fresh, not yet relayed verification.
    pub fn store(
        &mut self,
        user_identifier: Bytes32,
        subject_address: Address,
        auxiliary_data: Vec<u8>,
        verified_at: U256,
    ) {
        self.last = Some(LastVerification {
            user_identifier,
            subject_address,
            auxiliary_data,
            verified_at,
            successful: true,
            relay_count: 0,
        });
    }

    /// The stored verification, if any.
    pub fn last(&self) -> Option<&LastVerification> {
        self.last.as_ref()
    }

    /// Count one dispatch of the stored verification.
    pub fn mark_relayed(&mut self) {
        if let Some(last) = self.last.as_mut() {
            last.relay_count = last.relay_count.saturating_add(1);
        }
    }

    /// True once any verification has succeeded.
    pub fn is_successful(&self) -> bool {
        self.last.as_ref().is_some_and(|l| l.successful)
    }

    /// Where the slot is in its lifecycle.
    pub fn phase(&self) -> SenderPhase {
        match &self.last {
            None => SenderPhase::Uninitialized,
            Some(l) if l.relay_count == 0 => SenderPhase::Verified,
            Some(_) => SenderPhase::Relayed,
        }
    }
}
