//! # Static Verification Hub
//!
//! Stand-in for the external verification authority. Proof checking is a
//! black box here: the hub either accepts every disclosure or rejects every
//! disclosure, and on acceptance calls back into the target as itself.

use crate::domain::{AutoRelayOutcome, DisclosureOutput, SenderError};
use crate::ports::inbound::VerificationCallback;
use shared_types::{Address, CallContext, ErrorKind};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

/// Hub failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// The proof did not verify; the target was not called.
    #[error("proof rejected: {0}")]
    ProofRejected(String),

    /// The target's callback failed.
    #[error("verification callback failed: {0}")]
    Callback(#[from] SenderError),
}

impl HubError {
    /// Failure class, delegating to the callback error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProofRejected(_) => ErrorKind::Authentication,
            Self::Callback(e) => e.kind(),
        }
    }
}

/// Verification authority with a switchable verdict.
pub struct StaticVerificationHub {
    address: Address,
    accepting: AtomicBool,
}

impl StaticVerificationHub {
    /// Hub at `address`, accepting proofs.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            accepting: AtomicBool::new(true),
        }
    }

    /// Address the hub calls back from.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Switch between accepting and rejecting every proof.
    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    /// Whether proofs are currently accepted.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Verify a disclosure and, on success, deliver it to `target`.
    pub async fn verify<T: VerificationCallback + ?Sized>(
        &self,
        target: &mut T,
        disclosure: DisclosureOutput,
        user_data: Vec<u8>,
        timestamp: u64,
    ) -> Result<AutoRelayOutcome, HubError> {
        if !self.is_accepting() {
            warn!(identifier = %disclosure.user_identifier, "Proof rejected by hub");
            return Err(HubError::ProofRejected(format!(
                "disclosure for {} did not verify",
                disclosure.user_identifier
            )));
        }

        info!(identifier = %disclosure.user_identifier, "Proof accepted, invoking callback");
        let ctx = CallContext::new(self.address, timestamp);
        Ok(target
            .on_verification_success(&ctx, disclosure, user_data)
            .await?)
    }
}
