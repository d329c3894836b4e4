//! # Domain Value Objects
//!
//! Configuration and outcome types of the sender.

use serde::{Deserialize, Serialize};
use shared_types::{Address, ConfigError, DomainId, MessageId, U256};

/// What happens to a stored verification when its automatic relay fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayFailurePolicy {
    /// The whole verification callback fails; nothing is stored.
    #[default]
    Atomic,
    /// The verification stays stored, the balance is kept, and the relay is
    /// left to the manual relay path.
    Decoupled,
}

/// Sender configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Address the sender is deployed at on the source ledger.
    pub address: Address,
    /// Owner allowed to change the default recipient.
    pub owner: Address,
    /// The only caller accepted on the verification callback.
    pub verification_authority: Address,
    /// Domain relays are sent to.
    pub destination_domain: DomainId,
    /// Receiver used by automatic and default relays.
    pub default_recipient: Address,
    /// Auto-relay failure handling.
    #[serde(default)]
    pub relay_failure_policy: RelayFailurePolicy,
}

impl SenderConfig {
    /// Reject null addresses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.is_zero() {
            return Err(ConfigError::ZeroContractAddress);
        }
        if self.owner.is_zero() {
            return Err(ConfigError::ZeroOwner);
        }
        if self.verification_authority.is_zero() {
            return Err(ConfigError::ZeroVerificationAuthority);
        }
        if self.default_recipient.is_zero() {
            return Err(ConfigError::ZeroDefaultRecipient);
        }
        Ok(())
    }
}

/// Result of the automatic relay attempted after a verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoRelayOutcome {
    /// Balance was zero; nothing dispatched.
    Skipped,
    /// Dispatched paying the entire balance.
    Dispatched {
        /// Transport handle.
        message_id: MessageId,
        /// Fee paid (the whole balance at the time).
        fee: U256,
        /// Overpayment credited back.
        refund: U256,
    },
    /// Dispatch failed under [`RelayFailurePolicy::Decoupled`].
    Failed {
        /// Transport error text.
        reason: String,
    },
}

impl AutoRelayOutcome {
    /// Message id if one was dispatched.
    #[must_use]
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Self::Dispatched { message_id, .. } => Some(*message_id),
            _ => None,
        }
    }
}

/// Lifecycle of the single verification slot.
///
/// `Uninitialized -> Verified -> Relayed*`; a new verification returns to
/// `Verified`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SenderPhase {
    /// Nothing verified since deployment.
    #[default]
    Uninitialized,
    /// A verification is stored and has not been relayed.
    Verified,
    /// The stored verification has been relayed at least once.
    Relayed,
}
