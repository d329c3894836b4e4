//! # Domain Value Objects

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes32, ConfigError, DomainId};

/// Receiver configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Address the receiver is deployed at.
    pub address: Address,
    /// The single source domain messages are accepted from.
    pub source_domain: DomainId,
    /// Owner of the trust registry.
    pub owner: Address,
    /// Start with trust enforcement on. Off by default (permissionless).
    #[serde(default)]
    pub enforce_trusted_senders: bool,
    /// Sender identities trusted at deployment.
    #[serde(default)]
    pub trusted_senders: Vec<Bytes32>,
}

impl ReceiverConfig {
    /// Reject null addresses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.is_zero() {
            return Err(ConfigError::ZeroContractAddress);
        }
        if self.owner.is_zero() {
            return Err(ConfigError::ZeroOwner);
        }
        Ok(())
    }
}
