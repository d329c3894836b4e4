//! # Trust Registry
//!
//! Optional allow-list of source-side sender identities. With enforcement off
//! the origin check alone guards `handle`.

use super::errors::ReceiverError;
use shared_types::{Address, Bytes32, ConfigError};
use std::collections::HashSet;

/// Owner-administered sender allow-list.
#[derive(Clone, Debug)]
pub struct TrustRegistry {
    owner: Address,
    enforced: bool,
    trusted: HashSet<Bytes32>,
}

impl TrustRegistry {
    /// Registry owned by `owner`.
    pub fn new(owner: Address, enforced: bool, trusted: impl IntoIterator<Item = Bytes32>) -> Self {
        Self {
            owner,
            enforced,
            trusted: trusted.into_iter().collect(),
        }
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether sender identities are checked.
    pub fn is_enforced(&self) -> bool {
        self.enforced
    }

    /// Whether `sender` is on the allow-list. Independent of enforcement.
    pub fn is_trusted(&self, sender: &Bytes32) -> bool {
        self.trusted.contains(sender)
    }

    /// Whether a message from `sender` passes the trust check.
    pub fn admits(&self, sender: &Bytes32) -> bool {
        !self.enforced || self.is_trusted(sender)
    }

    /// Fail unless `caller` is the owner.
    pub fn require_owner(&self, caller: Address) -> Result<(), ReceiverError> {
        if caller != self.owner {
            return Err(ReceiverError::NotOwner { caller });
        }
        Ok(())
    }

    /// Turn enforcement on or off.
    pub fn set_enforced(&mut self, caller: Address, enforced: bool) -> Result<(), ReceiverError> {
        self.require_owner(caller)?;
        self.enforced = enforced;
        Ok(())
    }

    /// Trust `sender`.
    pub fn add(&mut self, caller: Address, sender: Bytes32) -> Result<(), ReceiverError> {
        self.require_owner(caller)?;
        self.trusted.insert(sender);
        Ok(())
    }

    /// Stop trusting `sender`.
    pub fn remove(&mut self, caller: Address, sender: Bytes32) -> Result<(), ReceiverError> {
        self.require_owner(caller)?;
        self.trusted.remove(&sender);
        Ok(())
    }

    /// Hand the registry to `new_owner`.
    pub fn transfer(&mut self, caller: Address, new_owner: Address) -> Result<(), ReceiverError> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(ConfigError::ZeroOwner.into());
        }
        self.owner = new_owner;
        Ok(())
    }
}
