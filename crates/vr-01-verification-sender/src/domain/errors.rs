//! # Domain Errors
//!
//! Failure reasons of sender operations.

use shared_bus::BusError;
use shared_types::{Address, Bytes32, ConfigError, ErrorKind};
use thiserror::Error;

/// Sender error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SenderError {
    /// Verification callback invoked by someone other than the authority.
    #[error("caller {caller:?} is not the verification authority")]
    NotVerificationAuthority {
        /// Rejected caller.
        caller: Address,
    },

    /// Owner-only operation invoked by a non-owner.
    #[error("caller {caller:?} is not the owner")]
    NotOwner {
        /// Rejected caller.
        caller: Address,
    },

    /// No successful verification stored yet.
    #[error("no verification to send")]
    NoVerificationToSend,

    /// Relay called without an attached fee.
    #[error("insufficient fee: relay requires a nonzero fee payment")]
    InsufficientFee,

    /// Recipient is the null address.
    #[error("recipient must not be the zero address")]
    ZeroRecipient,

    /// Identifier derives to the null address.
    #[error("identifier {0:?} does not derive a usable subject address")]
    InvalidIdentifier(Bytes32),

    /// Transport refused the dispatch.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] BusError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SenderError {
    /// Failure class for operator tooling.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotVerificationAuthority { .. } | Self::NotOwner { .. } => {
                ErrorKind::Authorization
            }
            Self::NoVerificationToSend
            | Self::InsufficientFee
            | Self::ZeroRecipient
            | Self::InvalidIdentifier(_) => ErrorKind::Precondition,
            Self::Dispatch(_) => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }
}
