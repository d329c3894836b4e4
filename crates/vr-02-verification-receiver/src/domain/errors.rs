//! # Domain Errors

use shared_types::{Address, Bytes32, CodecError, ConfigError, DomainId, ErrorKind};
use thiserror::Error;

/// Receiver error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiverError {
    /// `handle` called by something other than the local transport endpoint.
    #[error("caller {caller:?} is not the transport endpoint")]
    NotTransportEndpoint {
        /// Rejected caller.
        caller: Address,
    },

    /// Message came from a domain other than the configured source.
    #[error("invalid origin: got {got}, expected {expected}")]
    InvalidOrigin {
        /// Origin domain of the message.
        got: DomainId,
        /// Configured source domain.
        expected: DomainId,
    },

    /// Trust enforcement is on and the sender is not in the registry.
    #[error("untrusted sender: {0:?}")]
    UntrustedSender(Bytes32),

    /// Payload is not a well-formed verification.
    #[error("decode failed: {0}")]
    Decode(#[from] CodecError),

    /// Admin operation invoked by a non-owner.
    #[error("caller {caller:?} is not the owner")]
    NotOwner {
        /// Rejected caller.
        caller: Address,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ReceiverError {
    /// Failure class for operator tooling.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotTransportEndpoint { .. } | Self::NotOwner { .. } => ErrorKind::Authorization,
            Self::InvalidOrigin { .. } | Self::UntrustedSender(_) => ErrorKind::Authentication,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }
}
