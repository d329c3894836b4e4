//! # Error Types
//!
//! The failure taxonomy shared by sender, receiver and transport, plus the
//! codec error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure class every error in the workspace maps onto.
///
/// Operator tooling uses this to decide whether to retry, re-fund or escalate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Construction-time misconfiguration. Fatal.
    Configuration,
    /// Caller is not entitled to the operation.
    Authorization,
    /// Inbound message failed origin or sender trust checks.
    Authentication,
    /// State not ready for the requested operation.
    Precondition,
    /// Payload does not have the expected shape.
    Decode,
    /// The message bus refused or could not take the dispatch.
    Transport,
}

impl ErrorKind {
    /// True when the same call may succeed later without a code or config
    /// change (after re-funding, a new verification, or transport recovery).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Precondition | Self::Transport)
    }
}

/// Construction-time configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Transport endpoint is the null address.
    #[error("transport endpoint must not be the zero address")]
    ZeroTransportEndpoint,

    /// Default relay recipient is the null address.
    #[error("default recipient must not be the zero address")]
    ZeroDefaultRecipient,

    /// Verification authority is the null address.
    #[error("verification authority must not be the zero address")]
    ZeroVerificationAuthority,

    /// Owner is the null address.
    #[error("owner must not be the zero address")]
    ZeroOwner,

    /// Contract's own address is the null address.
    #[error("contract address must not be the zero address")]
    ZeroContractAddress,
}

impl ConfigError {
    /// Always [`ErrorKind::Configuration`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// Errors decoding a verification payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload could not be parsed as the expected tuple.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Payload parsed but is not the canonical encoding of what it decoded to
    /// (trailing bytes, dirty padding).
    #[error("non-canonical payload: {actual} bytes, canonical encoding is {canonical} bytes")]
    NonCanonical {
        /// Length of the received payload.
        actual: usize,
        /// Length of the canonical re-encoding.
        canonical: usize,
    },
}

impl CodecError {
    /// Always [`ErrorKind::Decode`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Decode
    }
}
