//! # Message Codec
//!
//! Binary layout of a verification record exchanged between ledgers.
//!
//! The payload is the standard contract-ABI parameter encoding of
//!
//! ```text
//! (bytes32 userIdentifier, address userAddress, bytes userData, uint256 timestamp)
//! ```
//!
//! | Offset | Width | Content |
//! |--------|-------|---------|
//! | 0 | 32 | user identifier |
//! | 32 | 32 | subject address, left-padded |
//! | 64 | 32 | offset of `userData` (always 0x80) |
//! | 96 | 32 | verification timestamp |
//! | 128 | 32 | `userData` length |
//! | 160 | ceil32(len) | `userData`, right-padded |
//!
//! There is no schema tag. Decoding is strict: a payload is accepted only if it
//! is byte-for-byte the canonical encoding of the tuple it decodes to.

use crate::entities::{Address, Bytes32, U256};
use crate::errors::CodecError;
use alloy_primitives::{Address as AbiAddress, Bytes as AbiBytes, B256, U256 as AbiU256};
use alloy_sol_types::{sol, SolType};
use serde::{Deserialize, Serialize};

sol! {
    /// Wire form of a relayed verification.
    struct VerificationPayload {
        bytes32 user_identifier;
        address user_address;
        bytes user_data;
        uint256 timestamp;
    }
}

/// Decoded verification message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMessage {
    /// Identifier bound to the verified subject.
    pub user_identifier: Bytes32,
    /// Destination-ledger account derived from the identifier.
    pub subject_address: Address,
    /// Caller-supplied payload, passed through untouched.
    pub auxiliary_data: Vec<u8>,
    /// Source-ledger verification time.
    pub verified_at: U256,
}

impl VerificationMessage {
    /// Encode into the wire payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        encode_verification(self)
    }

    /// Decode from a wire payload.
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        decode_verification(payload)
    }
}

/// Encode a verification message.
#[must_use]
pub fn encode_verification(message: &VerificationMessage) -> Vec<u8> {
    let payload = VerificationPayload {
        user_identifier: B256::from(message.user_identifier.0),
        user_address: AbiAddress::from(message.subject_address.0),
        user_data: AbiBytes::from(message.auxiliary_data.clone()),
        timestamp: to_abi_u256(message.verified_at),
    };
    <VerificationPayload as SolType>::abi_encode_params(&payload)
}

/// Decode a verification payload.
///
/// Fails on anything that is not exactly the canonical encoding: truncated
/// input, trailing bytes, non-zero padding, bad offsets.
pub fn decode_verification(payload: &[u8]) -> Result<VerificationMessage, CodecError> {
    let decoded = <VerificationPayload as SolType>::abi_decode_params(payload)
        .map_err(|e| CodecError::Malformed(e.to_string()))?;

    let canonical = <VerificationPayload as SolType>::abi_encode_params(&decoded);
    if canonical.as_slice() != payload {
        return Err(CodecError::NonCanonical {
            actual: payload.len(),
            canonical: canonical.len(),
        });
    }

    Ok(VerificationMessage {
        user_identifier: Bytes32(decoded.user_identifier.0),
        subject_address: Address(decoded.user_address.0 .0),
        auxiliary_data: decoded.user_data.to_vec(),
        verified_at: from_abi_u256(decoded.timestamp),
    })
}

fn to_abi_u256(value: U256) -> AbiU256 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    AbiU256::from_be_bytes(bytes)
}

fn from_abi_u256(value: AbiU256) -> U256 {
    U256::from_big_endian(&value.to_be_bytes::<32>())
}
