//! # Domain Invariants
//!
//! Preconditions checked by the sender before it touches state.

use super::errors::SenderError;
use shared_types::{Address, Bytes32, U256};

/// Subject address of an identifier: its low-order 20 bytes.
///
/// An identifier whose low-order bytes are all zero would bind the
/// verification to the null address and is rejected.
pub fn derive_subject_address(user_identifier: Bytes32) -> Result<Address, SenderError> {
    let subject = user_identifier.low_order_address();
    if subject.is_zero() {
        return Err(SenderError::InvalidIdentifier(user_identifier));
    }
    Ok(subject)
}

/// Manual relays must carry a nonzero payment.
pub fn invariant_fee_attached(value: U256) -> Result<(), SenderError> {
    if value.is_zero() {
        return Err(SenderError::InsufficientFee);
    }
    Ok(())
}

/// Relays and recipient updates never target the null address.
pub fn invariant_nonzero_recipient(recipient: Address) -> Result<(), SenderError> {
    if recipient.is_zero() {
        return Err(SenderError::ZeroRecipient);
    }
    Ok(())
}
