//! Shared fixtures for the suite.

use relay_runtime::{Devnet, RelayConfig};
use shared_bus::{TransportMessage, MESSAGE_VERSION};
use shared_types::{encode_verification, Address, Bytes32, DomainId, VerificationMessage, U256};
use vr_01_verification_sender::RelayFailurePolicy;

/// Identifier used by the reference scenario.
pub fn reference_identifier() -> Bytes32 {
    Bytes32::repeat_byte(0x11)
}

/// Subject derived from [`reference_identifier`].
pub fn reference_subject() -> Address {
    Address::repeat_byte(0x11)
}

/// Default devnet configuration.
pub fn config() -> RelayConfig {
    RelayConfig::default()
}

/// Devnet with default configuration.
pub fn devnet() -> Devnet {
    devnet_with(config())
}

/// Devnet from `config`.
pub fn devnet_with(config: RelayConfig) -> Devnet {
    Devnet::from_config(config).unwrap()
}

/// Devnet whose sender keeps verifications when the automatic relay fails.
pub fn decoupled_devnet() -> Devnet {
    let mut config = config();
    config.source.relay_failure_policy = RelayFailurePolicy::Decoupled;
    devnet_with(config)
}

/// Devnet whose destination endpoint delivers duplicates.
pub fn at_least_once_devnet() -> Devnet {
    let mut config = config();
    config.destination.replay_protection = false;
    devnet_with(config)
}

/// Encoded verification for `byte`-repeated identifier and subject.
pub fn payload(byte: u8, data: &[u8], verified_at: u64) -> Vec<u8> {
    encode_verification(&VerificationMessage {
        user_identifier: Bytes32::repeat_byte(byte),
        subject_address: Address::repeat_byte(byte),
        auxiliary_data: data.to_vec(),
        verified_at: U256::from(verified_at),
    })
}

/// A message addressed to the devnet receiver, built outside any outbox.
pub fn forged_message(
    devnet: &Devnet,
    nonce: u32,
    origin: DomainId,
    sender: Bytes32,
    body: Vec<u8>,
) -> TransportMessage {
    TransportMessage {
        version: MESSAGE_VERSION,
        nonce,
        origin,
        sender,
        destination: devnet.config().destination.domain,
        recipient: Bytes32::from_address(devnet.config().destination.receiver),
        body,
    }
}
