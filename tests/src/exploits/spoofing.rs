//! # Spoofing Attacks
//!
//! ## Attack Vectors
//!
//! 1. Calling the receiver directly instead of through the endpoint
//! 2. Claiming a different origin domain
//! 3. Sending from an unlisted contract on the right origin
//! 4. Calling the sender's verification callback directly
//! 5. Hijacking the default recipient or registry
//! 6. Dispatching on the source endpoint under the trusted sender's name

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_bus::{DeliveryError, DispatchRequest, Mailbox, MessageRecipient};
    use shared_types::{Address, Bytes32, CallContext, ErrorKind, U256};
    use vr_01_verification_sender::{DisclosureOutput, SenderError, VerificationCallback};
    use vr_02_verification_receiver::{ReceiverError, VerificationQueries};
    use relay_runtime::DevnetError;

    fn attacker() -> Address {
        Address::repeat_byte(0x66)
    }

    fn standalone_receiver() -> vr_02_verification_receiver::VerificationReceiver {
        let config = config();
        let endpoint = std::sync::Arc::new(shared_bus::InMemoryMailbox::new(
            config.destination.mailbox,
            config.destination.domain,
        ));
        vr_02_verification_receiver::VerificationReceiver::new(config.receiver_config(), endpoint)
            .unwrap()
    }

    #[tokio::test]
    async fn test_direct_handle_call_rejected() {
        let devnet = devnet();
        let mut receiver = standalone_receiver();

        let err = receiver
            .handle(
                &CallContext::new(attacker(), 0),
                devnet.config().source.domain,
                devnet.sender_identity(),
                &payload(0x11, b"forged", 1),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ReceiverError::NotTransportEndpoint { .. }));
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(!receiver.is_verified(reference_subject()));
    }

    #[tokio::test]
    async fn test_forged_origin_rejected() {
        let mut devnet = devnet();
        let source = devnet.config().source.domain;
        let message = forged_message(
            &devnet,
            0,
            source + 1,
            devnet.sender_identity(),
            payload(0x11, b"forged", 1),
        );

        let err = devnet.inject(&message).await.unwrap_err();

        match err {
            DevnetError::Delivery(DeliveryError::Recipient(ReceiverError::InvalidOrigin {
                got,
                expected,
            })) => {
                assert_eq!(got, source + 1);
                assert_eq!(expected, source);
            }
            other => panic!("expected origin rejection, got {other:?}"),
        }
        assert_eq!(devnet.receiver().verification_count(), 0);
        assert!(!devnet
            .destination_mailbox()
            .delivered(message.id())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_permissionless_mode_accepts_any_sender_on_origin() {
        let mut devnet = devnet();
        let message = forged_message(
            &devnet,
            0,
            devnet.config().source.domain,
            Bytes32::from_address(attacker()),
            payload(0x11, b"from anyone", 1),
        );

        devnet.inject(&message).await.unwrap();
        assert!(devnet.receiver().is_verified(reference_subject()));
    }

    #[tokio::test]
    async fn test_untrusted_sender_rejected_when_enforced() {
        let mut devnet = devnet();
        devnet.set_trust_enforcement(true).unwrap();
        devnet.trust_sender().unwrap();
        let message = forged_message(
            &devnet,
            0,
            devnet.config().source.domain,
            Bytes32::from_address(attacker()),
            payload(0x11, b"forged", 1),
        );

        let err = devnet.inject(&message).await.unwrap_err();
        assert!(matches!(
            err,
            DevnetError::Delivery(DeliveryError::Recipient(ReceiverError::UntrustedSender(_)))
        ));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!devnet.receiver().is_verified(reference_subject()));
    }

    #[tokio::test]
    async fn test_revocation_blocks_future_but_keeps_records() {
        let mut devnet = devnet();
        devnet.set_trust_enforcement(true).unwrap();
        devnet.trust_sender().unwrap();

        devnet
            .verify(reference_identifier(), b"hello".to_vec())
            .await
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        assert!(devnet.deliver().await.is_complete());

        devnet.remove_trusted_sender(devnet.sender_identity()).unwrap();
        devnet
            .verify(Bytes32::repeat_byte(0x22), Vec::new())
            .await
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        let report = devnet.deliver().await;

        assert!(report.failed.is_some());
        assert!(devnet.receiver().is_verified(reference_subject()));
        assert!(!devnet.receiver().is_verified(Address::repeat_byte(0x22)));
    }

    #[tokio::test]
    async fn test_direct_dispatch_cannot_borrow_trusted_identity() {
        let mut devnet = devnet();
        devnet.set_trust_enforcement(true).unwrap();
        devnet.trust_sender().unwrap();
        let forged_subject = Address::repeat_byte(0x66);

        let now = devnet.source_mailbox().now();
        devnet
            .source_mailbox()
            .dispatch(
                &CallContext::new(attacker(), now).with_value(U256::from(1000)),
                DispatchRequest {
                    destination: devnet.config().destination.domain,
                    recipient: Bytes32::from_address(devnet.config().destination.receiver),
                    body: payload(0x66, b"forged", 1),
                },
            )
            .await
            .unwrap();

        let pending = devnet.source_mailbox().pending();
        assert_eq!(pending[0].sender, Bytes32::from_address(attacker()));
        assert_ne!(pending[0].sender, devnet.sender_identity());

        let report = devnet.deliver().await;
        assert!(report.delivered.is_empty());
        assert!(report.failed.is_some());
        assert!(!devnet.receiver().is_verified(forged_subject));
        assert_eq!(devnet.receiver().verification_count(), 0);
    }

    #[tokio::test]
    async fn test_callback_from_non_authority_rejected() {
        let config = config();
        let mailbox = std::sync::Arc::new(shared_bus::InMemoryMailbox::new(
            config.source.mailbox,
            config.source.domain,
        ));
        let mut sender =
            vr_01_verification_sender::VerificationSender::new(config.sender_config(), mailbox)
                .unwrap();

        let err = sender
            .on_verification_success(
                &CallContext::new(attacker(), 0),
                DisclosureOutput::for_identifier(Bytes32::repeat_byte(0x11)),
                b"self-verified".to_vec(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, SenderError::NotVerificationAuthority { caller: attacker() });
        assert!(!sender.verification_successful());
    }

    #[tokio::test]
    async fn test_rejected_proof_never_reaches_sender() {
        let mut devnet = devnet();
        devnet.hub().set_accepting(false);

        let err = devnet
            .verify(reference_identifier(), Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!devnet.sender().verification_successful());
    }

    #[test]
    fn test_non_owner_cannot_redirect_relays() {
        let config = config();
        let mailbox = std::sync::Arc::new(shared_bus::InMemoryMailbox::new(
            config.source.mailbox,
            config.source.domain,
        ));
        let mut sender =
            vr_01_verification_sender::VerificationSender::new(config.sender_config(), mailbox)
                .unwrap();

        let err = sender
            .set_default_recipient(&CallContext::new(attacker(), 0), attacker())
            .unwrap_err();
        assert!(matches!(err, SenderError::NotOwner { .. }));
        assert_eq!(sender.default_recipient(), config.destination.receiver);
    }

    #[test]
    fn test_non_owner_cannot_open_registry() {
        let mut receiver = standalone_receiver();
        let ctx = CallContext::new(attacker(), 0);

        assert!(receiver.add_trusted_sender(&ctx, Bytes32::from_address(attacker())).is_err());
        assert!(receiver.transfer_ownership(&ctx, attacker()).is_err());
        assert!(!receiver.is_trusted_sender(Bytes32::from_address(attacker())));
        assert_ne!(receiver.owner(), attacker());
    }
}
