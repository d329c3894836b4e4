//! # End-to-End Flows
//!
//! ```text
//! [Hub] ──callback──→ [Sender] ──dispatch──→ [Source Mailbox]
//!                                                  │ relayer
//!                                                  ↓
//!                     [Receiver] ←──handle── [Destination Mailbox]
//! ```
//!
//! ## Test Categories
//!
//! 1. **Reference scenario**: unfunded verification, manual relay, delivery
//! 2. **Auto-relay funding gate**: zero vs nonzero balance
//! 3. **Recipients**: default, alternate, owner-updated
//! 4. **Failure policy**: atomic revert vs decoupled retry

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_bus::Mailbox;
    use shared_types::{decode_verification, Address, Bytes32, U256};
    use vr_01_verification_sender::{AutoRelayOutcome, SenderError, SenderEvent};
    use vr_02_verification_receiver::{ReceiverEvent, VerificationQueries};
    use relay_runtime::DevnetError;

    // =========================================================================
    // REFERENCE SCENARIO
    // =========================================================================

    #[tokio::test]
    async fn test_reference_scenario_end_to_end() {
        let mut devnet = devnet();
        let verified_at = devnet.source_mailbox().now();

        let outcome = devnet
            .verify(reference_identifier(), b"hello".to_vec())
            .await
            .unwrap();
        assert_eq!(outcome, AutoRelayOutcome::Skipped);
        assert!(devnet.sender().verification_successful());
        assert_eq!(devnet.source_mailbox().pending_count(), 0);

        devnet.fund(U256::one());
        let receipt = devnet.relay(U256::one(), None).await.unwrap();

        let relayed: Vec<_> = devnet
            .sender()
            .events()
            .iter()
            .filter_map(|e| match e {
                SenderEvent::VerificationRelayed {
                    message_id,
                    destination,
                    ..
                } => Some((*message_id, *destination)),
                _ => None,
            })
            .collect();
        assert_eq!(
            relayed,
            vec![(receipt.message_id, devnet.config().destination.domain)]
        );

        let pending = devnet.source_mailbox().pending();
        let decoded = decode_verification(&pending[0].body).unwrap();
        assert_eq!(decoded.user_identifier, reference_identifier());
        assert_eq!(decoded.subject_address, reference_subject());
        assert_eq!(decoded.auxiliary_data, b"hello");
        assert_eq!(decoded.verified_at, U256::from(verified_at));

        devnet.destination_mailbox().advance_time(30);
        let report = devnet.deliver().await;
        assert_eq!(report.delivered, vec![receipt.message_id]);
        assert!(devnet
            .destination_mailbox()
            .delivered(receipt.message_id)
            .await
            .unwrap());

        let record = devnet.record(reference_subject());
        assert!(record.exists);
        assert!(record.is_verified);
        assert_eq!(record.user_identifier, reference_identifier());
        assert_eq!(record.auxiliary_data, b"hello");
        assert_eq!(record.verified_at, U256::from(verified_at));
        assert_eq!(record.received_at, devnet.destination_mailbox().now());
        assert_eq!(
            devnet
                .receiver()
                .address_by_user_identifier(reference_identifier()),
            reference_subject()
        );
        assert_eq!(devnet.receiver().verification_count(), 1);
    }

    // =========================================================================
    // AUTO-RELAY FUNDING GATE
    // =========================================================================

    #[tokio::test]
    async fn test_funded_sender_auto_relays_full_balance() {
        let mut config = config();
        config.source.fee_quote = 2;
        let mut devnet = devnet_with(config);
        devnet.fund(U256::from(5));

        let outcome = devnet
            .verify(reference_identifier(), b"auto".to_vec())
            .await
            .unwrap();

        match outcome {
            AutoRelayOutcome::Dispatched { fee, refund, .. } => {
                assert_eq!(fee, U256::from(5));
                assert_eq!(refund, U256::from(3));
            }
            other => panic!("expected dispatch, got {other:?}"),
        }
        assert_eq!(devnet.sender().balance(), U256::from(3));
        assert_eq!(devnet.source_mailbox().fees_collected(), U256::from(2));

        assert!(devnet.deliver().await.is_complete());
        assert!(devnet.receiver().is_verified(reference_subject()));
    }

    #[tokio::test]
    async fn test_auto_relay_below_quote_reverts_verification() {
        let mut config = config();
        config.source.fee_quote = 10;
        let mut devnet = devnet_with(config);
        devnet.fund(U256::from(3));

        let err = devnet
            .verify(reference_identifier(), Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DevnetError::Hub(vr_01_verification_sender::HubError::Callback(
                SenderError::Dispatch(_)
            ))
        ));
        assert!(!devnet.sender().verification_successful());
        assert_eq!(devnet.sender().balance(), U256::from(3));
    }

    #[tokio::test]
    async fn test_relay_refund_funds_next_auto_relay() {
        // Free transport: the whole manual fee comes back as balance.
        let mut devnet = devnet();
        devnet
            .verify(Bytes32::repeat_byte(0x11), Vec::new())
            .await
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        assert_eq!(devnet.sender().balance(), U256::one());

        let outcome = devnet
            .verify(Bytes32::repeat_byte(0x22), Vec::new())
            .await
            .unwrap();
        assert!(matches!(outcome, AutoRelayOutcome::Dispatched { .. }));

        let report = devnet.deliver().await;
        assert_eq!(report.delivered.len(), 2);
        assert!(devnet.receiver().is_verified(Address::repeat_byte(0x11)));
        assert!(devnet.receiver().is_verified(Address::repeat_byte(0x22)));
    }

    // =========================================================================
    // RECIPIENTS
    // =========================================================================

    #[tokio::test]
    async fn test_relay_to_unknown_recipient_never_reaches_receiver() {
        let mut devnet = devnet();
        devnet
            .verify(reference_identifier(), Vec::new())
            .await
            .unwrap();
        devnet
            .relay(U256::one(), Some(Address::repeat_byte(0x77)))
            .await
            .unwrap();

        let report = devnet.deliver().await;
        assert!(report.delivered.is_empty());
        assert_eq!(devnet.source_mailbox().pending_count(), 1);
        assert_eq!(devnet.receiver().verification_count(), 0);
    }

    #[tokio::test]
    async fn test_several_subjects() {
        // A relay paying exactly the quote leaves no refund to auto-relay with.
        let mut config = config();
        config.source.fee_quote = 1;
        let mut devnet = devnet_with(config);
        for byte in [0x11u8, 0x22, 0x33] {
            devnet
                .verify(Bytes32::repeat_byte(byte), vec![byte])
                .await
                .unwrap();
            devnet.relay(U256::one(), None).await.unwrap();
        }

        let report = devnet.deliver().await;
        assert_eq!(report.delivered.len(), 3);
        for byte in [0x11u8, 0x22, 0x33] {
            let record = devnet.record(Address::repeat_byte(byte));
            assert_eq!(record.auxiliary_data, vec![byte]);
        }
        assert_eq!(devnet.receiver().verification_count(), 3);

        let received = devnet
            .receiver()
            .events()
            .iter()
            .filter(|e| matches!(e, ReceiverEvent::VerificationReceived { .. }))
            .count();
        assert_eq!(received, 3);
    }

    #[tokio::test]
    async fn test_new_verification_overwrites_at_destination() {
        let mut config = config();
        config.source.fee_quote = 1;
        let mut devnet = devnet_with(config);
        devnet
            .verify(reference_identifier(), b"first".to_vec())
            .await
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        devnet.deliver().await;

        devnet.source_mailbox().advance_time(60);
        devnet
            .verify(reference_identifier(), b"second".to_vec())
            .await
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        devnet.deliver().await;

        let record = devnet.record(reference_subject());
        assert_eq!(record.auxiliary_data, b"second");
        assert_eq!(
            record.verified_at,
            U256::from(devnet.source_mailbox().now())
        );
        assert_eq!(devnet.receiver().verification_count(), 2);
    }

    // =========================================================================
    // FAILURE POLICY
    // =========================================================================

    #[tokio::test]
    async fn test_decoupled_policy_recovers_after_outage() {
        let mut devnet = decoupled_devnet();
        devnet.fund(U256::from(4));
        devnet.source_mailbox().halt();

        let outcome = devnet
            .verify(reference_identifier(), b"hello".to_vec())
            .await
            .unwrap();
        assert!(matches!(outcome, AutoRelayOutcome::Failed { .. }));
        assert!(devnet.sender().verification_successful());
        assert_eq!(devnet.sender().balance(), U256::from(4));

        devnet.source_mailbox().resume();
        devnet.relay(U256::one(), None).await.unwrap();
        assert!(devnet.deliver().await.is_complete());
        assert!(devnet.receiver().is_verified(reference_subject()));
    }

    #[tokio::test]
    async fn test_manual_relay_during_outage_is_transport_error() {
        let mut devnet = devnet();
        devnet
            .verify(reference_identifier(), Vec::new())
            .await
            .unwrap();
        devnet.source_mailbox().halt();

        let err = devnet.relay(U256::one(), None).await.unwrap_err();
        assert!(err.kind().is_retryable());
        assert!(devnet.sender().verification_successful());
    }

    #[tokio::test]
    async fn test_owner_retargets_default_recipient() {
        let mut devnet = devnet();
        let elsewhere = Address::repeat_byte(0x77);
        devnet.set_default_recipient(elsewhere).unwrap();
        devnet.fund(U256::one());

        let outcome = devnet
            .verify(reference_identifier(), Vec::new())
            .await
            .unwrap();
        assert!(outcome.message_id().is_some());
        assert_eq!(
            devnet.source_mailbox().pending()[0].recipient,
            Bytes32::from_address(elsewhere)
        );

        devnet
            .set_default_recipient(devnet.config().destination.receiver)
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        let report = devnet.deliver().await;
        assert_eq!(report.delivered.len(), 1);
        assert_eq!(devnet.source_mailbox().pending_count(), 1);
    }
}
