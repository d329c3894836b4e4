//! # Duplicate and Reordered Delivery
//!
//! The transport is at-least-once. The receiver tolerates duplicates by
//! overwriting with identical values; its counter still counts every accepted
//! delivery.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_bus::{BusError, DeliveryError};
    use shared_types::U256;
    use vr_02_verification_receiver::VerificationQueries;
    use relay_runtime::DevnetError;

    #[tokio::test]
    async fn test_duplicate_delivery_is_idempotent() {
        let mut devnet = at_least_once_devnet();
        devnet
            .verify(reference_identifier(), b"hello".to_vec())
            .await
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        devnet.deliver().await;
        let first = devnet.record(reference_subject());

        devnet.redeliver_last().await.unwrap();

        assert_eq!(devnet.record(reference_subject()), first);
        assert_eq!(devnet.receiver().verification_count(), 2);
    }

    #[tokio::test]
    async fn test_replay_protected_endpoint_refuses_duplicate() {
        let mut devnet = devnet();
        devnet
            .verify(reference_identifier(), b"hello".to_vec())
            .await
            .unwrap();
        devnet.relay(U256::one(), None).await.unwrap();
        devnet.deliver().await;

        let err = devnet.redeliver_last().await.unwrap_err();
        assert!(matches!(
            err,
            DevnetError::Delivery(DeliveryError::Bus(BusError::AlreadyDelivered(_)))
        ));
        assert_eq!(devnet.receiver().verification_count(), 1);
    }

    #[tokio::test]
    async fn test_relaying_twice_creates_two_messages() {
        let mut devnet = devnet();
        devnet
            .verify(reference_identifier(), b"hello".to_vec())
            .await
            .unwrap();
        let a = devnet.relay(U256::one(), None).await.unwrap();
        let b = devnet.relay(U256::one(), None).await.unwrap();
        assert_ne!(a.message_id, b.message_id);

        let report = devnet.deliver().await;
        assert_eq!(report.delivered, vec![a.message_id, b.message_id]);
        assert_eq!(devnet.receiver().verification_count(), 2);
        assert!(devnet.receiver().is_verified(reference_subject()));
    }

    #[tokio::test]
    async fn test_reordered_delivery_keeps_last_delivered() {
        let mut devnet = devnet();
        let origin = devnet.config().source.domain;
        let sender = devnet.sender_identity();
        let older = forged_message(&devnet, 0, origin, sender, payload(0x11, b"older", 100));
        let newer = forged_message(&devnet, 1, origin, sender, payload(0x11, b"newer", 200));

        devnet.inject(&newer).await.unwrap();
        devnet.inject(&older).await.unwrap();

        let record = devnet.record(reference_subject());
        assert_eq!(record.auxiliary_data, b"older");
        assert_eq!(record.verified_at, U256::from(100));
    }
}
