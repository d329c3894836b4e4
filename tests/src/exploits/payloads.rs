//! # Hostile Payloads
//!
//! An authenticated channel carrying a malformed body must fail the whole
//! delivery: no record, no counter bump, and the message stays undelivered so
//! the transport may retry it.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use rand::{Rng, SeedableRng};
    use relay_runtime::DevnetError;
    use shared_bus::{DeliveryError, Mailbox};
    use shared_types::ErrorKind;
    use vr_02_verification_receiver::{ReceiverError, VerificationQueries};

    async fn assert_rejected(body: Vec<u8>) {
        let mut devnet = devnet();
        let message = forged_message(
            &devnet,
            0,
            devnet.config().source.domain,
            devnet.sender_identity(),
            body,
        );

        let err = devnet.inject(&message).await.unwrap_err();

        assert!(matches!(
            err,
            DevnetError::Delivery(DeliveryError::Recipient(ReceiverError::Decode(_)))
        ));
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(devnet.receiver().verification_count(), 0);
        assert!(!devnet
            .destination_mailbox()
            .delivered(message.id())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_empty_body() {
        assert_rejected(Vec::new()).await;
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let mut body = payload(0x11, b"hello", 1);
        body.truncate(body.len() - 1);
        assert_rejected(body).await;
    }

    #[tokio::test]
    async fn test_trailing_bytes() {
        let mut body = payload(0x11, b"hello", 1);
        body.extend_from_slice(&[0u8; 32]);
        assert_rejected(body).await;
    }

    #[tokio::test]
    async fn test_dirty_address_padding() {
        let mut body = payload(0x11, b"hello", 1);
        // High-order byte of the address word.
        body[32] = 0xff;
        assert_rejected(body).await;
    }

    #[tokio::test]
    async fn test_oversized_length_prefix() {
        let mut body = payload(0x11, b"hello", 1);
        // Low byte of the length word of the dynamic bytes.
        body[128 + 31] = 0xff;
        assert_rejected(body).await;
    }

    #[tokio::test]
    async fn test_random_bodies() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let len = rng.gen_range(0..400);
            let body: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            assert_rejected(body).await;
        }
    }
}
