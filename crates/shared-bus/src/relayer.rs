//! # Relayer
//!
//! Moves messages from an origin outbox to the destination endpoint.
//!
//! Delivery is FIFO per channel `(destination domain, recipient)`. A round
//! stops at the first failed delivery and leaves that message and everything
//! after it pending, so the next round retries in the same order.

use crate::mailbox::{DeliveryError, InMemoryMailbox, Mailbox};
use crate::message::TransportMessage;
use crate::recipient::MessageRecipient;
use parking_lot::Mutex;
use serde::Serialize;
use shared_types::{Bytes32, MessageId};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Outcome of one relay round.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RelayReport {
    /// Correlation id of the round.
    pub round_id: Uuid,
    /// Messages delivered, in order.
    pub delivered: Vec<MessageId>,
    /// First failed message and its reason, if any.
    pub failed: Option<(MessageId, String)>,
    /// Messages left pending on the channel after the round.
    pub remaining: usize,
}

impl RelayReport {
    /// True when every pending message was delivered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_none() && self.remaining == 0
    }
}

/// Off-ledger relayer for a pair of in-memory endpoints.
#[derive(Default)]
pub struct Relayer {
    history: Mutex<Vec<TransportMessage>>,
}

impl Relayer {
    /// Create a relayer with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages this relayer has delivered, oldest first.
    pub fn history(&self) -> Vec<TransportMessage> {
        self.history.lock().clone()
    }

    /// Most recently delivered message.
    pub fn last_delivered(&self) -> Option<TransportMessage> {
        self.history.lock().last().cloned()
    }

    /// Deliver every pending message for `recipient` from `origin` to
    /// `destination`.
    pub async fn relay<R: MessageRecipient>(
        &self,
        origin: &InMemoryMailbox,
        destination: &InMemoryMailbox,
        recipient: &mut R,
    ) -> RelayReport {
        let round_id = Uuid::new_v4();
        let span = info_span!(
            "relay_round",
            correlation_id = %round_id,
            origin = origin.local_domain(),
            destination = destination.local_domain()
        );

        async move {
            let channel = Bytes32::from_address(recipient.address());
            let mut queue = origin.take_channel(destination.local_domain(), channel);
            let mut report = RelayReport {
                round_id,
                ..RelayReport::default()
            };

            while !queue.is_empty() {
                let message = queue.remove(0);
                let id = message.id();
                match destination.process(&message, recipient).await {
                    Ok(()) => {
                        report.delivered.push(id);
                        self.history.lock().push(message);
                    }
                    Err(e) => {
                        warn!(message_id = %id, error = %e, "Delivery failed, leaving pending");
                        report.failed = Some((id, describe(&e)));
                        queue.insert(0, message);
                        break;
                    }
                }
            }

            report.remaining = queue.len();
            origin.restore(queue);

            info!(
                delivered = report.delivered.len(),
                remaining = report.remaining,
                "Relay round finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Deliver an already-delivered message a second time.
    ///
    /// Simulates the at-least-once side of the transport. Endpoints with
    /// replay protection refuse with `AlreadyDelivered`.
    pub async fn redeliver<R: MessageRecipient>(
        &self,
        message: &TransportMessage,
        destination: &InMemoryMailbox,
        recipient: &mut R,
    ) -> Result<(), DeliveryError<R::Error>> {
        destination.process(message, recipient).await?;
        self.history.lock().push(message.clone());
        Ok(())
    }
}

fn describe<E: std::error::Error + 'static>(error: &DeliveryError<E>) -> String {
    match error {
        DeliveryError::Bus(e) => e.to_string(),
        DeliveryError::Recipient(e) => e.to_string(),
    }
}
