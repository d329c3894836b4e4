//! # Local Devnet
//!
//! Two in-memory ledgers joined by a relayer:
//!
//! ```text
//! source:       hub ──callback──→ sender ──dispatch──→ mailbox(outbox)
//!                                                          │
//!                                                       relayer
//!                                                          ↓
//! destination:                    receiver ←──handle── mailbox
//! ```
//!
//! Operator actions use the configured owners as callers.

use crate::config::RelayConfig;
use serde::Serialize;
use shared_bus::{
    DeliveryError, DispatchReceipt, InMemoryMailbox, Mailbox, RelayReport, Relayer,
    TransportMessage,
};
use shared_types::{Address, Bytes32, CallContext, DomainId, ErrorKind, U256};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use vr_01_verification_sender::{
    AutoRelayOutcome, DisclosureOutput, HubError, SenderError, StaticVerificationHub,
    VerificationSender,
};
use vr_02_verification_receiver::{
    ReceiverError, VerificationQueries, VerificationReceiver, VerificationRecord,
};

/// Devnet failures.
#[derive(Debug, Error)]
pub enum DevnetError {
    /// Sender refused.
    #[error(transparent)]
    Sender(#[from] SenderError),

    /// Receiver refused.
    #[error(transparent)]
    Receiver(#[from] ReceiverError),

    /// Verification authority refused.
    #[error(transparent)]
    Hub(#[from] HubError),

    /// Redelivery failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError<ReceiverError>),

    /// Nothing has been delivered yet.
    #[error("no delivered message to redeliver")]
    NothingDelivered,
}

impl DevnetError {
    /// Failure class of the underlying error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Sender(e) => e.kind(),
            Self::Receiver(e) => e.kind(),
            Self::Hub(e) => e.kind(),
            Self::Delivery(DeliveryError::Bus(e)) => e.kind(),
            Self::Delivery(DeliveryError::Recipient(e)) => e.kind(),
            Self::NothingDelivered => ErrorKind::Precondition,
        }
    }
}

/// Point-in-time view of both ledgers.
#[derive(Clone, Debug, Serialize)]
pub struct DevnetSummary {
    /// Source domain.
    pub source_domain: DomainId,
    /// Destination domain.
    pub destination_domain: DomainId,
    /// Sender relay-fee balance.
    pub sender_balance: U256,
    /// Whether the sender holds a verification.
    pub verification_successful: bool,
    /// Messages waiting in the source outbox.
    pub pending_messages: usize,
    /// Messages the relayer has delivered.
    pub delivered_messages: usize,
    /// Receiver's accepted-delivery counter.
    pub verification_count: u64,
    /// Whether the receiver enforces sender trust.
    pub trust_enforced: bool,
}

/// Source and destination ledgers with all contracts deployed.
pub struct Devnet {
    config: RelayConfig,
    source_mailbox: Arc<InMemoryMailbox>,
    destination_mailbox: Arc<InMemoryMailbox>,
    hub: StaticVerificationHub,
    sender: VerificationSender,
    receiver: VerificationReceiver,
    relayer: Relayer,
}

impl Devnet {
    /// Deploy everything described by `config`.
    pub fn from_config(config: RelayConfig) -> Result<Self, DevnetError> {
        let source_mailbox = Arc::new(
            InMemoryMailbox::new(config.source.mailbox, config.source.domain)
                .with_fee_quote(U256::from(config.source.fee_quote)),
        );
        let mut destination_mailbox =
            InMemoryMailbox::new(config.destination.mailbox, config.destination.domain);
        if !config.destination.replay_protection {
            destination_mailbox = destination_mailbox.without_replay_protection();
        }
        let destination_mailbox = Arc::new(destination_mailbox);

        let hub = StaticVerificationHub::new(config.source.verification_authority);
        let sender = VerificationSender::new(config.sender_config(), source_mailbox.clone())?;
        let receiver =
            VerificationReceiver::new(config.receiver_config(), destination_mailbox.clone())?;

        info!(
            source = config.source.domain,
            destination = config.destination.domain,
            "Devnet ready"
        );

        Ok(Self {
            config,
            source_mailbox,
            destination_mailbox,
            hub,
            sender,
            receiver,
            relayer: Relayer::new(),
        })
    }

    // =========================================================================
    // Source ledger
    // =========================================================================

    /// Transfer `amount` to the sender from the source owner.
    pub fn fund(&mut self, amount: U256) {
        let ctx = self.source_call(self.config.source.owner).with_value(amount);
        self.sender.receive_funds(&ctx);
    }

    /// Run a disclosure for `user_identifier` through the hub.
    pub async fn verify(
        &mut self,
        user_identifier: Bytes32,
        user_data: Vec<u8>,
    ) -> Result<AutoRelayOutcome, DevnetError> {
        let now = self.source_mailbox.now();
        let outcome = self
            .hub
            .verify(
                &mut self.sender,
                DisclosureOutput::for_identifier(user_identifier),
                user_data,
                now,
            )
            .await?;
        Ok(outcome)
    }

    /// Manual relay paying `fee`, to `recipient` or the default recipient.
    pub async fn relay(
        &mut self,
        fee: U256,
        recipient: Option<Address>,
    ) -> Result<DispatchReceipt, DevnetError> {
        let ctx = self.source_call(self.config.source.owner).with_value(fee);
        let receipt = match recipient {
            Some(recipient) => self.sender.relay_verification(&ctx, recipient).await?,
            None => self.sender.relay_to_default_recipient(&ctx).await?,
        };
        Ok(receipt)
    }

    /// Point automatic and default relays at `recipient`, as the sender owner.
    pub fn set_default_recipient(&mut self, recipient: Address) -> Result<(), DevnetError> {
        let ctx = self.source_call(self.config.source.owner);
        self.sender.set_default_recipient(&ctx, recipient)?;
        Ok(())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Deliver everything pending for the receiver.
    pub async fn deliver(&mut self) -> RelayReport {
        self.relayer
            .relay(
                &self.source_mailbox,
                &self.destination_mailbox,
                &mut self.receiver,
            )
            .await
    }

    /// Deliver the most recently delivered message again.
    pub async fn redeliver_last(&mut self) -> Result<(), DevnetError> {
        let message = self
            .relayer
            .last_delivered()
            .ok_or(DevnetError::NothingDelivered)?;
        self.relayer
            .redeliver(&message, &self.destination_mailbox, &mut self.receiver)
            .await?;
        Ok(())
    }

    /// Deliver an arbitrary message, bypassing the source outbox.
    pub async fn inject(&mut self, message: &TransportMessage) -> Result<(), DevnetError> {
        self.destination_mailbox
            .process(message, &mut self.receiver)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Destination administration (as the registry owner)
    // =========================================================================

    /// Toggle sender trust enforcement.
    pub fn set_trust_enforcement(&mut self, enforced: bool) -> Result<(), DevnetError> {
        let ctx = self.destination_call(self.config.destination.owner);
        self.receiver.set_trust_enforcement(&ctx, enforced)?;
        Ok(())
    }

    /// Trust the devnet sender.
    pub fn trust_sender(&mut self) -> Result<(), DevnetError> {
        self.add_trusted_sender(self.sender_identity())
    }

    /// Trust `sender`.
    pub fn add_trusted_sender(&mut self, sender: Bytes32) -> Result<(), DevnetError> {
        let ctx = self.destination_call(self.config.destination.owner);
        self.receiver.add_trusted_sender(&ctx, sender)?;
        Ok(())
    }

    /// Stop trusting `sender`.
    pub fn remove_trusted_sender(&mut self, sender: Bytes32) -> Result<(), DevnetError> {
        let ctx = self.destination_call(self.config.destination.owner);
        self.receiver.remove_trusted_sender(&ctx, sender)?;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Record stored for `subject`.
    pub fn record(&self, subject: Address) -> VerificationRecord {
        self.receiver.verification_record(subject)
    }

    /// Transport identity of the sender contract.
    pub fn sender_identity(&self) -> Bytes32 {
        Bytes32::from_address(self.sender.address())
    }

    /// Snapshot of both ledgers.
    pub fn summary(&self) -> DevnetSummary {
        DevnetSummary {
            source_domain: self.source_mailbox.local_domain(),
            destination_domain: self.destination_mailbox.local_domain(),
            sender_balance: self.sender.balance(),
            verification_successful: self.sender.verification_successful(),
            pending_messages: self.source_mailbox.pending_count(),
            delivered_messages: self.relayer.history().len(),
            verification_count: self.receiver.verification_count(),
            trust_enforced: self.receiver.trust_enforced(),
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The sender.
    pub fn sender(&self) -> &VerificationSender {
        &self.sender
    }

    /// The receiver.
    pub fn receiver(&self) -> &VerificationReceiver {
        &self.receiver
    }

    /// The verification hub.
    pub fn hub(&self) -> &StaticVerificationHub {
        &self.hub
    }

    /// Source endpoint.
    pub fn source_mailbox(&self) -> &InMemoryMailbox {
        &self.source_mailbox
    }

    /// Destination endpoint.
    pub fn destination_mailbox(&self) -> &InMemoryMailbox {
        &self.destination_mailbox
    }

    /// Relay history.
    pub fn relayer(&self) -> &Relayer {
        &self.relayer
    }

    fn source_call(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.source_mailbox.now())
    }

    fn destination_call(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.destination_mailbox.now())
    }
}
