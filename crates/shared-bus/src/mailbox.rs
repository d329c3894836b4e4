//! # Mailbox
//!
//! The transport endpoint deployed on each ledger. Senders dispatch through
//! their local mailbox; the destination mailbox is the only caller a
//! recipient accepts messages from.

use crate::message::{DispatchReceipt, DispatchRequest, TransportMessage, MESSAGE_VERSION};
use crate::recipient::MessageRecipient;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{Address, Bytes32, CallContext, DomainId, ErrorKind, MessageId, U256};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// Attached fee is below the quote.
    #[error("insufficient fee: required {required}, provided {provided}")]
    InsufficientFee {
        /// Quoted fee.
        required: U256,
        /// Fee attached to the dispatch.
        provided: U256,
    },

    /// Endpoint is not accepting dispatches.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// Message addressed to another domain.
    #[error("wrong destination: message for {got}, endpoint is {expected}")]
    WrongDestination {
        /// Destination in the message.
        got: DomainId,
        /// Local domain of this endpoint.
        expected: DomainId,
    },

    /// Message recipient does not match the contract it is delivered to.
    #[error("recipient mismatch: message for {expected:?}, delivered to {got:?}")]
    RecipientMismatch {
        /// Recipient in the message.
        expected: Bytes32,
        /// Contract handed to the endpoint.
        got: Bytes32,
    },

    /// Message id already processed.
    #[error("message already delivered: {0:?}")]
    AlreadyDelivered(MessageId),
}

impl BusError {
    /// Always [`ErrorKind::Transport`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Transport
    }
}

/// Delivery failure: either the bus refused, or the recipient rejected.
#[derive(Debug, Error)]
pub enum DeliveryError<E: std::error::Error + 'static> {
    /// Endpoint-level failure.
    #[error("transport: {0}")]
    Bus(#[from] BusError),

    /// Recipient rejected the message; the message stays undelivered.
    #[error("recipient rejected message: {0}")]
    Recipient(#[source] E),
}

/// Outbound port: what a sender needs from its local endpoint.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Address of this endpoint.
    fn address(&self) -> Address;

    /// Domain of the ledger this endpoint is deployed on.
    fn local_domain(&self) -> DomainId;

    /// Fee the endpoint requires for a dispatch.
    async fn quote_dispatch(
        &self,
        destination: DomainId,
        recipient: Bytes32,
        body: &[u8],
    ) -> Result<U256, BusError>;

    /// Enqueue a message as `ctx.caller`, paying `ctx.value`.
    ///
    /// The message sender is always the caller; it cannot be chosen.
    async fn dispatch(
        &self,
        ctx: &CallContext,
        request: DispatchRequest,
    ) -> Result<DispatchReceipt, BusError>;

    /// Whether a message has been processed by this endpoint.
    async fn delivered(&self, message_id: MessageId) -> Result<bool, BusError>;
}

/// In-memory endpoint for one ledger.
///
/// Holds the outbox of everything dispatched on this ledger and the set of
/// message ids delivered to it. The clock is the ledger clock recipients see.
pub struct InMemoryMailbox {
    address: Address,
    local_domain: DomainId,
    fee_quote: RwLock<U256>,
    current_time: RwLock<u64>,
    nonce: AtomicU32,
    outbox: Mutex<VecDeque<TransportMessage>>,
    delivered: RwLock<HashSet<MessageId>>,
    fees_collected: RwLock<U256>,
    halted: AtomicBool,
    replay_protection: bool,
}

impl InMemoryMailbox {
    /// Create an endpoint with a zero fee quote and replay protection on.
    pub fn new(address: Address, local_domain: DomainId) -> Self {
        Self {
            address,
            local_domain,
            fee_quote: RwLock::new(U256::zero()),
            current_time: RwLock::new(1_700_000_000),
            nonce: AtomicU32::new(0),
            outbox: Mutex::new(VecDeque::new()),
            delivered: RwLock::new(HashSet::new()),
            fees_collected: RwLock::new(U256::zero()),
            halted: AtomicBool::new(false),
            replay_protection: true,
        }
    }

    /// Set the per-message fee quote.
    #[must_use]
    pub fn with_fee_quote(self, quote: U256) -> Self {
        *self.fee_quote.write() = quote;
        self
    }

    /// Allow already-delivered ids to be processed again (at-least-once mode).
    #[must_use]
    pub fn without_replay_protection(mut self) -> Self {
        self.replay_protection = false;
        self
    }

    /// Change the fee quote.
    pub fn set_fee_quote(&self, quote: U256) {
        *self.fee_quote.write() = quote;
    }

    /// Current ledger time.
    pub fn now(&self) -> u64 {
        *self.current_time.read()
    }

    /// Set ledger time.
    pub fn set_time(&self, time: u64) {
        *self.current_time.write() = time;
    }

    /// Advance ledger time.
    pub fn advance_time(&self, secs: u64) {
        *self.current_time.write() += secs;
    }

    /// Stop accepting dispatches (congestion, outage).
    pub fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }

    /// Resume accepting dispatches.
    pub fn resume(&self) {
        self.halted.store(false, Ordering::SeqCst);
    }

    /// Total fees retained.
    pub fn fees_collected(&self) -> U256 {
        *self.fees_collected.read()
    }

    /// Number of messages dispatched on this endpoint so far.
    pub fn dispatched_count(&self) -> u32 {
        self.nonce.load(Ordering::SeqCst)
    }

    /// Number of messages waiting to be relayed.
    pub fn pending_count(&self) -> usize {
        self.outbox.lock().len()
    }

    /// Snapshot of the outbox in dispatch order.
    pub fn pending(&self) -> Vec<TransportMessage> {
        self.outbox.lock().iter().cloned().collect()
    }

    /// Remove and return every pending message on one channel, in order.
    pub(crate) fn take_channel(
        &self,
        destination: DomainId,
        recipient: Bytes32,
    ) -> Vec<TransportMessage> {
        let mut outbox = self.outbox.lock();
        let (taken, kept): (VecDeque<_>, VecDeque<_>) = outbox
            .drain(..)
            .partition(|m| m.is_for(destination, recipient));
        *outbox = kept;
        taken.into_iter().collect()
    }

    /// Put undelivered messages back at the head of the outbox, order preserved.
    pub(crate) fn restore(&self, messages: Vec<TransportMessage>) {
        let mut outbox = self.outbox.lock();
        for message in messages.into_iter().rev() {
            outbox.push_front(message);
        }
    }

    /// Deliver a message to `recipient` on this (destination) endpoint.
    ///
    /// The id is recorded as delivered only if the recipient accepts it.
    pub async fn process<R: MessageRecipient>(
        &self,
        message: &TransportMessage,
        recipient: &mut R,
    ) -> Result<(), DeliveryError<R::Error>> {
        if message.destination != self.local_domain {
            return Err(BusError::WrongDestination {
                got: message.destination,
                expected: self.local_domain,
            }
            .into());
        }

        let target = Bytes32::from_address(recipient.address());
        if message.recipient != target {
            return Err(BusError::RecipientMismatch {
                expected: message.recipient,
                got: target,
            }
            .into());
        }

        let id = message.id();
        if self.replay_protection && self.delivered.read().contains(&id) {
            return Err(BusError::AlreadyDelivered(id).into());
        }

        let ctx = CallContext::new(self.address, self.now());
        recipient
            .handle(&ctx, message.origin, message.sender, &message.body)
            .await
            .map_err(DeliveryError::Recipient)?;

        self.delivered.write().insert(id);
        debug!(message_id = %id, origin = message.origin, "Message processed");
        Ok(())
    }
}

#[async_trait]
impl Mailbox for InMemoryMailbox {
    fn address(&self) -> Address {
        self.address
    }

    fn local_domain(&self) -> DomainId {
        self.local_domain
    }

    async fn quote_dispatch(
        &self,
        _destination: DomainId,
        _recipient: Bytes32,
        _body: &[u8],
    ) -> Result<U256, BusError> {
        Ok(*self.fee_quote.read())
    }

    async fn dispatch(
        &self,
        ctx: &CallContext,
        request: DispatchRequest,
    ) -> Result<DispatchReceipt, BusError> {
        let fee = ctx.value;
        if self.halted.load(Ordering::SeqCst) {
            warn!(domain = self.local_domain, "Dispatch refused: endpoint halted");
            return Err(BusError::Unavailable(format!(
                "endpoint on domain {} is halted",
                self.local_domain
            )));
        }

        let required = *self.fee_quote.read();
        if fee < required {
            warn!(%required, provided = %fee, "Dispatch refused: fee below quote");
            return Err(BusError::InsufficientFee {
                required,
                provided: fee,
            });
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let message = TransportMessage {
            version: MESSAGE_VERSION,
            nonce,
            origin: self.local_domain,
            sender: Bytes32::from_address(ctx.caller),
            destination: request.destination,
            recipient: request.recipient,
            body: request.body,
        };
        let message_id = message.id();

        *self.fees_collected.write() += required;
        self.outbox.lock().push_back(message);

        info!(
            message_id = %message_id,
            nonce,
            sender = %ctx.caller,
            destination = request.destination,
            fee = %required,
            "Message dispatched"
        );

        Ok(DispatchReceipt {
            message_id,
            nonce,
            fee_charged: required,
            refund: fee - required,
        })
    }

    async fn delivered(&self, message_id: MessageId) -> Result<bool, BusError> {
        Ok(self.delivered.read().contains(&message_id))
    }
}
