//! # Verification Receiver Service
//!
//! Destination-ledger half of the relay. Accepts messages only from its
//! transport endpoint, only from the configured source domain and, when trust
//! enforcement is on, only from allow-listed senders. Accepted payloads are
//! decoded and upserted under the subject address.
//!
//! ## Check order in `handle`
//!
//! 1. caller is the transport endpoint (`NotTransportEndpoint`)
//! 2. origin is the source domain (`InvalidOrigin`)
//! 3. sender is trusted, if enforced (`UntrustedSender`)
//! 4. payload decodes (`Decode`)
//!
//! Nothing is written until all four pass.

use crate::domain::{ReceiverConfig, ReceiverError, TrustRegistry, VerificationRecord};
use crate::events::ReceiverEvent;
use crate::ports::inbound::VerificationQueries;
use crate::ports::outbound::Mailbox;

use async_trait::async_trait;
use shared_bus::MessageRecipient;
use shared_types::{decode_verification, Address, Bytes32, CallContext, ConfigError, DomainId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The verification receiver deployed on the destination ledger.
pub struct VerificationReceiver {
    config: ReceiverConfig,
    mailbox: Arc<dyn Mailbox>,
    trust: TrustRegistry,
    records: HashMap<Address, VerificationRecord>,
    identifier_index: HashMap<Bytes32, Address>,
    verification_count: u64,
    events: Vec<ReceiverEvent>,
}

impl VerificationReceiver {
    /// Deploy a receiver behind `mailbox`, its local transport endpoint.
    ///
    /// Fails on a null endpoint, owner or own address.
    pub fn new(config: ReceiverConfig, mailbox: Arc<dyn Mailbox>) -> Result<Self, ReceiverError> {
        config.validate()?;
        if mailbox.address().is_zero() {
            return Err(ConfigError::ZeroTransportEndpoint.into());
        }
        let trust = TrustRegistry::new(
            config.owner,
            config.enforce_trusted_senders,
            config.trusted_senders.iter().copied(),
        );

        info!(
            address = %config.address,
            mailbox = %mailbox.address(),
            local_domain = mailbox.local_domain(),
            source_domain = config.source_domain,
            enforce_trust = config.enforce_trusted_senders,
            "Verification receiver deployed"
        );

        Ok(Self {
            config,
            mailbox,
            trust,
            records: HashMap::new(),
            identifier_index: HashMap::new(),
            verification_count: 0,
            events: Vec::new(),
        })
    }

    // =========================================================================
    // Administration (registry owner only)
    // =========================================================================

    /// Turn sender trust enforcement on or off.
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller))]
    pub fn set_trust_enforcement(
        &mut self,
        ctx: &CallContext,
        enforced: bool,
    ) -> Result<(), ReceiverError> {
        self.trust
            .set_enforced(ctx.caller, enforced)
            .inspect_err(|_| warn!("Rejected: caller is not the owner"))?;
        self.events
            .push(ReceiverEvent::TrustEnforcementChanged { enforced });
        info!(enforced, "Trust enforcement changed");
        Ok(())
    }

    /// Add `sender` to the allow-list.
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller))]
    pub fn add_trusted_sender(
        &mut self,
        ctx: &CallContext,
        sender: Bytes32,
    ) -> Result<(), ReceiverError> {
        self.trust
            .add(ctx.caller, sender)
            .inspect_err(|_| warn!("Rejected: caller is not the owner"))?;
        self.events.push(ReceiverEvent::TrustedSenderAdded { sender });
        info!(%sender, "Trusted sender added");
        Ok(())
    }

    /// Remove `sender` from the allow-list. Records already stored stay.
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller))]
    pub fn remove_trusted_sender(
        &mut self,
        ctx: &CallContext,
        sender: Bytes32,
    ) -> Result<(), ReceiverError> {
        self.trust
            .remove(ctx.caller, sender)
            .inspect_err(|_| warn!("Rejected: caller is not the owner"))?;
        self.events.push(ReceiverEvent::TrustedSenderRemoved { sender });
        info!(%sender, "Trusted sender removed");
        Ok(())
    }

    /// Hand the registry to `new_owner`.
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller))]
    pub fn transfer_ownership(
        &mut self,
        ctx: &CallContext,
        new_owner: Address,
    ) -> Result<(), ReceiverError> {
        let previous = self.trust.owner();
        self.trust.transfer(ctx.caller, new_owner)?;
        self.events.push(ReceiverEvent::OwnershipTransferred {
            previous,
            current: new_owner,
        });
        info!(%previous, current = %new_owner, "Receiver ownership transferred");
        Ok(())
    }

    // =========================================================================
    // Queries beyond VerificationQueries
    // =========================================================================

    /// Whether sender trust is enforced.
    pub fn trust_enforced(&self) -> bool {
        self.trust.is_enforced()
    }

    /// Registry owner.
    pub fn owner(&self) -> Address {
        self.trust.owner()
    }

    /// Domain messages are accepted from.
    pub fn source_domain(&self) -> DomainId {
        self.config.source_domain
    }

    /// Transport endpoint `handle` accepts calls from.
    pub fn mailbox(&self) -> Address {
        self.mailbox.address()
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> &[ReceiverEvent] {
        &self.events
    }

    fn authenticate(
        &self,
        ctx: &CallContext,
        origin: DomainId,
        sender: &Bytes32,
    ) -> Result<(), ReceiverError> {
        if ctx.caller != self.mailbox.address() {
            warn!(caller = %ctx.caller, "Rejected: caller is not the transport endpoint");
            return Err(ReceiverError::NotTransportEndpoint { caller: ctx.caller });
        }
        if origin != self.config.source_domain {
            warn!(
                origin,
                expected = self.config.source_domain,
                "Rejected: invalid origin"
            );
            return Err(ReceiverError::InvalidOrigin {
                got: origin,
                expected: self.config.source_domain,
            });
        }
        if !self.trust.admits(sender) {
            warn!(%sender, "Rejected: untrusted sender");
            return Err(ReceiverError::UntrustedSender(*sender));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRecipient for VerificationReceiver {
    type Error = ReceiverError;

    fn address(&self) -> Address {
        self.config.address
    }

    #[instrument(
        skip(self, ctx, body),
        fields(caller = %ctx.caller, body_len = body.len())
    )]
    async fn handle(
        &mut self,
        ctx: &CallContext,
        origin: DomainId,
        sender: Bytes32,
        body: &[u8],
    ) -> Result<(), ReceiverError> {
        self.authenticate(ctx, origin, &sender)?;

        let message = decode_verification(body).map_err(|e| {
            warn!(error = %e, "Rejected: payload does not decode");
            ReceiverError::from(e)
        })?;

        let subject = message.subject_address;
        let user_identifier = message.user_identifier;
        if let Some(previous) = self.records.get(&subject) {
            debug!(
                subject = %subject,
                previous_received_at = previous.received_at,
                "Overwriting existing record"
            );
        }

        self.records
            .insert(subject, VerificationRecord::from_message(message, ctx.timestamp));
        self.identifier_index.insert(user_identifier, subject);
        self.verification_count += 1;
        self.events.push(ReceiverEvent::VerificationReceived {
            subject_address: subject,
            user_identifier,
            origin,
            sender,
            received_at: ctx.timestamp,
        });

        info!(
            subject = %subject,
            identifier = %user_identifier,
            count = self.verification_count,
            "Verification received"
        );
        Ok(())
    }
}

impl VerificationQueries for VerificationReceiver {
    fn is_verified(&self, subject: Address) -> bool {
        self.records.get(&subject).is_some_and(|r| r.is_verified)
    }

    fn verification_record(&self, subject: Address) -> VerificationRecord {
        self.records.get(&subject).cloned().unwrap_or_default()
    }

    fn address_by_user_identifier(&self, user_identifier: Bytes32) -> Address {
        self.identifier_index
            .get(&user_identifier)
            .copied()
            .unwrap_or(Address::ZERO)
    }

    fn is_trusted_sender(&self, sender: Bytes32) -> bool {
        self.trust.is_trusted(&sender)
    }

    fn local_domain(&self) -> DomainId {
        self.mailbox.local_domain()
    }

    fn verification_count(&self) -> u64 {
        self.verification_count
    }
}
