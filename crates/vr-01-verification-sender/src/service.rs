//! # Verification Sender Service
//!
//! Source-ledger half of the relay. Holds the latest verification in a single
//! slot, pays for relays out of its own balance, and dispatches encoded
//! verifications through the local transport endpoint.
//!
//! ## Atomicity
//!
//! Every operation either commits all of its effects (slot, balance, events)
//! or none of them. The only exception is an automatic relay failure under
//! [`RelayFailurePolicy::Decoupled`], where the stored verification survives
//! and the failure is reported as [`AutoRelayOutcome::Failed`].

use crate::domain::{
    derive_subject_address, invariant_fee_attached, invariant_nonzero_recipient,
    AutoRelayOutcome, DisclosureOutput, LastVerification, RelayFailurePolicy, SenderConfig,
    SenderError, SenderPhase, SenderVerificationState,
};
use crate::events::SenderEvent;
use crate::ports::inbound::VerificationCallback;
use crate::ports::outbound::{DispatchReceipt, DispatchRequest, Mailbox};

use async_trait::async_trait;
use shared_types::{encode_verification, Address, Bytes32, CallContext, ConfigError, DomainId, U256};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The verification sender deployed on the source ledger.
pub struct VerificationSender {
    config: SenderConfig,
    mailbox: Arc<dyn Mailbox>,
    state: SenderVerificationState,
    balance: U256,
    events: Vec<SenderEvent>,
}

impl VerificationSender {
    /// Deploy a sender bound to `mailbox`.
    ///
    /// Fails on any null address in the configuration or a null endpoint.
    pub fn new(config: SenderConfig, mailbox: Arc<dyn Mailbox>) -> Result<Self, SenderError> {
        config.validate()?;
        if mailbox.address().is_zero() {
            return Err(ConfigError::ZeroTransportEndpoint.into());
        }

        info!(
            address = %config.address,
            destination = config.destination_domain,
            default_recipient = %config.default_recipient,
            policy = ?config.relay_failure_policy,
            "Verification sender deployed"
        );

        Ok(Self {
            config,
            mailbox,
            state: SenderVerificationState::default(),
            balance: U256::zero(),
            events: Vec::new(),
        })
    }

    // =========================================================================
    // Funding
    // =========================================================================

    /// Accept a plain transfer. Only the balance changes.
    pub fn receive_funds(&mut self, ctx: &CallContext) {
        self.balance = self.balance.saturating_add(ctx.value);
        debug!(from = %ctx.caller, amount = %ctx.value, balance = %self.balance, "Funds received");
    }

    // =========================================================================
    // Relays
    // =========================================================================

    /// Dispatch the stored verification to `recipient`, paying `ctx.value`.
    ///
    /// The attached payment is forwarded in full as the transport fee; any
    /// refund stays in the sender's balance.
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller, fee = %ctx.value))]
    pub async fn relay_verification(
        &mut self,
        ctx: &CallContext,
        recipient: Address,
    ) -> Result<DispatchReceipt, SenderError> {
        let last = match self.state.last() {
            Some(last) => last.clone(),
            None => {
                warn!("Relay rejected: no verification stored");
                return Err(SenderError::NoVerificationToSend);
            }
        };
        if let Err(e) = invariant_fee_attached(ctx.value) {
            warn!("Relay rejected: no fee attached");
            return Err(e);
        }
        if let Err(e) = invariant_nonzero_recipient(recipient) {
            warn!("Relay rejected: zero recipient");
            return Err(e);
        }

        let receipt = self.dispatch(&last, recipient, ctx.value, ctx.timestamp).await?;
        // Payment arrived with the call and left as the fee; only the refund stays.
        self.balance = self.balance.saturating_add(receipt.refund);
        Ok(receipt)
    }

    /// [`Self::relay_verification`] to the configured default recipient.
    pub async fn relay_to_default_recipient(
        &mut self,
        ctx: &CallContext,
    ) -> Result<DispatchReceipt, SenderError> {
        let recipient = self.config.default_recipient;
        self.relay_verification(ctx, recipient).await
    }

    /// Fee the transport currently asks for relaying the stored verification
    /// to `recipient`.
    pub async fn quote_relay(&self, recipient: Address) -> Result<U256, SenderError> {
        let last = self.state.last().ok_or(SenderError::NoVerificationToSend)?;
        invariant_nonzero_recipient(recipient)?;
        let body = encode_verification(&last.to_message());
        let quote = self
            .mailbox
            .quote_dispatch(
                self.config.destination_domain,
                Bytes32::from_address(recipient),
                &body,
            )
            .await?;
        Ok(quote)
    }

    async fn dispatch(
        &mut self,
        last: &LastVerification,
        recipient: Address,
        fee: U256,
        timestamp: u64,
    ) -> Result<DispatchReceipt, SenderError> {
        // The endpoint stamps its caller as the message sender.
        let call = CallContext::new(self.config.address, timestamp).with_value(fee);
        let request = DispatchRequest {
            destination: self.config.destination_domain,
            recipient: Bytes32::from_address(recipient),
            body: encode_verification(&last.to_message()),
        };

        let receipt = self.mailbox.dispatch(&call, request).await.map_err(|e| {
            warn!(error = %e, "Dispatch failed");
            SenderError::from(e)
        })?;

        self.state.mark_relayed();
        self.events.push(SenderEvent::VerificationRelayed {
            message_id: receipt.message_id,
            destination: self.config.destination_domain,
            recipient,
            subject_address: last.subject_address,
            fee,
        });

        info!(
            message_id = %receipt.message_id,
            recipient = %recipient,
            subject = %last.subject_address,
            fee = %fee,
            refund = %receipt.refund,
            "Verification relayed"
        );
        Ok(receipt)
    }

    async fn auto_relay(
        &mut self,
        last: &LastVerification,
        timestamp: u64,
    ) -> Result<AutoRelayOutcome, SenderError> {
        if self.balance.is_zero() {
            debug!("Balance is zero, automatic relay skipped");
            return Ok(AutoRelayOutcome::Skipped);
        }

        let fee = self.balance;
        let recipient = self.config.default_recipient;
        let receipt = self.dispatch(last, recipient, fee, timestamp).await?;
        self.balance = receipt.refund;

        Ok(AutoRelayOutcome::Dispatched {
            message_id: receipt.message_id,
            fee,
            refund: receipt.refund,
        })
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Change the default recipient. Owner only.
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller))]
    pub fn set_default_recipient(
        &mut self,
        ctx: &CallContext,
        recipient: Address,
    ) -> Result<(), SenderError> {
        self.require_owner(ctx)?;
        invariant_nonzero_recipient(recipient)?;

        let previous = self.config.default_recipient;
        self.config.default_recipient = recipient;
        self.events.push(SenderEvent::DefaultRecipientUpdated {
            previous,
            current: recipient,
        });
        info!(%previous, current = %recipient, "Default recipient updated");
        Ok(())
    }

    /// Hand ownership to `new_owner`. Owner only.
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller))]
    pub fn transfer_ownership(
        &mut self,
        ctx: &CallContext,
        new_owner: Address,
    ) -> Result<(), SenderError> {
        self.require_owner(ctx)?;
        if new_owner.is_zero() {
            return Err(ConfigError::ZeroOwner.into());
        }

        let previous = self.config.owner;
        self.config.owner = new_owner;
        self.events.push(SenderEvent::OwnershipTransferred {
            previous,
            current: new_owner,
        });
        info!(%previous, current = %new_owner, "Sender ownership transferred");
        Ok(())
    }

    fn require_owner(&self, ctx: &CallContext) -> Result<(), SenderError> {
        if ctx.caller != self.config.owner {
            warn!(caller = %ctx.caller, "Rejected: caller is not the owner");
            return Err(SenderError::NotOwner { caller: ctx.caller });
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// True once any verification has been stored.
    pub fn verification_successful(&self) -> bool {
        self.state.is_successful()
    }

    /// The stored verification.
    pub fn last_verification(&self) -> Option<&LastVerification> {
        self.state.last()
    }

    /// Lifecycle phase of the verification slot.
    pub fn phase(&self) -> SenderPhase {
        self.state.phase()
    }

    /// Current default recipient.
    pub fn default_recipient(&self) -> Address {
        self.config.default_recipient
    }

    /// Domain relays are sent to.
    pub fn destination_domain(&self) -> DomainId {
        self.config.destination_domain
    }

    /// Domain of the local transport endpoint.
    pub fn local_domain(&self) -> DomainId {
        self.mailbox.local_domain()
    }

    /// Relay-fee balance.
    pub fn balance(&self) -> U256 {
        self.balance
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.config.owner
    }

    /// Deployment address.
    pub fn address(&self) -> Address {
        self.config.address
    }

    /// Auto-relay failure policy in force.
    pub fn relay_failure_policy(&self) -> RelayFailurePolicy {
        self.config.relay_failure_policy
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> &[SenderEvent] {
        &self.events
    }
}

#[async_trait]
impl VerificationCallback for VerificationSender {
    #[instrument(
        skip(self, ctx, output, user_data),
        fields(caller = %ctx.caller, identifier = %output.user_identifier)
    )]
    async fn on_verification_success(
        &mut self,
        ctx: &CallContext,
        output: DisclosureOutput,
        user_data: Vec<u8>,
    ) -> Result<AutoRelayOutcome, SenderError> {
        if ctx.caller != self.config.verification_authority {
            warn!(caller = %ctx.caller, "Rejected: caller is not the verification authority");
            return Err(SenderError::NotVerificationAuthority { caller: ctx.caller });
        }
        let subject = derive_subject_address(output.user_identifier).map_err(|e| {
            warn!("Rejected: identifier derives the zero address");
            e
        })?;

        let snapshot = self.state.clone();
        let events_len = self.events.len();

        let verified_at = U256::from(ctx.timestamp);
        self.state
            .store(output.user_identifier, subject, user_data.clone(), verified_at);
        self.events.push(SenderEvent::VerificationCompleted {
            user_identifier: output.user_identifier,
            subject_address: subject,
            verified_at,
            auxiliary_data: user_data.clone(),
        });
        info!(subject = %subject, verified_at = ctx.timestamp, "Verification stored");

        let last = LastVerification {
            user_identifier: output.user_identifier,
            subject_address: subject,
            auxiliary_data: user_data,
            verified_at,
            successful: true,
            relay_count: 0,
        };

        match self.auto_relay(&last, ctx.timestamp).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => match self.config.relay_failure_policy {
                RelayFailurePolicy::Atomic => {
                    self.state = snapshot;
                    self.events.truncate(events_len);
                    warn!(error = %e, "Automatic relay failed, verification reverted");
                    Err(e)
                }
                RelayFailurePolicy::Decoupled => {
                    warn!(error = %e, "Automatic relay failed, verification kept");
                    Ok(AutoRelayOutcome::Failed {
                        reason: e.to_string(),
                    })
                }
            },
        }
    }
}
