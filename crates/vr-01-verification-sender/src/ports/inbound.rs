//! # Inbound Ports
//!
//! The callback surface the verification authority drives.

use crate::domain::{AutoRelayOutcome, DisclosureOutput, SenderError};
use async_trait::async_trait;
use shared_types::CallContext;

/// Invoked by the verification authority after a proof checks out.
#[async_trait]
pub trait VerificationCallback: Send {
    /// Record a successful verification and attempt the automatic relay.
    async fn on_verification_success(
        &mut self,
        ctx: &CallContext,
        output: DisclosureOutput,
        user_data: Vec<u8>,
    ) -> Result<AutoRelayOutcome, SenderError>;
}
