//! # Relay Configuration
//!
//! One TOML file describes both ledgers. Every field has a default, so an
//! empty file (or no file) yields a working local devnet.
//!
//! ```toml
//! [source]
//! domain = 42220
//! fee_quote = 0
//! relay_failure_policy = "atomic"
//!
//! [destination]
//! domain = 8453
//! enforce_trusted_senders = false
//! trusted_senders = []
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
//!
//! ## Environment overrides
//!
//! - `RELAY_SOURCE_DOMAIN`
//! - `RELAY_DESTINATION_DOMAIN`
//! - `RELAY_ENFORCE_TRUST`
//! - `RELAY_LOG_LEVEL` (falls back to `RUST_LOG`)
//! - `RELAY_JSON_LOGS`

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes32, DomainId};
use std::fs;
use std::path::Path;
use thiserror::Error;
use vr_01_verification_sender::{RelayFailurePolicy, SenderConfig};
use vr_02_verification_receiver::ReceiverConfig;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum RelayConfigError {
    /// File could not be read.
    #[error("failed to read config {path}: {error}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error text.
        error: String,
    },

    /// File is not valid TOML for [`RelayConfig`].
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// An environment override did not parse.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Source ledger: endpoint, sender and verification authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source domain id.
    pub domain: DomainId,
    /// Transport endpoint address.
    pub mailbox: Address,
    /// Sender contract address.
    pub sender: Address,
    /// Sender owner.
    pub owner: Address,
    /// Verification authority (hub) address.
    pub verification_authority: Address,
    /// Default recipient; the destination receiver when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_recipient: Option<Address>,
    /// Per-message transport fee.
    pub fee_quote: u64,
    /// Auto-relay failure handling.
    pub relay_failure_policy: RelayFailurePolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            domain: 42220,
            mailbox: Address::repeat_byte(0x01),
            sender: Address::repeat_byte(0x5e),
            owner: Address::repeat_byte(0x0e),
            verification_authority: Address::repeat_byte(0xa0),
            default_recipient: None,
            fee_quote: 0,
            relay_failure_policy: RelayFailurePolicy::Atomic,
        }
    }
}

/// Destination ledger: endpoint and receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    /// Destination domain id.
    pub domain: DomainId,
    /// Transport endpoint address.
    pub mailbox: Address,
    /// Receiver contract address.
    pub receiver: Address,
    /// Trust registry owner.
    pub owner: Address,
    /// Start with sender trust enforcement on.
    pub enforce_trusted_senders: bool,
    /// Sender identities trusted at deployment.
    pub trusted_senders: Vec<Bytes32>,
    /// Refuse already-delivered message ids.
    pub replay_protection: bool,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            domain: 8453,
            mailbox: Address::repeat_byte(0x02),
            receiver: Address::repeat_byte(0xd0),
            owner: Address::repeat_byte(0x0e),
            enforce_trusted_senders: false,
            trusted_senders: Vec::new(),
            replay_protection: true,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete runtime configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Source ledger.
    pub source: SourceConfig,
    /// Destination ledger.
    pub destination: DestinationConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Load from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RelayConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| RelayConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> Result<Self, RelayConfigError> {
        toml::from_str(content).map_err(|e| RelayConfigError::Parse(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, RelayConfigError> {
        toml::to_string_pretty(self).map_err(|e| RelayConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), RelayConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup` (variable name to value).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), RelayConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RELAY_SOURCE_DOMAIN") {
            self.source.domain = parse_domain("RELAY_SOURCE_DOMAIN", v)?;
        }
        if let Some(v) = lookup("RELAY_DESTINATION_DOMAIN") {
            self.destination.domain = parse_domain("RELAY_DESTINATION_DOMAIN", v)?;
        }
        if let Some(v) = lookup("RELAY_ENFORCE_TRUST") {
            self.destination.enforce_trusted_senders = parse_flag("RELAY_ENFORCE_TRUST", v)?;
        }
        if let Some(v) = lookup("RELAY_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            self.logging.level = v;
        }
        if let Some(v) = lookup("RELAY_JSON_LOGS") {
            self.logging.json = parse_flag("RELAY_JSON_LOGS", v)?;
        }
        Ok(())
    }

    /// Recipient automatic and default relays go to.
    pub fn default_recipient(&self) -> Address {
        self.source
            .default_recipient
            .unwrap_or(self.destination.receiver)
    }

    /// Sender configuration derived from both ledger sections.
    pub fn sender_config(&self) -> SenderConfig {
        SenderConfig {
            address: self.source.sender,
            owner: self.source.owner,
            verification_authority: self.source.verification_authority,
            destination_domain: self.destination.domain,
            default_recipient: self.default_recipient(),
            relay_failure_policy: self.source.relay_failure_policy,
        }
    }

    /// Receiver configuration derived from both ledger sections.
    pub fn receiver_config(&self) -> ReceiverConfig {
        ReceiverConfig {
            address: self.destination.receiver,
            source_domain: self.source.domain,
            owner: self.destination.owner,
            enforce_trusted_senders: self.destination.enforce_trusted_senders,
            trusted_senders: self.destination.trusted_senders.clone(),
        }
    }
}

fn parse_domain(var: &'static str, value: String) -> Result<DomainId, RelayConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| RelayConfigError::InvalidEnv { var, value })
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, RelayConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RelayConfigError::InvalidEnv { var, value }),
    }
}
