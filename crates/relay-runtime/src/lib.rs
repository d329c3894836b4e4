//! # Relay Runtime
//!
//! Configuration, logging and wiring for the verification relay.
//!
//! ## Modules
//!
//! - `config` - TOML configuration with environment overrides
//! - `telemetry` - `tracing` subscriber setup
//! - `devnet` - both ledgers in memory, joined by a relayer
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file, then environment)
//! 2. Initialize logging
//! 3. Deploy mailboxes, sender, hub and receiver
//! 4. Drive operations (verify, fund, relay, deliver)

pub mod config;
pub mod devnet;
pub mod telemetry;

pub use config::{DestinationConfig, LoggingConfig, RelayConfig, RelayConfigError, SourceConfig};
pub use devnet::{Devnet, DevnetError, DevnetSummary};
pub use telemetry::{init_tracing, TelemetryError};
