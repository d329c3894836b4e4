//! # relay-node
//!
//! Operator CLI for the local verification relay devnet.
//!
//! ```text
//! relay-node [--config relay.toml] simulate --identifier 0x11.. --data hello --fund 1 --relay-fee 1
//! relay-node [--config relay.toml] show-config
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relay_runtime::{init_tracing, Devnet, RelayConfig};
use serde::Serialize;
use shared_bus::RelayReport;
use shared_types::{Address, Bytes32, U256};
use tracing::info;
use vr_01_verification_sender::AutoRelayOutcome;
use vr_02_verification_receiver::VerificationRecord;

/// Verification relay operator tool.
#[derive(Parser, Debug)]
#[command(name = "relay-node")]
#[command(about = "Run the verification relay on a local two-ledger devnet")]
#[command(version)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify, optionally fund and relay, then deliver and print the record.
    Simulate {
        /// 32-byte user identifier (hex).
        #[arg(long, default_value = "0x1111111111111111111111111111111111111111111111111111111111111111")]
        identifier: Bytes32,

        /// Auxiliary data attached to the verification.
        #[arg(long, default_value = "hello")]
        data: String,

        /// Fund the sender with this amount before verifying (triggers the
        /// automatic relay).
        #[arg(long, default_value_t = 0)]
        prefund: u64,

        /// Fund the sender with this amount after verifying.
        #[arg(long, default_value_t = 0)]
        fund: u64,

        /// Manually relay paying this fee (0 skips the manual relay).
        #[arg(long, default_value_t = 0)]
        relay_fee: u64,

        /// Manual relay recipient; the default recipient when omitted.
        #[arg(long)]
        recipient: Option<Address>,

        /// Enable trust enforcement and trust the devnet sender first.
        #[arg(long)]
        enforce_trust: bool,
    },

    /// Print the effective configuration as TOML.
    ShowConfig,
}

#[derive(Serialize)]
struct SimulationOutput {
    auto_relay: AutoRelayOutcome,
    manual_relay: Option<shared_bus::DispatchReceipt>,
    delivery: RelayReport,
    record: VerificationRecord,
    summary: relay_runtime::DevnetSummary,
}

fn load_config(path: Option<&PathBuf>) -> Result<RelayConfig> {
    let mut config = match path {
        Some(path) => RelayConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RelayConfig::default(),
    };
    config
        .apply_env()
        .context("Failed to apply environment overrides")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::ShowConfig => {
            print!("{}", config.to_toml().context("Failed to render config")?);
        }
        Command::Simulate {
            identifier,
            data,
            prefund,
            fund,
            relay_fee,
            recipient,
            enforce_trust,
        } => {
            init_tracing(&config.logging).context("Failed to initialize logging")?;
            let mut devnet = Devnet::from_config(config).context("Failed to deploy devnet")?;

            if enforce_trust {
                devnet.set_trust_enforcement(true)?;
                devnet.trust_sender()?;
            }
            if prefund > 0 {
                devnet.fund(U256::from(prefund));
            }

            let auto_relay = devnet
                .verify(identifier, data.into_bytes())
                .await
                .context("Verification failed")?;

            if fund > 0 {
                devnet.fund(U256::from(fund));
            }
            let manual_relay = if relay_fee > 0 {
                Some(
                    devnet
                        .relay(U256::from(relay_fee), recipient)
                        .await
                        .context("Manual relay failed")?,
                )
            } else {
                None
            };

            let delivery = devnet.deliver().await;
            let subject = devnet
                .sender()
                .last_verification()
                .map(|l| l.subject_address)
                .unwrap_or(Address::ZERO);
            info!(
                delivered = delivery.delivered.len(),
                subject = %subject,
                "Simulation finished"
            );

            let output = SimulationOutput {
                auto_relay,
                manual_relay,
                delivery,
                record: devnet.record(subject),
                summary: devnet.summary(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to render output")?
            );
        }
    }

    Ok(())
}
