//! # CLI Interface
//!
//! Defines the command-line argument structure for `memo-send` using
//! `clap` derive, and layers flag/environment overrides on top of the
//! optional TOML config file.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use memo_protocol::config::{
    ClientConfig, MosaicConfig, ResolvedConfig, DEFAULT_MESSAGE, DEFAULT_NETWORK,
};

use crate::logging::LogFormat;

/// Send text memos as transfer transactions to a Symbol node.
///
/// Connection and key settings come from a TOML file (`--config`) and can be
/// overridden per flag or environment variable. The private key is never
/// compiled in and never printed.
#[derive(Parser, Debug)]
#[command(
    name = "memo-send",
    about = "Send text memos as Symbol transfer transactions",
    version,
    propagate_version = true
)]
pub struct MemoCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the client configuration file (TOML).
    #[arg(long, short = 'c', env = "MEMO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the node, e.g. `https://sym-test-01.opening-line.jp:3001`.
    #[arg(long, env = "MEMO_NODE_URL", global = true)]
    pub node_url: Option<String>,

    /// Hex-encoded Ed25519 private key of the sender.
    ///
    /// Prefer the environment variable or the config file over this flag;
    /// command lines end up in shell history.
    #[arg(long, env = "MEMO_PRIVATE_KEY", global = true, hide_env_values = true)]
    pub private_key: Option<String>,

    /// Recipient address.
    #[arg(long, env = "MEMO_RECIPIENT", global = true)]
    pub recipient: Option<String>,

    /// Network name: testnet or mainnet.
    #[arg(long, env = "MEMO_NETWORK", global = true)]
    pub network: Option<String>,

    /// Mosaic to attach, as `ID:AMOUNT` (hex id, atomic units). Repeat the
    /// flag or separate entries with commas. Replaces the config file list.
    #[arg(
        long = "mosaic",
        env = "MEMO_MOSAICS",
        value_delimiter = ',',
        value_parser = parse_mosaic,
        global = true
    )]
    pub mosaics: Vec<MosaicConfig>,

    /// Log output format on stderr.
    #[arg(long, value_enum, ignore_case = true, default_value_t, global = true)]
    pub log_format: LogFormat,

    /// More log detail; repeat for more. Ignored when `RUST_LOG` is set.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message and print the node's response.
    Send(SendArgs),
    /// Read messages from stdin, one per line, and send each.
    Interactive,
    /// Show the configured signer's public key and address.
    Keys,
    /// Generate a new key pair and write the private key to a file.
    Keygen(KeygenArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `send` subcommand.
#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Message text.
    #[arg(long, short = 'm', default_value = DEFAULT_MESSAGE)]
    pub message: String,

    /// Sign and print the payload without announcing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// File to write the hex private key to.
    #[arg(long, short = 'o')]
    pub out: PathBuf,

    /// Network the printed address is for.
    #[arg(long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Overwrite `out` if it already exists.
    #[arg(long)]
    pub force: bool,
}

impl GlobalArgs {
    /// Loads the config file (if any) and applies flag/env overrides.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ClientConfig::default(),
        };

        if let Some(node_url) = &self.node_url {
            config.node_url = node_url.clone();
        }
        if let Some(private_key) = &self.private_key {
            config.private_key = Some(private_key.clone());
        }
        if let Some(recipient) = &self.recipient {
            config.recipient = recipient.clone();
        }
        if let Some(network) = &self.network {
            config.network = network.clone();
        }
        if !self.mosaics.is_empty() {
            config.mosaics = self.mosaics.clone();
        }
        Ok(config)
    }

    /// [`client_config`](Self::client_config) followed by validation.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.client_config()?
            .resolve()
            .context("invalid client configuration")
    }
}

/// Parses `ID:AMOUNT`. The id itself is checked when the config resolves.
fn parse_mosaic(raw: &str) -> Result<MosaicConfig, String> {
    let (id, amount) = raw
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("expected ID:AMOUNT, got {raw:?}"))?;
    let amount = amount
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid amount {amount:?}: {e}"))?;
    Ok(MosaicConfig {
        id: id.trim().to_string(),
        amount,
    })
}
