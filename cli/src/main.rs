// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # memo-send
//!
//! Entry point for the `memo-send` binary. Parses CLI arguments, initializes
//! logging, resolves the client configuration and runs one subcommand:
//!
//! - `send`        : announce one message and print the node's reply
//! - `interactive` : one submission per line of stdin
//! - `keys`        : show the configured signer's public key and address
//! - `keygen`      : create a key file with owner-only permissions
//! - `version`     : print build version information
//!
//! Results go to stdout, logs to stderr. Any failure exits with status 1.

mod cli;
mod logging;
mod shell;

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;

use memo_protocol::config::{NetworkParams, DEFAULT_NETWORK, FEE_MULTIPLIER};
use memo_protocol::crypto::KeyPair;
use memo_protocol::identity::Address;
use memo_protocol::submission::{render_outcome, Submitter};
use memo_protocol::transaction::{decode_plain_message, verify_signed_transaction};

use cli::{Commands, GlobalArgs, KeygenArgs, MemoCli, SendArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = MemoCli::parse();
    if let Err(e) = logging::init_logging(cli.global.verbose, cli.global.log_format) {
        eprintln!("Error: failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Commands::Send(args) => send(&cli.global, args).await,
        Commands::Interactive => interactive(&cli.global).await,
        Commands::Keys => show_keys(&cli.global),
        Commands::Keygen(args) => keygen(args),
        Commands::Version => {
            print_version();
            Ok(true)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Sends one message. Returns `Ok(false)` when the submission failed after
/// configuration succeeded; the error line has already been printed.
async fn send(global: &GlobalArgs, args: SendArgs) -> Result<bool> {
    let config = global.resolve()?;
    let submitter =
        Submitter::from_config(&config).context("failed to create node client")?;

    tracing::info!(
        network = %config.network,
        sender = %submitter.sender_address(),
        recipient = %config.recipient,
        node = %config.node_url,
        "sending message"
    );

    if args.dry_run {
        let prepared = submitter
            .prepare(&args.message)
            .context("failed to prepare transaction")?;
        verify_signed_transaction(&config.network, &prepared.transaction)
            .context("signature self check failed")?;

        let tx = &prepared.transaction;
        let summary = serde_json::json!({
            "hash": prepared.payload.hash,
            "payload": prepared.payload.payload,
            "size": tx.size(),
            "fee": tx.fee.0,
            "deadline": tx.deadline.0,
            "recipient": tx.recipient.to_string(),
            "message": decode_plain_message(tx.message()),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(true);
    }

    let result = submitter.submit(&args.message).await;
    let ok = result.is_ok();
    println!("{}", render_outcome(&result.map(|s| s.response)));
    Ok(ok)
}

async fn interactive(global: &GlobalArgs) -> Result<bool> {
    let config = global.resolve()?;
    let submitter =
        Submitter::from_config(&config).context("failed to create node client")?;

    eprintln!(
        "Sending from {} to {} on {}. One message per line; `:quit` to stop.",
        submitter.sender_address(),
        config.recipient,
        config.network.name,
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let state = shell::run(&submitter, stdin, &mut stdout).await?;
    Ok(state.failed == 0)
}

/// Prints the public half of the configured key. The secret never leaves
/// the process.
fn show_keys(global: &GlobalArgs) -> Result<bool> {
    let config = global.resolve()?;
    let public_key = config.keypair.public_key();
    let address = Address::from_public_key(config.network.identifier, &public_key);

    println!("Network     : {}", config.network);
    println!("Public key  : {}", public_key);
    println!("Address     : {}", address);
    println!("              {}", address.pretty());
    Ok(true)
}

/// Generates a key pair and writes the hex secret to `args.out`.
fn keygen(args: KeygenArgs) -> Result<bool> {
    let network = NetworkParams::by_name(&args.network)
        .with_context(|| format!("unknown network {:?}", args.network))?;

    if args.out.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.out.display()
        );
    }

    let keypair = KeyPair::generate();
    let public_key = keypair.public_key();
    let address = Address::from_public_key(network.identifier, &public_key);

    std::fs::write(&args.out, format!("{}\n", keypair.secret_key_hex()))
        .with_context(|| format!("failed to write key to {}", args.out.display()))?;

    // Restrict permissions on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&args.out, std::fs::Permissions::from_mode(0o600))
            .with_context(|| {
                format!("failed to restrict permissions on {}", args.out.display())
            })?;
    }

    tracing::info!(
        public_key = %public_key,
        key_path = %args.out.display(),
        "key pair generated"
    );

    println!("Key pair generated.");
    println!("  Network     : {}", network);
    println!("  Private key : {}", args.out.display());
    println!("  Public key  : {}", public_key);
    println!("  Address     : {}", address);
    Ok(true)
}

/// Prints version information to stdout.
fn print_version() {
    println!("memo-send {}", env!("CARGO_PKG_VERSION"));
    println!("network   {} (default)", DEFAULT_NETWORK);
    println!("fee       {} per byte", FEE_MULTIPLIER);
}
