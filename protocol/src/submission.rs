//! # Submission Flow
//!
//! Ties the pieces together: encode the text, assemble and price the transfer,
//! sign it, attach the signature, announce it. [`Submitter`] owns the signing
//! key and allows one submission in flight at a time; a second call while one
//! is pending fails fast with [`SubmitError::Busy`] instead of queueing.
//!
//! Nothing here retries. Each failure is logged once and returned, and
//! [`render_outcome`] turns the result into the single block of text the
//! shell displays.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::client::{Announcer, NodeClient, TransportError};
use crate::config::{NetworkParams, ResolvedConfig};
use crate::crypto::keys::KeyPair;
use crate::identity::address::Address;
use crate::transaction::builder::{TransactionError, TransferTransaction};
use crate::transaction::message::encode_plain_message;
use crate::transaction::signing::{
    SignedPayload, SigningError, SymbolFacade, TransactionFacade, TransferRequest,
};
use crate::transaction::types::Mosaic;

/// Shown when an error renders to an empty string.
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a submission did not produce a node response.
///
/// Message encoding is total and has no variant here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    Busy,

    #[error(transparent)]
    Assembly(#[from] TransactionError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for deadlines.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Makes payloads reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// In-flight guard
// ---------------------------------------------------------------------------

/// Single-slot lock. At most one [`InFlightPermit`] exists at a time.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    busy: AtomicBool,
}

/// Releases the slot on drop, on every exit path.
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    guard: &'a InFlightGuard,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the slot, or `None` if it is already taken.
    pub fn try_acquire(&self) -> Option<InFlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Submitter
// ---------------------------------------------------------------------------

/// A signed transfer that has not been announced.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub transaction: TransferTransaction,
    pub payload: SignedPayload,
}

/// Outcome of an announced transfer.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Uppercase hex transaction hash.
    pub hash: String,
    /// The node's response body, verbatim.
    pub response: serde_json::Value,
}

/// Runs the encode, assemble, sign, announce pipeline for one sender.
pub struct Submitter<F, A, C> {
    facade: F,
    announcer: A,
    clock: C,
    keypair: KeyPair,
    recipient: Address,
    mosaics: Vec<Mosaic>,
    fee_multiplier: u64,
    in_flight: InFlightGuard,
}

impl Submitter<SymbolFacade, NodeClient, SystemClock> {
    /// Production wiring: Ed25519 facade, HTTP announcer, wall clock.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, TransportError> {
        let announcer = NodeClient::new(&config.node_url)?;
        Ok(Self::new(
            config,
            SymbolFacade::new(config.network),
            announcer,
            SystemClock,
        ))
    }
}

impl<F, A, C> Submitter<F, A, C>
where
    F: TransactionFacade,
    A: Announcer,
    C: Clock,
{
    pub fn new(config: &ResolvedConfig, facade: F, announcer: A, clock: C) -> Self {
        Self {
            facade,
            announcer,
            clock,
            keypair: config.keypair.clone(),
            recipient: config.recipient,
            mosaics: config.mosaics.clone(),
            fee_multiplier: config.fee_multiplier,
            in_flight: InFlightGuard::new(),
        }
    }

    pub fn network(&self) -> &NetworkParams {
        self.facade.network()
    }

    /// Address of the configured signer on this network.
    pub fn sender_address(&self) -> Address {
        Address::from_public_key(self.network().identifier, &self.keypair.public_key())
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    /// `true` while a [`submit`](Self::submit) call is pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Encodes, assembles, signs and serializes `text` without announcing.
    pub fn prepare(&self, text: &str) -> Result<Prepared, SubmitError> {
        let mut request = TransferRequest::new(
            self.keypair.public_key(),
            self.recipient,
            self.clock.now(),
        );
        request.mosaics = self.mosaics.clone();
        request.message = encode_plain_message(text);
        request.fee_multiplier = self.fee_multiplier;

        let mut transaction = self.facade.create_transfer(request)?;
        let signature = self.facade.sign(&self.keypair, &transaction)?;
        let payload = self.facade.attach_signature(&mut transaction, signature)?;

        tracing::info!(
            hash = %payload.hash,
            fee = transaction.fee.0,
            deadline = transaction.deadline.0,
            "transaction signed"
        );
        Ok(Prepared {
            transaction,
            payload,
        })
    }

    /// Prepares and announces `text`. Fails with [`SubmitError::Busy`] if
    /// another submission is still pending.
    pub async fn submit(&self, text: &str) -> Result<Submission, SubmitError> {
        let Some(_permit) = self.in_flight.try_acquire() else {
            tracing::warn!("submission rejected: another one is in progress");
            return Err(SubmitError::Busy);
        };

        let result = self.announce_prepared(text).await;
        match &result {
            Ok(submission) => tracing::info!(hash = %submission.hash, "transaction announced"),
            Err(e) => tracing::error!(error = %e, "submission failed"),
        }
        result
    }

    async fn announce_prepared(&self, text: &str) -> Result<Submission, SubmitError> {
        let prepared = self.prepare(text)?;
        let response = self.announcer.announce(&prepared.payload).await?;
        Ok(Submission {
            hash: prepared.payload.hash,
            response,
        })
    }
}

/// Renders a submission result as the text the user sees.
///
/// Success is the response pretty-printed with two-space indentation;
/// failure is `Error: <message>`.
pub fn render_outcome(result: &Result<serde_json::Value, SubmitError>) -> String {
    match result {
        Ok(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        Err(e) => {
            let message = e.to_string();
            if message.is_empty() {
                format!("Error: {UNKNOWN_ERROR}")
            } else {
                format!("Error: {message}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
