//! Transfer transaction construction.
//!
//! [`TransferBuilder`] collects the signer, recipient, mosaics and encoded
//! message, stamps a deadline two hours after "now" in network time, and
//! prices the transaction at `size * fee_multiplier`. The size of a transfer
//! does not depend on its fee, so pricing is a two-pass affair: build with a
//! zero fee, measure, patch the fee in.
//!
//! The builder does not sign; see [`super::signing`].

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::types::{Amount, Mosaic, NetworkTimestamp, TransactionType};
use crate::config::{NetworkParams, DEADLINE_HOURS, FEE_MULTIPLIER};
use crate::crypto::keys::{PublicKey, Signature, SIGNATURE_LENGTH};
use crate::identity::address::Address;

/// Bytes in front of the signed part: size, reserved, signature, signer,
/// reserved.
pub const HEADER_SIZE: usize = 4 + 4 + SIGNATURE_LENGTH + 32 + 4;

/// Size of a transfer with no mosaics and an empty message.
pub const TRANSFER_BASE_SIZE: usize = HEADER_SIZE + 1 + 1 + 2 + 8 + 8 + 24 + 2 + 1 + 4 + 1;

/// Serialized size of one mosaic entry.
pub const MOSAIC_SIZE: usize = 16;

/// Largest message that fits the 16-bit size field.
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize;

/// Largest mosaic count that fits the 8-bit count field.
pub const MAX_MOSAICS: usize = u8::MAX as usize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a transfer cannot be assembled.
///
/// Every one of these is fatal to the current submission only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("signer public key is not set")]
    MissingSigner,

    #[error("recipient address is not set")]
    MissingRecipient,

    #[error("recipient belongs to network 0x{actual:02X}, expected 0x{expected:02X}")]
    RecipientNetworkMismatch { expected: u8, actual: u8 },

    #[error("message is {len} bytes, maximum is {max}")]
    MessageTooLarge { len: usize, max: usize },

    #[error("{count} mosaics attached, maximum is {max}")]
    TooManyMosaics { count: usize, max: usize },

    #[error("current time is before the {network} epoch")]
    TimestampBeforeEpoch { network: &'static str },

    #[error("fee overflows: size {size} * multiplier {multiplier}")]
    FeeOverflow { size: usize, multiplier: u64 },
}

// ---------------------------------------------------------------------------
// TransferTransaction
// ---------------------------------------------------------------------------

/// A transfer transaction, signed or not.
///
/// `mosaics` are kept sorted by id, at most [`MAX_MOSAICS`] of them, and the
/// message is at most [`MAX_MESSAGE_SIZE`] bytes. Both are only set by
/// [`TransferBuilder::build`], which keeps the wire size fields in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTransaction {
    /// `None` until [`super::signing::TransactionFacade::attach_signature`].
    pub signature: Option<Signature>,
    pub signer_public_key: PublicKey,
    /// Network identifier byte.
    pub network: u8,
    pub fee: Amount,
    pub deadline: NetworkTimestamp,
    pub recipient: Address,
    mosaics: Vec<Mosaic>,
    message: Vec<u8>,
}

impl TransferTransaction {
    /// Attached mosaics, sorted by id.
    pub fn mosaics(&self) -> &[Mosaic] {
        &self.mosaics
    }

    /// Encoded message, tag byte included.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Serialized size in bytes. Independent of fee and signature.
    pub fn size(&self) -> usize {
        TRANSFER_BASE_SIZE + MOSAIC_SIZE * self.mosaics.len() + self.message.len()
    }

    /// Full little-endian wire encoding. An absent signature is written as
    /// 64 zero bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let tx_type = TransactionType::Transfer;
        let mut buf = Vec::with_capacity(self.size());

        // In range by construction: at most 160 + 255 * 16 + 65535 bytes.
        buf.extend_from_slice(&(self.size() as u32).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());

        match &self.signature {
            Some(sig) => buf.extend_from_slice(sig.as_bytes()),
            None => buf.extend_from_slice(&[0u8; SIGNATURE_LENGTH]),
        }
        buf.extend_from_slice(self.signer_public_key.as_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());

        // Everything from here on is signed.
        buf.push(tx_type.version());
        buf.push(self.network);
        buf.extend_from_slice(&tx_type.value().to_le_bytes());
        buf.extend_from_slice(&self.fee.0.to_le_bytes());
        buf.extend_from_slice(&self.deadline.0.to_le_bytes());

        buf.extend_from_slice(self.recipient.as_bytes());
        buf.extend_from_slice(&(self.message.len() as u16).to_le_bytes());
        buf.push(self.mosaics.len() as u8);
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.push(0);

        for mosaic in &self.mosaics {
            buf.extend_from_slice(&mosaic.id.0.to_le_bytes());
            buf.extend_from_slice(&mosaic.amount.0.to_le_bytes());
        }
        buf.extend_from_slice(&self.message);

        buf
    }

    /// The signed portion of [`serialize`](Self::serialize): everything after
    /// the header.
    pub fn verifiable_bytes(&self) -> Vec<u8> {
        let mut bytes = self.serialize();
        bytes.drain(..HEADER_SIZE);
        bytes
    }

    /// Returns `true` once a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

// ---------------------------------------------------------------------------
// TransferBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`TransferTransaction`]s.
///
/// ```rust,no_run
/// use memo_protocol::config::TESTNET;
/// use memo_protocol::crypto::KeyPair;
/// use memo_protocol::transaction::message::encode_plain_message;
/// use memo_protocol::transaction::types::{Amount, Mosaic, MosaicId};
/// use memo_protocol::transaction::TransferBuilder;
///
/// let signer = KeyPair::generate().public_key();
/// let tx = TransferBuilder::new(TESTNET)
///     .signer(signer)
///     .recipient("TCSMJNJTRI76YPGQFDEZBFL3XTM4L3AWELOGBDY".parse().unwrap())
///     .mosaic(Mosaic::new(MosaicId(0x72C0_212E_67A0_8BCE), Amount(1_000_000)))
///     .message(encode_plain_message("Hello Symbol!"))
///     .build()
///     .unwrap();
/// assert_eq!(tx.fee.0, tx.size() as u64 * 100);
/// ```
///
/// `now` defaults to the current UTC time and `fee_multiplier` to
/// [`FEE_MULTIPLIER`]; both can be overridden.
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    network: NetworkParams,
    signer: Option<PublicKey>,
    recipient: Option<Address>,
    mosaics: Vec<Mosaic>,
    message: Vec<u8>,
    now: Option<DateTime<Utc>>,
    fee_multiplier: u64,
}

impl TransferBuilder {
    pub fn new(network: NetworkParams) -> Self {
        Self {
            network,
            signer: None,
            recipient: None,
            mosaics: Vec::new(),
            message: Vec::new(),
            now: None,
            fee_multiplier: FEE_MULTIPLIER,
        }
    }

    pub fn signer(mut self, public_key: PublicKey) -> Self {
        self.signer = Some(public_key);
        self
    }

    pub fn recipient(mut self, address: Address) -> Self {
        self.recipient = Some(address);
        self
    }

    /// Appends one mosaic. Order does not matter; `build` sorts.
    pub fn mosaic(mut self, mosaic: Mosaic) -> Self {
        self.mosaics.push(mosaic);
        self
    }

    pub fn mosaics(mut self, mosaics: impl IntoIterator<Item = Mosaic>) -> Self {
        self.mosaics.extend(mosaics);
        self
    }

    /// Sets the already-encoded message bytes.
    pub fn message(mut self, encoded: Vec<u8>) -> Self {
        self.message = encoded;
        self
    }

    /// Pins the clock used for the deadline.
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn fee_multiplier(mut self, multiplier: u64) -> Self {
        self.fee_multiplier = multiplier;
        self
    }

    /// Validates the inputs and produces a priced, unsigned transfer.
    pub fn build(self) -> Result<TransferTransaction, TransactionError> {
        let signer = self.signer.ok_or(TransactionError::MissingSigner)?;
        let recipient = self.recipient.ok_or(TransactionError::MissingRecipient)?;

        if recipient.network_identifier() != self.network.identifier {
            return Err(TransactionError::RecipientNetworkMismatch {
                expected: self.network.identifier,
                actual: recipient.network_identifier(),
            });
        }
        if self.message.len() > MAX_MESSAGE_SIZE {
            return Err(TransactionError::MessageTooLarge {
                len: self.message.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        if self.mosaics.len() > MAX_MOSAICS {
            return Err(TransactionError::TooManyMosaics {
                count: self.mosaics.len(),
                max: MAX_MOSAICS,
            });
        }

        let now = self.now.unwrap_or_else(Utc::now);
        let deadline = NetworkTimestamp::from_datetime(&self.network, now)
            .ok_or(TransactionError::TimestampBeforeEpoch {
                network: self.network.name,
            })?
            .add_hours(DEADLINE_HOURS);

        let mut mosaics = self.mosaics;
        mosaics.sort_by_key(|m| m.id);

        let mut tx = TransferTransaction {
            signature: None,
            signer_public_key: signer,
            network: self.network.identifier,
            fee: Amount(0),
            deadline,
            recipient,
            mosaics,
            message: self.message,
        };

        let size = tx.size();
        let fee = (size as u64)
            .checked_mul(self.fee_multiplier)
            .ok_or(TransactionError::FeeOverflow {
                size,
                multiplier: self.fee_multiplier,
            })?;
        tx.fee = Amount(fee);

        tracing::debug!(
            size,
            fee,
            deadline = tx.deadline.0,
            recipient = %tx.recipient,
            "transfer assembled"
        );
        Ok(tx)
    }
}

/// Assembles a priced, unsigned transfer in one call.
pub fn assemble(
    network: NetworkParams,
    signer: PublicKey,
    recipient: Address,
    transfers: &[Mosaic],
    encoded_message: Vec<u8>,
    now: DateTime<Utc>,
    fee_multiplier: u64,
) -> Result<TransferTransaction, TransactionError> {
    TransferBuilder::new(network)
        .signer(signer)
        .recipient(recipient)
        .mosaics(transfers.iter().copied())
        .message(encoded_message)
        .now(now)
        .fee_multiplier(fee_multiplier)
        .build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
