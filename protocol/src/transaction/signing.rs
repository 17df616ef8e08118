//! Signing and payload serialization.
//!
//! Signing is a separate step from building because the key may not be
//! available when the transfer is assembled. The signed data is the network's
//! generation hash seed followed by [`TransferTransaction::verifiable_bytes`],
//! so a signature is only ever valid on the network it was made for.
//!
//! Callers go through the [`TransactionFacade`] trait; [`SymbolFacade`] is the
//! production implementation and the only one that touches key material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::builder::{TransactionError, TransferBuilder, TransferTransaction};
use super::types::Mosaic;
use crate::config::{NetworkParams, FEE_MULTIPLIER, TESTNET};
use crate::crypto::hash::sha3_256_multi;
use crate::crypto::keys::{KeyPair, PublicKey, Signature};
use crate::identity::address::Address;

/// Reasons a transfer cannot be signed or a signature cannot be attached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The key pair does not belong to the transfer's declared signer.
    #[error("key pair {actual} does not match transaction signer {expected}")]
    SignerMismatch { expected: String, actual: String },

    #[error("signature does not verify against signer {signer}")]
    InvalidSignature { signer: String },

    #[error("transaction is not signed")]
    Unsigned,
}

/// Everything needed to describe one transfer, minus the fee and deadline
/// which the facade derives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub signer: PublicKey,
    pub recipient: Address,
    pub mosaics: Vec<Mosaic>,
    /// Encoded message, tag byte included.
    pub message: Vec<u8>,
    pub now: DateTime<Utc>,
    pub fee_multiplier: u64,
}

impl TransferRequest {
    pub fn new(signer: PublicKey, recipient: Address, now: DateTime<Utc>) -> Self {
        Self {
            signer,
            recipient,
            mosaics: Vec::new(),
            message: Vec::new(),
            now,
            fee_multiplier: FEE_MULTIPLIER,
        }
    }
}

/// A serialized, signed transaction ready for `PUT /transactions`.
///
/// Serializes to exactly `{"payload":"<HEX>"}`; the hash is local-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPayload {
    /// Uppercase hex of the full transaction bytes.
    pub payload: String,
    /// Uppercase hex transaction hash, for looking the transaction up later.
    #[serde(skip)]
    pub hash: String,
}

impl SignedPayload {
    /// JSON request body.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "payload": self.payload }).to_string()
    }
}

// ---------------------------------------------------------------------------
// TransactionFacade
// ---------------------------------------------------------------------------

/// The capabilities the submission flow needs from a transaction SDK.
pub trait TransactionFacade: Send + Sync {
    /// Network this facade builds and signs for.
    fn network(&self) -> &NetworkParams;

    /// Builds a priced, unsigned transfer.
    fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferTransaction, TransactionError>;

    /// Signs `tx` with `keypair` without modifying it.
    fn sign(&self, keypair: &KeyPair, tx: &TransferTransaction) -> Result<Signature, SigningError>;

    /// Writes `signature` into `tx` and serializes the result.
    fn attach_signature(
        &self,
        tx: &mut TransferTransaction,
        signature: Signature,
    ) -> Result<SignedPayload, SigningError>;
}

/// Production facade: Ed25519 over the network's generation hash seed.
#[derive(Debug, Clone, Copy)]
pub struct SymbolFacade {
    network: NetworkParams,
}

impl SymbolFacade {
    pub fn new(network: NetworkParams) -> Self {
        Self { network }
    }

    pub fn testnet() -> Self {
        Self::new(TESTNET)
    }

    /// Bytes covered by the signature.
    pub fn signing_bytes(&self, tx: &TransferTransaction) -> Vec<u8> {
        let verifiable = tx.verifiable_bytes();
        let mut data = Vec::with_capacity(32 + verifiable.len());
        data.extend_from_slice(&self.network.generation_hash_seed);
        data.extend_from_slice(&verifiable);
        data
    }

    /// Transaction hash as the network computes it. `None` when unsigned.
    pub fn transaction_hash(&self, tx: &TransferTransaction) -> Option<[u8; 32]> {
        let signature = tx.signature.as_ref()?;
        Some(sha3_256_multi(&[
            &signature.as_bytes()[..32],
            &tx.signer_public_key.as_bytes()[..],
            &self.network.generation_hash_seed[..],
            &tx.verifiable_bytes()[..],
        ]))
    }
}

impl Default for SymbolFacade {
    fn default() -> Self {
        Self::testnet()
    }
}

impl TransactionFacade for SymbolFacade {
    fn network(&self) -> &NetworkParams {
        &self.network
    }

    fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferTransaction, TransactionError> {
        TransferBuilder::new(self.network)
            .signer(request.signer)
            .recipient(request.recipient)
            .mosaics(request.mosaics)
            .message(request.message)
            .now(request.now)
            .fee_multiplier(request.fee_multiplier)
            .build()
    }

    fn sign(&self, keypair: &KeyPair, tx: &TransferTransaction) -> Result<Signature, SigningError> {
        let public_key = keypair.public_key();
        if public_key != tx.signer_public_key {
            return Err(SigningError::SignerMismatch {
                expected: tx.signer_public_key.to_hex(),
                actual: public_key.to_hex(),
            });
        }
        Ok(keypair.sign(&self.signing_bytes(tx)))
    }

    fn attach_signature(
        &self,
        tx: &mut TransferTransaction,
        signature: Signature,
    ) -> Result<SignedPayload, SigningError> {
        if !tx.signer_public_key.verify(&self.signing_bytes(tx), &signature) {
            return Err(SigningError::InvalidSignature {
                signer: tx.signer_public_key.to_hex(),
            });
        }
        tx.signature = Some(signature);

        let payload = hex::encode_upper(tx.serialize());
        let hash = self
            .transaction_hash(tx)
            .map(hex::encode_upper)
            .ok_or(SigningError::Unsigned)?;

        tracing::debug!(%hash, size = tx.size(), "signature attached");
        Ok(SignedPayload { payload, hash })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAINNET;
    use crate::transaction::message::encode_plain_message;
    use crate::transaction::types::{Amount, MosaicId};
    use chrono::TimeZone;

    const ALICE_PRIVATE_KEY: &str =
        "33047CFD3ABA8E1B6FE047182F9B0118E2FA7E7D9E33865533AB582973F3B2A8";
    const BOB_ADDRESS: &str = "TCSMJNJTRI76YPGQFDEZBFL3XTM4L3AWELOGBDY";

    const GOLDEN_SIGNATURE: &str = concat!(
        "1C81C7979109C00650BCA34A3B4CCDEE4AFC59005F99E1D31222FFD8EA91C8B5AB3F814E",
        "FDEB8694A2463362F2577F081D9B3BB90D6A26A8C5F484A448CC4407",
    );
    const GOLDEN_PAYLOAD: &str = concat!(
        "C1000000000000001C81C7979109C00650BCA34A3B4CCDEE4AFC59005F99E1D31222FFD8",
        "EA91C8B5AB3F814EFDEB8694A2463362F2577F081D9B3BB90D6A26A8C5F484A448CC4407",
        "ABC57E7B68FF6AA2E5F3D7E674D071697F00F1B377AE484C1EDBA3EEB29761B800000000",
        "01985441644B000000000000401F7D000000000098A4C4B5338A3FEC3CD028C990957BBC",
        "D9C5EC1622DC608F1100010000000000CE8BA0672E21C07240420F00000000000048656C",
        "6C6F2053796D626F6C21000000",
    );
    const GOLDEN_HASH: &str = "65A1FE58D38C9C4E6EA9C180191FA4B9297FF68B093D0D46FD739C4C39D1859F";

    fn alice() -> KeyPair {
        KeyPair::from_hex(ALICE_PRIVATE_KEY).unwrap()
    }

    fn golden_request() -> TransferRequest {
        let mut request = TransferRequest::new(
            alice().public_key(),
            BOB_ADDRESS.parse().unwrap(),
            Utc.timestamp_millis_opt(1_667_251_467_000).unwrap(),
        );
        request.mosaics = vec![Mosaic::new(MosaicId(0x72C0_212E_67A0_8BCE), Amount(1_000_000))];
        request.message = encode_plain_message("Hello Symbol!");
        request
    }

    #[test]
    fn golden_signature_payload_and_hash() {
        let facade = SymbolFacade::testnet();
        let mut tx = facade.create_transfer(golden_request()).unwrap();
        let signature = facade.sign(&alice(), &tx).unwrap();
        assert_eq!(signature.to_hex(), GOLDEN_SIGNATURE);

        let signed = facade.attach_signature(&mut tx, signature).unwrap();
        assert_eq!(signed.payload, GOLDEN_PAYLOAD);
        assert_eq!(signed.hash, GOLDEN_HASH);
        assert!(tx.is_signed());
    }

    #[test]
    fn payload_json_has_only_payload_field() {
        let signed = SignedPayload {
            payload: "ABCD".into(),
            hash: "FFFF".into(),
        };
        assert_eq!(signed.to_json(), r#"{"payload":"ABCD"}"#);
    }

    #[test]
    fn signing_is_deterministic() {
        let facade = SymbolFacade::testnet();
        let tx = facade.create_transfer(golden_request()).unwrap();
        let a = facade.sign(&alice(), &tx).unwrap();
        let b = facade.sign(&alice(), &tx).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_keypair_is_rejected() {
        let facade = SymbolFacade::testnet();
        let tx = facade.create_transfer(golden_request()).unwrap();
        let err = facade.sign(&KeyPair::generate(), &tx).unwrap_err();
        assert!(matches!(err, SigningError::SignerMismatch { .. }));
    }

    #[test]
    fn foreign_signature_cannot_be_attached() {
        let facade = SymbolFacade::testnet();
        let mut tx = facade.create_transfer(golden_request()).unwrap();
        let bogus = KeyPair::generate().sign(&facade.signing_bytes(&tx));
        let err = facade.attach_signature(&mut tx, bogus).unwrap_err();
        assert!(matches!(err, SigningError::InvalidSignature { .. }));
        assert!(!tx.is_signed());
    }

    #[test]
    fn signature_is_bound_to_network() {
        let testnet = SymbolFacade::testnet();
        let mainnet = SymbolFacade::new(MAINNET);
        let tx = testnet.create_transfer(golden_request()).unwrap();
        assert_ne!(testnet.signing_bytes(&tx), mainnet.signing_bytes(&tx));
    }

    #[test]
    fn hash_requires_signature() {
        let facade = SymbolFacade::testnet();
        let tx = facade.create_transfer(golden_request()).unwrap();
        assert_eq!(facade.transaction_hash(&tx), None);
    }
}
