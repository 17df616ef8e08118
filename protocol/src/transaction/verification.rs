//! Post-signing self check.
//!
//! Re-verifies an attached signature against the transfer's declared signer
//! before anything leaves the process. A node would reject a bad signature
//! anyway; this catches it without a round trip and is what `--dry-run`
//! reports on.

use super::builder::TransferTransaction;
use super::signing::{SigningError, SymbolFacade};
use crate::config::NetworkParams;

/// Verifies that `tx` carries a valid signature from its signer on
/// `network`.
///
/// # Errors
///
/// [`SigningError::Unsigned`] when no signature is attached,
/// [`SigningError::InvalidSignature`] when it does not verify.
pub fn verify_signed_transaction(
    network: &NetworkParams,
    tx: &TransferTransaction,
) -> Result<(), SigningError> {
    let signature = tx.signature.as_ref().ok_or(SigningError::Unsigned)?;
    let data = SymbolFacade::new(*network).signing_bytes(tx);
    if tx.signer_public_key.verify(&data, signature) {
        Ok(())
    } else {
        Err(SigningError::InvalidSignature {
            signer: tx.signer_public_key.to_hex(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAINNET, TESTNET};
    use crate::crypto::keys::KeyPair;
    use crate::transaction::message::encode_plain_message;
    use crate::transaction::signing::{TransactionFacade, TransferRequest};
    use crate::transaction::types::Amount;
    use chrono::Utc;

    fn signed_transfer() -> (KeyPair, TransferTransaction) {
        let kp = KeyPair::generate();
        let facade = SymbolFacade::testnet();
        let mut request = TransferRequest::new(
            kp.public_key(),
            "TCSMJNJTRI76YPGQFDEZBFL3XTM4L3AWELOGBDY".parse().unwrap(),
            Utc::now(),
        );
        request.message = encode_plain_message("ping");
        let mut tx = facade.create_transfer(request).unwrap();
        let sig = facade.sign(&kp, &tx).unwrap();
        facade.attach_signature(&mut tx, sig).unwrap();
        (kp, tx)
    }

    #[test]
    fn valid_signature_passes() {
        let (_, tx) = signed_transfer();
        assert_eq!(verify_signed_transaction(&TESTNET, &tx), Ok(()));
    }

    #[test]
    fn unsigned_transfer_fails() {
        let (_, mut tx) = signed_transfer();
        tx.signature = None;
        assert_eq!(
            verify_signed_transaction(&TESTNET, &tx),
            Err(SigningError::Unsigned)
        );
    }

    #[test]
    fn tampered_fee_fails() {
        let (_, mut tx) = signed_transfer();
        tx.fee = Amount(tx.fee.0 + 1);
        assert!(matches!(
            verify_signed_transaction(&TESTNET, &tx),
            Err(SigningError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn other_network_fails() {
        let (_, tx) = signed_transfer();
        assert!(verify_signed_transaction(&MAINNET, &tx).is_err());
    }
}
