//! # Transaction Module
//!
//! Encoding, assembly, signing, and verification of transfer transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        - Value types (TransactionType, MosaicId, Amount, NetworkTimestamp)
//! message.rs      - Plain-text message encoding
//! builder.rs      - TransferBuilder and the binary layout of a transfer
//! signing.rs      - TransactionFacade trait and the Ed25519 SymbolFacade
//! verification.rs - Signature self check on a signed transfer
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Encode** the text with [`encode_plain_message`].
//! 2. **Build** with [`TransferBuilder`] (or [`TransactionFacade::create_transfer`]):
//!    deadline two hours out, fee priced from the final size.
//! 3. **Sign** with [`TransactionFacade::sign`].
//! 4. **Attach** with [`TransactionFacade::attach_signature`], which yields the
//!    [`SignedPayload`] JSON body for the node.
//!
//! All amounts are `u64` atomic units and all multi-byte fields are
//! little-endian.

pub mod builder;
pub mod message;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{assemble, TransactionError, TransferBuilder, TransferTransaction};
pub use message::{decode_plain_message, encode_plain_message};
pub use signing::{
    SignedPayload, SigningError, SymbolFacade, TransactionFacade, TransferRequest,
};
pub use types::{Amount, Mosaic, MosaicId, NetworkTimestamp, TransactionType};
pub use verification::verify_signed_transaction;
