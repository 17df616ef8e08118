//! # Identity Module
//!
//! Who sends and who receives. A signer is an Ed25519 public key
//! ([`crate::crypto::keys::PublicKey`]); a recipient is an [`Address`]
//! derived from one. Addresses carry the network identifier in their first
//! byte and a 3-byte checksum in their last three, so a typo or a mainnet
//! address pasted into a testnet config is caught before anything is signed.

pub mod address;

pub use address::{Address, AddressError};
