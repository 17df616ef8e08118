//! # Hashing Utilities
//!
//! The two hash functions the network relies on:
//!
//! - **SHA3-256**: transaction hashes, address derivation, address
//!   checksums.
//! - **RIPEMD-160**: shortens the SHA3 digest of a public key into the
//!   20-byte body of an address.

use ripemd::Ripemd160;
use sha3::{Digest, Sha3_256};

/// SHA3-256 of a single buffer.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    sha3_256_multi(&[data])
}

/// SHA3-256 over several slices fed in order, without concatenating them.
pub fn sha3_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// `RIPEMD-160(SHA3-256(data))`, the address body of a public key.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha3_256(data)).into()
}
