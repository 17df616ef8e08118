//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over audited implementations: Ed25519 from
//! `ed25519-dalek`, SHA3-256 from `sha3`, RIPEMD-160 from `ripemd`.
//! Nothing here is hand-rolled.

pub mod hash;
pub mod keys;

pub use hash::{hash160, sha3_256, sha3_256_multi};
pub use keys::{KeyError, KeyPair, PublicKey, Signature};
