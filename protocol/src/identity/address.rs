//! Network addresses derived from public keys.
//!
//! Layout of the 24 raw bytes:
//!
//! ```text
//! [0]      network identifier (0x98 testnet, 0x68 mainnet)
//! [1..21]  RIPEMD-160(SHA3-256(public_key))
//! [21..24] SHA3-256(bytes[0..21])[0..3]   checksum
//! ```
//!
//! The text form is RFC 4648 base32 without padding: 39 characters, the
//! first of which spells the network (`T`, `N`). Input is accepted in either
//! case and with the dashes explorers use to group characters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::crypto::hash::{hash160, sha3_256};
use crate::crypto::keys::PublicKey;

/// Raw address length in bytes.
pub const ADDRESS_LENGTH: usize = 24;

/// Encoded address length in characters.
pub const ENCODED_ADDRESS_LENGTH: usize = 39;

const CHECKSUM_LENGTH: usize = 3;
const CHECKSUM_OFFSET: usize = ADDRESS_LENGTH - CHECKSUM_LENGTH;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[BASE32_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Reasons an address string is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("expected 39 characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid base32 character {0:?}")]
    InvalidCharacter(char),

    #[error("non-zero padding bits")]
    NonCanonical,

    #[error("checksum mismatch")]
    InvalidChecksum,
}

/// A 24-byte network address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: [u8; ADDRESS_LENGTH],
}

impl Address {
    /// Derives the address of `public_key` on the network with the given
    /// identifier byte.
    pub fn from_public_key(network_identifier: u8, public_key: &PublicKey) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = network_identifier;
        bytes[1..CHECKSUM_OFFSET].copy_from_slice(&hash160(public_key.as_bytes()));
        let checksum = sha3_256(&bytes[..CHECKSUM_OFFSET]);
        bytes[CHECKSUM_OFFSET..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);
        Self { bytes }
    }

    /// Wraps raw bytes after checking the embedded checksum.
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Result<Self, AddressError> {
        let checksum = sha3_256(&bytes[..CHECKSUM_OFFSET]);
        if bytes[CHECKSUM_OFFSET..] != checksum[..CHECKSUM_LENGTH] {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(Self { bytes })
    }

    /// Network identifier byte.
    pub fn network_identifier(&self) -> u8 {
        self.bytes[0]
    }

    /// Raw bytes as written into a transaction.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.bytes
    }

    /// Dash-separated form in groups of six, e.g. `TCSMJN-JTRI76-...`.
    pub fn pretty(&self) -> String {
        let plain = self.to_string();
        plain
            .as_bytes()
            .chunks(6)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1F) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1F) as usize] as char);
    }
    out
}

fn decode_base32(s: &str) -> Result<[u8; ADDRESS_LENGTH], AddressError> {
    let mut out = [0u8; ADDRESS_LENGTH];
    let mut buffer: u32 = 0;
    let mut bits = 0;
    let mut pos = 0;

    for c in s.chars() {
        let upper = c.to_ascii_uppercase();
        let value = match upper {
            c if c.is_ascii() => BASE32_DECODE[c as usize],
            _ => 0xFF,
        };
        if value == 0xFF {
            return Err(AddressError::InvalidCharacter(c));
        }
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out[pos] = (buffer >> bits) as u8;
            pos += 1;
        }
    }

    if buffer & ((1 << bits) - 1) != 0 {
        return Err(AddressError::NonCanonical);
    }
    Ok(out)
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.trim().chars().filter(|c| *c != '-').collect();
        let len = compact.chars().count();
        if len != ENCODED_ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength(len));
        }
        Self::from_bytes(decode_base32(&compact)?)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_base32(&self.bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}
