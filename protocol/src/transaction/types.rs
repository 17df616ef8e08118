//! Core value types for transfer transactions.
//!
//! All small and `Copy`. Quantities are plain `u64` in atomic units; there is
//! no floating point anywhere near an amount.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::config::NetworkParams;

/// Milliseconds per hour, for deadline arithmetic.
const MILLIS_PER_HOUR: u64 = 3_600_000;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Transaction kinds this client can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Mosaic transfer with an optional message.
    Transfer,
}

impl TransactionType {
    /// Wire discriminant.
    pub fn value(self) -> u16 {
        match self {
            Self::Transfer => 0x4154,
        }
    }

    /// Schema version written alongside the discriminant.
    pub fn version(self) -> u8 {
        match self {
            Self::Transfer => 1,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "transfer_transaction_v1"),
        }
    }
}

// ---------------------------------------------------------------------------
// MosaicId / Amount / Mosaic
// ---------------------------------------------------------------------------

/// 64-bit mosaic (asset) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MosaicId(pub u64);

impl MosaicId {
    /// Parses a hex id such as `0x72C0212E67A08BCE` or `72c0212e67a08bce`.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 16 {
            return Err(format!("expected 1-16 hex digits, got {}", digits.len()));
        }
        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// Quantity in atomic units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub u64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One (asset, quantity) pair of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mosaic {
    pub id: MosaicId,
    pub amount: Amount,
}

impl Mosaic {
    pub fn new(id: MosaicId, amount: Amount) -> Self {
        Self { id, amount }
    }
}

// ---------------------------------------------------------------------------
// NetworkTimestamp
// ---------------------------------------------------------------------------

/// Milliseconds since a network's epoch.
///
/// Deadlines are expressed in network time, not Unix time. Conversion goes
/// through UTC, so the local timezone never enters the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkTimestamp(pub u64);

impl NetworkTimestamp {
    /// Converts a UTC instant to network time. `None` if the instant is
    /// before the network epoch.
    pub fn from_datetime(network: &NetworkParams, at: DateTime<Utc>) -> Option<Self> {
        let millis = at.timestamp_millis().checked_sub(network.epoch_millis())?;
        u64::try_from(millis).ok().map(Self)
    }

    /// Returns a timestamp `hours` later.
    pub fn add_hours(self, hours: u64) -> Self {
        Self(self.0.saturating_add(hours.saturating_mul(MILLIS_PER_HOUR)))
    }
}

impl fmt::Display for NetworkTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
