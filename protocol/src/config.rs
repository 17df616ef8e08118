//! # Network Parameters & Client Configuration
//!
//! Every magic number the client needs lives here: the per-network
//! identifiers, epochs and generation hash seeds, the fee multiplier, and the
//! deadline window. Everything that identifies *who* sends *what* to *whom*
//! (node URL, private key, recipient, mosaics) is not a constant at all; it
//! arrives through [`ClientConfig`], loaded from TOML and overridden from the
//! environment by the binary.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::crypto::keys::{KeyError, KeyPair, PublicKey};
use crate::identity::address::{Address, AddressError};
use crate::transaction::types::{Amount, Mosaic, MosaicId};

// ---------------------------------------------------------------------------
// Protocol Constants
// ---------------------------------------------------------------------------

/// Fee paid per byte of serialized transaction. `fee = size * multiplier`.
pub const FEE_MULTIPLIER: u64 = 100;

/// How far past "now" the transaction deadline is placed.
pub const DEADLINE_HOURS: u64 = 2;

/// Message sent when the user does not type one.
pub const DEFAULT_MESSAGE: &str = "Hello Symbol!";

/// Name of the default network.
pub const DEFAULT_NETWORK: &str = "testnet";

// ---------------------------------------------------------------------------
// Network Parameters
// ---------------------------------------------------------------------------

/// Static parameters of one Symbol network.
///
/// The generation hash seed is mixed into every signature, so a transaction
/// signed for testnet can never be replayed on mainnet even with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    /// Human-readable name, used in logs and config files.
    pub name: &'static str,
    /// Identifier byte written into transactions and addresses.
    pub identifier: u8,
    /// Network epoch as seconds since the Unix epoch.
    pub epoch_adjustment_secs: i64,
    /// Seed prepended to the signed data.
    pub generation_hash_seed: [u8; 32],
}

/// Public test network. Addresses start with `T`.
pub const TESTNET: NetworkParams = NetworkParams {
    name: "testnet",
    identifier: 0x98,
    epoch_adjustment_secs: 1_667_250_467,
    generation_hash_seed: [
        0x49, 0xD6, 0xE1, 0xCE, 0x27, 0x6A, 0x85, 0xB7, 0x0E, 0xAF, 0xE5, 0x23, 0x49, 0xAA, 0xCC,
        0xA3, 0x89, 0x30, 0x2E, 0x7A, 0x97, 0x54, 0xBC, 0xF1, 0x22, 0x1E, 0x79, 0x49, 0x4F, 0xC6,
        0x65, 0xA4,
    ],
};

/// Main network. Addresses start with `N`.
pub const MAINNET: NetworkParams = NetworkParams {
    name: "mainnet",
    identifier: 0x68,
    epoch_adjustment_secs: 1_615_853_185,
    generation_hash_seed: [
        0x57, 0xF7, 0xDA, 0x20, 0x50, 0x08, 0x02, 0x6C, 0x77, 0x6C, 0xB6, 0xAE, 0xD8, 0x43, 0x39,
        0x3F, 0x04, 0xCD, 0x45, 0x8E, 0x0A, 0xA2, 0xD9, 0xF1, 0xD5, 0xF3, 0x1A, 0x40, 0x20, 0x72,
        0xB2, 0xD6,
    ],
};

impl NetworkParams {
    /// Looks up a network by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "testnet" => Some(TESTNET),
            "mainnet" => Some(MAINNET),
            _ => None,
        }
    }

    /// Epoch in Unix milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_adjustment_secs * 1_000
    }
}

impl fmt::Display for NetworkParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name, self.identifier)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a configuration cannot be loaded or resolved.
///
/// None of these messages ever include the private key itself.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no private key configured (set `private_key` or MEMO_PRIVATE_KEY)")]
    MissingPrivateKey,

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(#[source] KeyError),

    #[error("invalid signer public key: {0}")]
    InvalidSignerPublicKey(String),

    #[error("configured signer public key {configured} does not match private key ({derived})")]
    SignerMismatch { configured: String, derived: String },

    #[error("invalid recipient address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error("invalid mosaic id {id:?}: {reason}")]
    InvalidMosaicId { id: String, reason: String },

    #[error("invalid node URL {url:?}: {reason}")]
    InvalidNodeUrl { url: String, reason: String },

    #[error("unknown network {0:?} (expected testnet or mainnet)")]
    UnknownNetwork(String),
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// One mosaic entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicConfig {
    /// Hex mosaic id, `0x` prefix optional.
    pub id: String,
    /// Amount in atomic units.
    pub amount: u64,
}

/// Raw client configuration as it appears in TOML.
///
/// ```toml
/// node_url = "https://sym-test-01.opening-line.jp:3001/"
/// network = "testnet"
/// recipient = "TCSMJNJTRI76YPGQFDEZBFL3XTM4L3AWELOGBDY"
/// fee_multiplier = 100
///
/// [[mosaics]]
/// id = "0x72C0212E67A08BCE"
/// amount = 1000000
/// ```
///
/// `private_key` may be left out of the file and supplied through the
/// environment instead.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub node_url: String,
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub signer_public_key: Option<String>,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub mosaics: Vec<MosaicConfig>,
    #[serde(default = "default_fee_multiplier")]
    pub fee_multiplier: u64,
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

fn default_fee_multiplier() -> u64 {
    FEE_MULTIPLIER
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node_url: String::new(),
            network: default_network(),
            private_key: None,
            signer_public_key: None,
            recipient: String::new(),
            mosaics: Vec::new(),
            fee_multiplier: FEE_MULTIPLIER,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("node_url", &self.node_url)
            .field("network", &self.network)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("signer_public_key", &self.signer_public_key)
            .field("recipient", &self.recipient)
            .field("mosaics", &self.mosaics)
            .field("fee_multiplier", &self.fee_multiplier)
            .finish()
    }
}

impl ClientConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validates every field and produces the typed configuration the
    /// submission flow runs on.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let network = NetworkParams::by_name(&self.network)
            .ok_or_else(|| ConfigError::UnknownNetwork(self.network.clone()))?;

        let node_url = parse_node_url(&self.node_url)?;

        let private_key = self
            .private_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingPrivateKey)?;
        let keypair = KeyPair::from_hex(private_key).map_err(ConfigError::InvalidPrivateKey)?;

        if let Some(configured) = self.signer_public_key.as_deref() {
            let configured = PublicKey::from_hex(configured.trim())
                .map_err(|e| ConfigError::InvalidSignerPublicKey(e.to_string()))?;
            let derived = keypair.public_key();
            if configured != derived {
                return Err(ConfigError::SignerMismatch {
                    configured: configured.to_hex(),
                    derived: derived.to_hex(),
                });
            }
        }

        let recipient: Address = self.recipient.trim().parse()?;

        let mosaics = self
            .mosaics
            .iter()
            .map(|m| {
                let id = MosaicId::from_hex(&m.id).map_err(|reason| {
                    ConfigError::InvalidMosaicId {
                        id: m.id.clone(),
                        reason,
                    }
                })?;
                Ok(Mosaic::new(id, Amount(m.amount)))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        if mosaics.is_empty() {
            tracing::warn!(
                recipient = %recipient,
                "no mosaics configured; transfers will carry the message only"
            );
        }

        Ok(ResolvedConfig {
            node_url,
            network,
            keypair,
            recipient,
            mosaics,
            fee_multiplier: self.fee_multiplier,
        })
    }
}

fn parse_node_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidNodeUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

// ---------------------------------------------------------------------------
// ResolvedConfig
// ---------------------------------------------------------------------------

/// Fully validated configuration. Holds the signing key, so it is never
/// serialized and its `Debug` output only shows the public half.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub node_url: Url,
    pub network: NetworkParams,
    pub keypair: KeyPair,
    pub recipient: Address,
    pub mosaics: Vec<Mosaic>,
    pub fee_multiplier: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_PRIVATE_KEY: &str =
        "33047CFD3ABA8E1B6FE047182F9B0118E2FA7E7D9E33865533AB582973F3B2A8";
    const ALICE_PUBLIC_KEY: &str =
        "ABC57E7B68FF6AA2E5F3D7E674D071697F00F1B377AE484C1EDBA3EEB29761B8";
    const BOB_ADDRESS: &str = "TCSMJNJTRI76YPGQFDEZBFL3XTM4L3AWELOGBDY";

    fn sample_toml() -> String {
        format!(
            r#"
node_url = "https://sym-test-01.opening-line.jp:3001/"
network = "testnet"
private_key = "{ALICE_PRIVATE_KEY}"
signer_public_key = "{ALICE_PUBLIC_KEY}"
recipient = "{BOB_ADDRESS}"

[[mosaics]]
id = "0x72C0212E67A08BCE"
amount = 1000000
"#
        )
    }

    #[test]
    fn network_lookup_is_case_insensitive() {
        assert_eq!(NetworkParams::by_name("TestNet"), Some(TESTNET));
        assert_eq!(NetworkParams::by_name("mainnet"), Some(MAINNET));
        assert_eq!(NetworkParams::by_name("devnet"), None);
    }

    #[test]
    fn network_identifiers_are_distinct() {
        assert_ne!(TESTNET.identifier, MAINNET.identifier);
        assert_ne!(TESTNET.generation_hash_seed, MAINNET.generation_hash_seed);
    }

    #[test]
    fn parse_full_config() {
        let cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        assert_eq!(cfg.network, "testnet");
        assert_eq!(cfg.fee_multiplier, FEE_MULTIPLIER);
        assert_eq!(cfg.mosaics.len(), 1);
        assert_eq!(cfg.mosaics[0].amount, 1_000_000);
    }

    #[test]
    fn resolve_full_config() {
        let resolved = ClientConfig::from_toml_str(&sample_toml())
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(resolved.network, TESTNET);
        assert_eq!(resolved.keypair.public_key().to_hex(), ALICE_PUBLIC_KEY);
        assert_eq!(resolved.recipient.to_string(), BOB_ADDRESS);
        assert_eq!(resolved.mosaics[0].id, MosaicId(0x72C0_212E_67A0_8BCE));
        assert_eq!(resolved.node_url.host_str(), Some("sym-test-01.opening-line.jp"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ClientConfig::from_toml_str("nodeurl = \"http://x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_private_key_is_reported() {
        let mut cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        cfg.private_key = None;
        assert!(matches!(cfg.resolve(), Err(ConfigError::MissingPrivateKey)));

        cfg.private_key = Some("   ".into());
        assert!(matches!(cfg.resolve(), Err(ConfigError::MissingPrivateKey)));
    }

    #[test]
    fn mismatched_signer_public_key_is_rejected() {
        let mut cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        cfg.signer_public_key = Some("00".repeat(32));
        assert!(matches!(
            cfg.resolve(),
            Err(ConfigError::SignerMismatch { .. })
        ));
    }

    #[test]
    fn bad_recipient_is_rejected() {
        let mut cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        cfg.recipient = "TCSMJNJTRI76YPGQFDEZBFL3XTM4L3AWELOGBDA".into();
        assert!(matches!(cfg.resolve(), Err(ConfigError::InvalidAddress(_))));
    }

    #[test]
    fn bad_mosaic_id_is_rejected() {
        let mut cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        cfg.mosaics[0].id = "0xZZ".into();
        assert!(matches!(
            cfg.resolve(),
            Err(ConfigError::InvalidMosaicId { .. })
        ));
    }

    #[test]
    fn node_url_scheme_is_checked() {
        let mut cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        cfg.node_url = "ftp://example.com".into();
        assert!(matches!(
            cfg.resolve(),
            Err(ConfigError::InvalidNodeUrl { .. })
        ));

        cfg.node_url = String::new();
        assert!(matches!(
            cfg.resolve(),
            Err(ConfigError::InvalidNodeUrl { .. })
        ));
    }

    #[test]
    fn unknown_network_is_rejected() {
        let mut cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        cfg.network = "devnet".into();
        assert!(matches!(cfg.resolve(), Err(ConfigError::UnknownNetwork(_))));
    }

    #[test]
    fn debug_redacts_private_key() {
        let cfg = ClientConfig::from_toml_str(&sample_toml()).unwrap();
        let debug = format!("{cfg:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(ALICE_PRIVATE_KEY));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.toml");
        std::fs::write(&path, sample_toml()).unwrap();
        let cfg = ClientConfig::from_file(&path).unwrap();
        assert_eq!(cfg.recipient, BOB_ADDRESS);

        let missing = ClientConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
