//! # Node Client
//!
//! Announces signed transactions to a node over HTTP.
//!
//! One request per announcement: `PUT /transactions` with the
//! `{"payload":"…"}` body. The node's JSON reply is handed back as-is,
//! whatever the HTTP status, because nodes report rejections in the body.
//! There is no timeout, retry, or backoff here; a failed announcement is
//! reported and the user decides whether to send again.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::transaction::signing::SignedPayload;

/// Path of the announce endpoint, resolved against the node's base URL.
pub const ANNOUNCE_PATH: &str = "/transactions";

/// Reasons an announcement did not produce a JSON response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never completed (DNS, connect, TLS, reset).
    #[error("{0}")]
    Network(String),

    /// The node answered with something that is not JSON.
    #[error("invalid response from node (HTTP {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },

    #[error("invalid node URL: {0}")]
    Url(String),
}

/// Anything that can deliver a signed payload to a node.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, payload: &SignedPayload) -> Result<serde_json::Value, TransportError>;
}

// ---------------------------------------------------------------------------
// NodeClient
// ---------------------------------------------------------------------------

/// HTTP announcer backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    announce_url: Url,
}

impl NodeClient {
    /// Creates a client for the node at `base_url`.
    ///
    /// The announce path replaces whatever path `base_url` has, so
    /// `https://node:3001/` and `https://node:3001/v1` both announce to
    /// `https://node:3001/transactions`.
    pub fn new(base_url: &Url) -> Result<Self, TransportError> {
        let announce_url = base_url
            .join(ANNOUNCE_PATH)
            .map_err(|e| TransportError::Url(e.to_string()))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http, announce_url })
    }

    /// Full URL announcements go to.
    pub fn announce_url(&self) -> &Url {
        &self.announce_url
    }
}

#[async_trait]
impl Announcer for NodeClient {
    async fn announce(&self, payload: &SignedPayload) -> Result<serde_json::Value, TransportError> {
        tracing::info!(url = %self.announce_url, hash = %payload.hash, "announcing transaction");

        let response = self
            .http
            .put(self.announce_url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_json())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, "node accepted request");
        } else {
            tracing::warn!(%status, "node returned non-success status");
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| TransportError::InvalidResponse {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
