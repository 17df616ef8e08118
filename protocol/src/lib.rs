// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Memo Protocol Core Library
//!
//! Everything needed to turn a line of text into an announced transfer on a
//! Symbol network: the message is padded and tagged, wrapped in a transfer
//! transaction whose fee is derived from its own size, signed with Ed25519,
//! and PUT to a node's `/transactions` endpoint.
//!
//! ## Architecture
//!
//! - **config**: Network parameters, protocol constants, and the externally
//!   supplied client configuration. No secrets are compiled in.
//! - **crypto**: Ed25519 keys and the SHA3/RIPEMD hashes the network uses.
//! - **identity**: Base32 network addresses with checksums.
//! - **transaction**: Message encoding, transfer assembly, signing facade.
//! - **client**: The HTTP announcer that talks to a node.
//! - **submission**: The encode → assemble → sign → announce flow, with a
//!   single-slot guard against double submission.
//!
//! ## Flow
//!
//! ```text
//! text ──encode──▶ message ──assemble──▶ TransferTransaction
//!                                           │ sign + attach
//!                                           ▼
//!                      node ◀──PUT /transactions── SignedPayload
//! ```

pub mod client;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod submission;
pub mod transaction;
