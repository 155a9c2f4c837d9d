//! # Core Identifiers
//!
//! Fixed-width identifiers used across the transaction and form pipeline.

use crate::errors::IdParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address (`ripemd160(public_key)`).
pub type Address = [u8; 20];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte hash (SHA-256 app hash).
pub type Hash = [u8; 32];

/// Length of a form fingerprint in bytes.
pub const FORM_ID_LEN: usize = 16;

/// Length of a transaction id in bytes.
pub const TX_ID_LEN: usize = 20;

/// Width of a hex-encoded public key, the only accepted submitter shape.
pub const SUBMITTER_HEX_LEN: usize = 64;

/// The 16-byte content-addressed fingerprint of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct FormId(pub [u8; FORM_ID_LEN]);

impl FormId {
    /// Build from a byte slice; the slice must be exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdParseError> {
        let arr: [u8; FORM_ID_LEN] = bytes.try_into().map_err(|_| IdParseError::Length {
            expected: FORM_ID_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; FORM_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for FormId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s.trim().trim_start_matches("0x"))
            .map_err(|e| IdParseError::Hex(e.to_string()))?;
        Self::from_slice(&raw)
    }
}

/// The 20-byte Ripemd160 identifier of a transaction's sign-bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub [u8; TX_ID_LEN]);

impl TxId {
    pub fn as_bytes(&self) -> &[u8; TX_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parse a hex address, with or without a `0x` prefix.
pub fn parse_address(s: &str) -> Result<Address, IdParseError> {
    let raw = hex::decode(s.trim().trim_start_matches("0x"))
        .map_err(|e| IdParseError::Hex(e.to_string()))?;
    let len = raw.len();
    raw.try_into().map_err(|_| IdParseError::Length {
        expected: 20,
        actual: len,
    })
}
