//! # Integration Tests
//!
//! Shared fixtures for building signed envelopes against a host.

pub mod flows;
pub mod node;
pub mod scenarios;

use cc_02_transactions::{KeyPair, Tx, TxType};

/// Chain id shared by the integration fixtures.
pub const CHAIN_ID: &str = "integration-chain";

/// RFC 3339 instant every fixture clock is pinned to.
pub const FIXED_NOW: &str = "2024-01-01T12:00:30+00:00";

/// Bind `tx` to `key`'s account and sign it for [`CHAIN_ID`].
pub fn signed(tx_type: TxType, sequence: u64, data: Vec<u8>, key: &KeyPair) -> Tx {
    let mut tx = Tx::new(tx_type, sequence, data);
    tx.set_account(&key.public_key());
    tx.sign(key, CHAIN_ID);
    tx
}
