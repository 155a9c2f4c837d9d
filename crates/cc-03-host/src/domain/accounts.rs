//! Account entity.

use serde::{Deserialize, Serialize};
use shared_types::PublicKey;

/// A registered key. `sequence` is the sequence of the last applied
/// transaction signed by this account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub public_key: PublicKey,
    pub sequence: u64,
    pub admin: bool,
}

impl Account {
    /// A freshly created account, after its CreateAccount tx (sequence 1).
    pub fn new(public_key: PublicKey, admin: bool) -> Self {
        Self {
            public_key,
            sequence: 1,
            admin,
        }
    }

    pub fn next_sequence(&self) -> u64 {
        self.sequence + 1
    }

    /// Hex form used as a form's submitter identity.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }
}
