//! # Ed25519 Key Material
//!
//! Account keys and address derivation. An account address is the
//! Ripemd160 digest of its 32-byte public key.

use super::errors::TxError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use ripemd::{Digest, Ripemd160};
use shared_types::{Address, PublicKey, Signature};

/// Derive the 20-byte address of a public key.
pub fn address_of(public_key: &PublicKey) -> Address {
    ripemd160(public_key)
}

/// Ripemd160 of arbitrary bytes.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Verify an Ed25519 signature over `message`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> Result<(), TxError> {
    let key = VerifyingKey::from_bytes(public_key).map_err(|_| TxError::InvalidPublicKey)?;
    let sig = ed25519_dalek::Signature::from_bytes(signature);
    key.verify(message, &sig)
        .map_err(|_| TxError::InvalidSignature)
}

/// An account's signing key.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Create from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Parse a hex-encoded 32-byte secret seed.
    pub fn from_secret_hex(secret: &str) -> Result<Self, TxError> {
        let raw = hex::decode(secret.trim().trim_start_matches("0x"))
            .map_err(|e| TxError::InvalidSecretKey(e.to_string()))?;
        let seed: [u8; 32] = raw
            .try_into()
            .map_err(|_| TxError::InvalidSecretKey("expected 32 bytes".into()))?;
        Ok(Self::from_seed(seed))
    }

    pub fn public_key(&self) -> PublicKey {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn address(&self) -> Address {
        address_of(&self.public_key())
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Sign a message (deterministic).
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}
