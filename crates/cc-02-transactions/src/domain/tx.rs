//! # Transaction Envelope
//!
//! A `Tx` is a type tag, an input tying it to an account, and an opaque
//! payload whose meaning depends on the tag.

use super::errors::TxError;
use super::keys::{self, address_of, KeyPair};
use super::validation::{validate_basic, ValidationError};
use super::wire::{WireReader, WireWriter};
use shared_types::{PublicKey, Signature, TxId};
use std::fmt;

/// Transaction kinds and their wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxType {
    CreateAccount = 0x01,
    RemoveAccount = 0x02,
    Submit = 0x03,
    Resolve = 0x04,
}

impl TxType {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, TxError> {
        match tag {
            0x01 => Ok(TxType::CreateAccount),
            0x02 => Ok(TxType::RemoveAccount),
            0x03 => Ok(TxType::Submit),
            0x04 => Ok(TxType::Resolve),
            other => Err(TxError::UnknownTxType(other)),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxType::CreateAccount => "create_account",
            TxType::RemoveAccount => "remove_account",
            TxType::Submit => "submit",
            TxType::Resolve => "resolve",
        };
        f.write_str(name)
    }
}

/// Account binding of a transaction.
///
/// `address` is kept as raw bytes so that malformed widths survive decoding
/// and are reported by [`validate_basic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub address: Vec<u8>,
    pub sequence: u64,
    pub signature: Option<Signature>,
    pub public_key: Option<PublicKey>,
}

impl TxInput {
    pub fn new(sequence: u64) -> Self {
        Self {
            address: Vec::new(),
            sequence,
            signature: None,
            public_key: None,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        validate_basic(self)
    }

    fn encode_into(&self, w: &mut WireWriter, signature: Option<&Signature>) {
        w.put_bytes(&self.address)
            .put_uvarint(self.sequence)
            .put_opt_fixed(signature)
            .put_opt_fixed(self.public_key.as_ref());
    }

    fn decode_from(r: &mut WireReader<'_>) -> Result<Self, TxError> {
        Ok(Self {
            address: r.get_bytes()?,
            sequence: r.get_uvarint()?,
            signature: r.get_opt_fixed::<64>("signature")?,
            public_key: r.get_opt_fixed::<32>("public_key")?,
        })
    }
}

impl fmt::Display for TxInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TxInput{{{},{},{},{}}}",
            hex::encode_upper(&self.address),
            self.sequence,
            self.signature.map(hex::encode_upper).unwrap_or_default(),
            self.public_key.map(hex::encode_upper).unwrap_or_default(),
        )
    }
}

/// A signed transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub tx_type: TxType,
    pub input: TxInput,
    pub data: Vec<u8>,
}

impl Tx {
    pub fn new(tx_type: TxType, sequence: u64, data: Vec<u8>) -> Self {
        Self {
            tx_type,
            input: TxInput::new(sequence),
            data,
        }
    }

    fn encode_into(&self, w: &mut WireWriter, signature: Option<&Signature>) {
        w.put_u8(self.tx_type.tag());
        self.input.encode_into(w, signature);
        w.put_bytes(&self.data);
    }

    /// Full wire encoding, signature included.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        self.encode_into(&mut w, self.input.signature.as_ref());
        w.into_bytes()
    }

    /// Decode a complete wire encoding; trailing bytes are an error.
    pub fn decode(bytes: &[u8]) -> Result<Self, TxError> {
        let mut r = WireReader::new(bytes);
        let tx_type = TxType::from_tag(r.get_u8()?)?;
        let input = TxInput::decode_from(&mut r)?;
        let data = r.get_bytes()?;
        r.finish()?;
        Ok(Self {
            tx_type,
            input,
            data,
        })
    }

    /// `encode(chain_id) ++ encode(tx with empty signature)`.
    ///
    /// Encodes from a shared borrow with the signature slot written as
    /// empty; the envelope itself is never touched.
    pub fn sign_bytes(&self, chain_id: &str) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.put_str(chain_id);
        self.encode_into(&mut w, None);
        w.into_bytes()
    }

    /// Ripemd160 of the sign-bytes.
    pub fn id(&self, chain_id: &str) -> TxId {
        TxId(keys::ripemd160(&self.sign_bytes(chain_id)))
    }

    /// Bind the transaction to the account owning `public_key`. The key is
    /// declared in the envelope only on an account's first transaction.
    pub fn set_account(&mut self, public_key: &PublicKey) {
        self.input.address = address_of(public_key).to_vec();
        if self.input.sequence == 1 {
            self.input.public_key = Some(*public_key);
        }
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.input.signature = Some(signature);
    }

    /// Sign the sign-bytes with `key` and attach the signature.
    pub fn sign(&mut self, key: &KeyPair, chain_id: &str) {
        let signature = key.sign(&self.sign_bytes(chain_id));
        self.set_signature(signature);
    }

    /// Verify the attached signature against `public_key`.
    pub fn verify_signature(&self, public_key: &PublicKey, chain_id: &str) -> Result<(), TxError> {
        let signature = self.input.signature.as_ref().ok_or(TxError::MissingSignature)?;
        keys::verify(public_key, &self.sign_bytes(chain_id), signature)
    }

    pub fn validate_basic(&self) -> Result<(), TxError> {
        self.input.validate_basic().map_err(TxError::from)
    }
}

impl fmt::Display for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tx{{{} {} {}}}",
            self.tx_type.tag(),
            self.input,
            hex::encode_upper(&self.data)
        )
    }
}

/// Free-function form of [`Tx::sign_bytes`].
pub fn sign_bytes(chain_id: &str, tx: &Tx) -> Vec<u8> {
    tx.sign_bytes(chain_id)
}

/// Free-function form of [`Tx::id`].
pub fn tx_id(chain_id: &str, tx: &Tx) -> TxId {
    tx.id(chain_id)
}
