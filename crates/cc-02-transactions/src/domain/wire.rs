//! # Canonical Binary Encoding
//!
//! Varints carry a single size byte followed by the minimal big-endian
//! value bytes. Byte strings are a varint length followed by the raw bytes.
//! Encoding is deterministic: one value has exactly one encoding.

use bytes::{Buf, BufMut};
use thiserror::Error;

/// Largest varint payload (u64).
const MAX_VARINT_SIZE: u8 = 8;

/// Upper bound on a single length-prefixed field.
pub const MAX_FIELD_LEN: u64 = 1 << 20;

/// Wire decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Input ended before the value was complete.
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// Varint size byte out of range.
    #[error("Invalid varint size: {0}")]
    InvalidVarintSize(u8),

    /// Varint was not minimally encoded.
    #[error("Non-canonical varint")]
    NonCanonicalVarint,

    /// Length prefix exceeds the field limit.
    #[error("Field too long: {0} bytes")]
    FieldTooLong(u64),

    /// Fixed-width field has the wrong length.
    #[error("Invalid {field} length: {actual}")]
    InvalidLength { field: &'static str, actual: usize },

    /// String field is not UTF-8.
    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    /// Bytes left over after the top-level value.
    #[error("Trailing bytes: {0}")]
    TrailingBytes(usize),
}

/// Encoder over a growable buffer.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.put_u8(value);
        self
    }

    pub fn put_uvarint(&mut self, value: u64) -> &mut Self {
        let be = value.to_be_bytes();
        let start = be.iter().position(|&b| b != 0).unwrap_or(be.len());
        let size = (be.len() - start) as u8;
        self.buf.put_u8(size);
        self.buf.put_slice(&be[start..]);
        self
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.put_uvarint(bytes.len() as u64);
        self.buf.put_slice(bytes);
        self
    }

    pub fn put_str(&mut self, s: &str) -> &mut Self {
        self.put_bytes(s.as_bytes())
    }

    /// Length-prefixed optional fixed-width field; `None` encodes as empty.
    pub fn put_opt_fixed<const N: usize>(&mut self, value: Option<&[u8; N]>) -> &mut Self {
        match value {
            Some(raw) => self.put_bytes(raw),
            None => self.put_bytes(&[]),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Decoder over a borrowed slice.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn need(&self, needed: usize) -> Result<(), WireError> {
        if self.buf.remaining() < needed {
            return Err(WireError::UnexpectedEof {
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn get_u8(&mut self) -> Result<u8, WireError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn get_uvarint(&mut self) -> Result<u64, WireError> {
        let size = self.get_u8()?;
        if size > MAX_VARINT_SIZE {
            return Err(WireError::InvalidVarintSize(size));
        }
        let size = size as usize;
        self.need(size)?;
        let mut be = [0u8; 8];
        self.buf.copy_to_slice(&mut be[8 - size..]);
        if size > 0 && be[8 - size] == 0 {
            return Err(WireError::NonCanonicalVarint);
        }
        Ok(u64::from_be_bytes(be))
    }

    pub fn get_bytes(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.get_uvarint()?;
        if len > MAX_FIELD_LEN {
            return Err(WireError::FieldTooLong(len));
        }
        let len = len as usize;
        self.need(len)?;
        let mut out = vec![0u8; len];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    pub fn get_string(&mut self) -> Result<String, WireError> {
        String::from_utf8(self.get_bytes()?).map_err(|_| WireError::InvalidUtf8)
    }

    /// Length-prefixed optional fixed-width field: empty or exactly `N` bytes.
    pub fn get_opt_fixed<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<Option<[u8; N]>, WireError> {
        let raw = self.get_bytes()?;
        if raw.is_empty() {
            return Ok(None);
        }
        let actual = raw.len();
        raw.try_into()
            .map(Some)
            .map_err(|_| WireError::InvalidLength { field, actual })
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Fail unless the whole input was consumed.
    pub fn finish(self) -> Result<(), WireError> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(WireError::TrailingBytes(n)),
        }
    }
}
