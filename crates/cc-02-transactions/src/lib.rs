//! # Transactions Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Defines the transaction envelope submitted to the replicated state
//! machine: its bit-exact wire format, the canonical bytes a submitter signs,
//! basic validation, and the content-addressed transaction id.
//!
//! ## Wire Format
//!
//! ```text
//! tx        = type:u8 input data
//! input     = address:bytes sequence:uvarint signature:bytes(0|64) public_key:bytes(0|32)
//! data      = bytes
//! bytes     = len:uvarint raw
//! uvarint   = size:u8 big-endian[size]          (0 encodes as a single 0x00)
//! signbytes = bytes(chain_id) tx(signature = empty)
//! tx_id     = ripemd160(signbytes)
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `|address| == 20` | `domain/validation.rs` - `validate_basic()` |
//! | `sequence >= 1` | `domain/validation.rs` - `validate_basic()` |
//! | `sequence == 1 => public_key` | `domain/validation.rs` - `validate_basic()` |
//! | `sequence > 1 => no public_key` | `domain/validation.rs` - `validate_basic()` |
//! | Signature signs everything but itself | `domain/tx.rs` - `Tx::sign_bytes()` borrows `&self` |

pub mod domain;

pub use domain::errors::{PayloadError, TxError};
pub use domain::keys::{address_of, KeyPair};
pub use domain::payloads::{AccountKind, FormRecord, RemoveTarget, ResolveRecord};
pub use domain::tx::{sign_bytes, tx_id, Tx, TxInput, TxType};
pub use domain::validation::{validate_basic, ValidationError};
pub use domain::wire::{WireError, WireReader, WireWriter};
