//! # Domain Layer - Transactions Subsystem
//!
//! Pure encoding, hashing and signing logic; no I/O.

pub mod errors;
pub mod keys;
pub mod payloads;
pub mod tx;
pub mod validation;
pub mod wire;
