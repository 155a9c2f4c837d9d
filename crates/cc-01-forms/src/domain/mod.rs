//! # Domain Layer - Forms Subsystem
//!
//! Pure business logic; no I/O.

pub mod catalogue;
pub mod details;
pub mod errors;
pub mod form;
pub mod time;
