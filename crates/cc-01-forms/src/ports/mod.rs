//! Ports for the Forms subsystem.

pub mod clock;
