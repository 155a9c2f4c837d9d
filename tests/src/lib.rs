//! # Civic-Chain Test Suite
//!
//! Cross-crate scenarios that no single subsystem crate can exercise alone.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── civic_benchmarks.rs   # detail codec, sign-bytes, host commit
//! └── src/
//!     └── integration/
//!         ├── scenarios.rs      # form -> payload -> envelope -> host
//!         ├── flows.rs          # gateway -> host -> commit worker -> feed
//!         └── node.rs           # node runtime over its real sockets
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::flows::
//! cargo bench -p cc-tests
//! ```

pub mod integration;
