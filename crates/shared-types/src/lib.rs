//! # Shared Types Crate
//!
//! Primitive identifiers and the reply vocabulary shared by every crate in
//! the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Identifier widths (`Address`, `FormId`, `TxId`)
//!   are defined once here.
//! - **One Code Space**: Every domain error in the workspace maps onto exactly
//!   one [`ResultCode`], so host replies are uniform across transports.

pub mod codes;
pub mod entities;
pub mod errors;
pub mod result;

pub use codes::ResultCode;
pub use entities::*;
pub use errors::*;
pub use result::HostResult;
