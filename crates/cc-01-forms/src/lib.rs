//! # Forms Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Owns the civic-issue report: how a form is built from submitted fields,
//! how it is resolved, how it is fingerprinted, and how enumerated
//! sub-answers are embedded in its free-text description.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Resolution is one-way | `domain/form.rs` - `Form::resolve()` |
//! | Resolved forms carry both `at` and `by` | `domain/form.rs` - `FormStatus::Resolved` |
//! | Submitter is exactly 64 hex chars | `domain/form.rs` - `Field::Submitter` |
//! | No partial form escapes construction | `domain/form.rs` - `new_form()` |
//!
//! ## Lifecycle
//!
//! ```text
//! [initial] ──construct──→ (unresolved) ──resolve(at, by)──→ (resolved)
//!                                                        │
//!                                     resolve(*, *) ─────┴──→ AlreadyResolved
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! domain/catalogue.rs - Issue vocabulary and service-detail schemas
//! domain/details.rs   - Detail codec (write/read embedded options)
//! domain/form.rs      - Form entity, field setters, resolve, id, summary
//! domain/time.rs      - Timestamp rendering and minute truncation
//! ports/clock.rs      - Clock port (system and fixed implementations)
//! ```

pub mod domain;
pub mod ports;

pub use domain::catalogue::{
    details_for, Issue, ServiceDetail, BACKYARD_BAITED, COMPLETELY_OUT, POTHOLE_LOCATION,
    SERVICE_DETAILS,
};
pub use domain::details::{read, read_option, write};
pub use domain::errors::FormError;
pub use domain::form::{Form, FormFields, FormStatus};
pub use domain::time::{format_timestamp, to_the_minute};
pub use ports::clock::{Clock, FixedClock, SystemClock};
