//! # daterule-core
//!
//! Date coercion and comparison rules for schema validation engines.
//!
//! A host engine hands over a loosely-typed field value; this crate
//! normalizes it into a canonical, zone-aware [`Temporal`] value (timezone
//! assignment, start/end-of-period snapping, min/max clamping) and evaluates
//! the comparison rules attached to the field's [`DateSchema`]. Failures are
//! plain [`Violation`](rules::Violation) values for the host to collect and
//! render -- nothing here panics or returns an error on malformed input.
//!
//! ## Quick start
//!
//! ```rust
//! use daterule_core::{DateSchema, Input, Unit, ValidationContext};
//!
//! let schema = DateSchema::new()
//!     .start_of(Unit::Day)
//!     .gte("2020-01-01")
//!     .lt("2030-01-01");
//!
//! let ctx = ValidationContext::new();
//! let result = schema.validate(&Input::from("2026-08-23T14:30:00"), &ctx);
//! assert!(result.is_ok());
//! assert_eq!(
//!     result.value.as_value().unwrap().to_iso(),
//!     "2026-08-23T00:00:00.000+00:00",
//! );
//! ```
//!
//! ## Modules
//!
//! - [`temporal`] — canonical temporal value: ISO parsing, zones, truncation
//! - [`schema`] — per-field configuration, bounds, chaining builder
//! - [`coerce`] — coercion stage: raw input → canonical value
//! - [`rules`] — validity check and the lt/gt/lte/gte rule set
//! - [`context`] — validation-time state (sibling fields, default timezone)
//! - [`error`] — schema construction errors

pub mod coerce;
pub mod context;
pub mod error;
pub mod rules;
pub mod schema;
pub mod temporal;

pub use coerce::{coerce, Coerced, Input};
pub use context::ValidationContext;
pub use error::SchemaError;
pub use rules::{check_rule, check_valid, Validation, Violation, ViolationKind};
pub use schema::{Bound, CompareOp, CompareRule, DateSchema};
pub use temporal::{Temporal, Unit};
