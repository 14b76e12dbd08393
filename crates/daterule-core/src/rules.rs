//! Validity check and the comparison rule set.
//!
//! Every check returns `Option<Violation>` -- `None` is a pass. A violation
//! is an ordinary value for the host engine to collect and render, never an
//! error path. No-op conditions (missing value, unresolved reference bound,
//! value that never became canonical) pass silently; the format problem is
//! reported once by [`check_valid`]. An unparseable literal bound is not a
//! no-op -- no value satisfies it, so the rule fails.

use crate::coerce::Coerced;
use crate::context::ValidationContext;
use crate::schema::{Bound, CompareOp};
use crate::temporal::Temporal;
use serde::Serialize;
use std::fmt;

/// What went wrong, keyed to the host engine's message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// Input was not valid ISO-8601 text.
    Iso,
    /// Value was not strictly before the bound.
    Lt,
    /// Value was not strictly after the bound.
    Gt,
    /// Value was after the bound.
    Lte,
    /// Value was before the bound.
    Gte,
}

impl ViolationKind {
    /// Wire-contract error code the host's message templates key on.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Iso => "date.iso",
            ViolationKind::Lt => "luxon.lt",
            ViolationKind::Gt => "luxon.gt",
            ViolationKind::Lte => "luxon.lte",
            ViolationKind::Gte => "luxon.gte",
        }
    }
}

impl From<CompareOp> for ViolationKind {
    fn from(op: CompareOp) -> ViolationKind {
        match op {
            CompareOp::Lt => ViolationKind::Lt,
            CompareOp::Gt => ViolationKind::Gt,
            CompareOp::Lte => ViolationKind::Lte,
            CompareOp::Gte => ViolationKind::Gte,
        }
    }
}

/// A single reported failure for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Resolved bound the value was compared against (comparison kinds only),
    /// carried for message interpolation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<Temporal>,
    /// Raw text that failed ISO parsing: the input for format violations,
    /// or the literal bound for a comparison against unparseable bound text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Violation {
    fn comparison(kind: ViolationKind, bound: Temporal) -> Violation {
        Violation {
            kind,
            bound: Some(bound),
            raw: None,
        }
    }

    fn against_unparseable(kind: ViolationKind, raw: String) -> Violation {
        Violation {
            kind,
            bound: None,
            raw: Some(raw),
        }
    }

    fn invalid_format(raw: String) -> Violation {
        Violation {
            kind: ViolationKind::Iso,
            bound: None,
            raw: Some(raw),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.bound) {
            (ViolationKind::Iso, _) => write!(f, "must be a valid ISO 8601 date"),
            (ViolationKind::Lt, Some(bound)) => write!(f, "must be before {}", bound.to_iso()),
            (ViolationKind::Gt, Some(bound)) => write!(f, "must be after {}", bound.to_iso()),
            (ViolationKind::Lte, Some(bound)) => {
                write!(f, "must be same as or before {}", bound.to_iso())
            }
            (ViolationKind::Gte, Some(bound)) => {
                write!(f, "must be same as or after {}", bound.to_iso())
            }
            (kind, None) => f.write_str(kind.code()),
        }
    }
}

/// Result of running the full pipeline for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// The coerced value, clamped and truncated as configured.
    pub value: Coerced,
    /// All violations, in check order (validity first, then rules in
    /// attachment order). Collect-all policy; hosts may truncate.
    pub violations: Vec<Violation>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Report a format violation for input that never parsed.
///
/// Missing values pass -- optionality is the host engine's concern.
pub fn check_valid(value: &Coerced) -> Option<Violation> {
    match value {
        Coerced::Invalid { raw } => Some(Violation::invalid_format(raw.clone())),
        _ => None,
    }
}

/// Evaluate one comparison rule against an already-coerced value.
///
/// Passes without comparing when the value never became canonical (the
/// format error is reported once by [`check_valid`], not here) or when a
/// reference bound resolves to nothing (the rule is not actually active).
/// A literal text bound that fails to parse is different: no value can
/// satisfy it, so the rule reports its violation.
pub fn check_rule(
    op: CompareOp,
    bound: &Bound,
    value: &Coerced,
    ctx: &ValidationContext,
) -> Option<Violation> {
    let value = value.as_value()?;

    let bound = match bound {
        Bound::Text(text) => match Temporal::parse_iso(text) {
            Some(parsed) => parsed,
            None => return Some(Violation::against_unparseable(op.into(), text.clone())),
        },
        other => other.resolve(ctx)?,
    };

    let passes = match op {
        CompareOp::Lt => value < bound,
        CompareOp::Gt => value > bound,
        CompareOp::Lte => value <= bound,
        CompareOp::Gte => value >= bound,
    };

    if passes {
        None
    } else {
        Some(Violation::comparison(op.into(), bound))
    }
}
