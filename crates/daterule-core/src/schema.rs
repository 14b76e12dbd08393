//! Per-field schema configuration and its chaining builder.
//!
//! A [`DateSchema`] is built once (flags plus an ordered list of comparison
//! rules) and treated as immutable during validation. Bounds stay unresolved
//! until validation time -- a field reference is resolved against the
//! [`ValidationContext`] on every call, never captured at build time.

use crate::coerce::{coerce, Input};
use crate::context::ValidationContext;
use crate::error::{Result, SchemaError};
use crate::rules::{check_rule, check_valid, Validation};
use crate::temporal::{Temporal, Unit};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Comparison operator for an attached rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Lt,
    Gt,
    Lte,
    Gte,
}

/// A comparison or clamp target, resolved at validation time.
///
/// Literal forms (`Text`, `Value`, `Instant`) resolve to themselves;
/// `FieldRef` resolves against the current record's field map. A reference
/// that resolves to nothing deactivates the consuming rule; unparseable
/// literal text is ignored by clamping but fails a comparison rule, since
/// no value can satisfy it.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// ISO-8601 text, parsed at resolution time.
    Text(String),
    /// An already canonical value.
    Value(Temporal),
    /// A native chrono instant.
    Instant(DateTime<Utc>),
    /// Reference to a sibling field in the same record.
    FieldRef(String),
}

impl Bound {
    pub fn field_ref(name: impl Into<String>) -> Bound {
        Bound::FieldRef(name.into())
    }

    /// Resolve to a concrete value, or `None` when the bound is inactive
    /// (absent field, unparseable text). Comparison rules treat unparseable
    /// literal text separately; see [`check_rule`](crate::rules::check_rule).
    pub fn resolve(&self, ctx: &ValidationContext) -> Option<Temporal> {
        match self {
            Bound::Text(text) => Temporal::parse_iso(text),
            Bound::Value(value) => Some(*value),
            Bound::Instant(instant) => Some(Temporal::from_utc(*instant)),
            Bound::FieldRef(name) => ctx.field(name),
        }
    }
}

impl From<&str> for Bound {
    fn from(text: &str) -> Bound {
        Bound::Text(text.to_string())
    }
}

impl From<String> for Bound {
    fn from(text: String) -> Bound {
        Bound::Text(text)
    }
}

impl From<Temporal> for Bound {
    fn from(value: Temporal) -> Bound {
        Bound::Value(value)
    }
}

impl From<DateTime<Utc>> for Bound {
    fn from(instant: DateTime<Utc>) -> Bound {
        Bound::Instant(instant)
    }
}

// JSON shape: a plain string is a literal, `{"ref": "field"}` is a reference.
impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Bound::Text(text) => serializer.serialize_str(text),
            Bound::Value(value) => value.serialize(serializer),
            Bound::Instant(instant) => serializer.serialize_str(&instant.to_rfc3339()),
            Bound::FieldRef(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("ref", name)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Ref {
                #[serde(rename = "ref")]
                name: String,
            },
            Literal(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Ref { name } => Bound::FieldRef(name),
            Repr::Literal(text) => Bound::Text(text),
        })
    }
}

/// One attached comparison rule: operator plus unresolved bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRule {
    pub op: CompareOp,
    #[serde(rename = "date")]
    pub bound: Bound,
}

/// Date handling configuration for a single field.
///
/// Flags feed the coercion stage; `rules` run afterwards in attachment
/// order. Deserializable from JSON using the rule names schema authors see
/// (`timezone`, `startOf`, `endOf`, `min`, `max`, `rules`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timezone: Option<Tz>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) start_of: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) end_of: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) min: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max: Option<Bound>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) rules: Vec<CompareRule>,
}

impl DateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert coerced values into `zone` (IANA name). Overrides any ambient
    /// context timezone.
    ///
    /// # Errors
    /// Returns [`SchemaError::InvalidTimezone`] for an unknown zone name.
    pub fn set_zone(mut self, zone: &str) -> Result<Self> {
        let tz: Tz = zone
            .parse()
            .map_err(|_| SchemaError::InvalidTimezone(zone.to_string()))?;
        self.timezone = Some(tz);
        Ok(self)
    }

    /// Snap coerced values down to the start of `unit`.
    pub fn start_of(mut self, unit: Unit) -> Self {
        self.start_of = Some(unit);
        self
    }

    /// Snap coerced values up to the end of `unit`. Applied after `start_of`
    /// when both are set, so this truncation is the one that sticks.
    pub fn end_of(mut self, unit: Unit) -> Self {
        self.end_of = Some(unit);
        self
    }

    /// Clamp coerced values to be no earlier than `bound`.
    pub fn min(mut self, bound: impl Into<Bound>) -> Self {
        self.min = Some(bound.into());
        self
    }

    /// Clamp coerced values to be no later than `bound`.
    pub fn max(mut self, bound: impl Into<Bound>) -> Self {
        self.max = Some(bound.into());
        self
    }

    /// Require the value to be strictly before `date`.
    pub fn lt(self, date: impl Into<Bound>) -> Self {
        self.rule(CompareOp::Lt, date)
    }

    /// Require the value to be strictly after `date`.
    pub fn gt(self, date: impl Into<Bound>) -> Self {
        self.rule(CompareOp::Gt, date)
    }

    /// Require the value to be the same as or before `date`.
    pub fn lte(self, date: impl Into<Bound>) -> Self {
        self.rule(CompareOp::Lte, date)
    }

    /// Require the value to be the same as or after `date`.
    pub fn gte(self, date: impl Into<Bound>) -> Self {
        self.rule(CompareOp::Gte, date)
    }

    fn rule(mut self, op: CompareOp, bound: impl Into<Bound>) -> Self {
        self.rules.push(CompareRule {
            op,
            bound: bound.into(),
        });
        self
    }

    /// Run the full pipeline for one field: coerce, validity-check, then
    /// every attached rule in order, collecting all violations.
    pub fn validate(&self, input: &Input, ctx: &ValidationContext) -> Validation {
        let value = coerce(input, self, ctx);

        let mut violations = Vec::new();
        violations.extend(check_valid(&value));
        for rule in &self.rules {
            violations.extend(check_rule(rule.op, &rule.bound, &value, ctx));
        }

        Validation { value, violations }
    }
}
