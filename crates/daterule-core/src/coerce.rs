//! Coercion stage -- loosely-typed input to canonical temporal value.
//!
//! `coerce` is a total function: absent input and malformed text are
//! first-class outcomes ([`Coerced::Missing`], [`Coerced::Invalid`]), never
//! errors or panics. Transformations run in a fixed order: zone assignment,
//! start/end-of-period truncation, then min/max clamping. Comparison rules
//! always see the already-clamped value.

use crate::context::ValidationContext;
use crate::schema::DateSchema;
use crate::temporal::Temporal;

/// Raw input as handed over by the host engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// No value present. Optionality is the host's concern, not an error.
    Missing,
    /// Text to be parsed as ISO-8601.
    Text(String),
    /// An already canonical value, passed through unparsed.
    Value(Temporal),
}

impl From<&str> for Input {
    fn from(text: &str) -> Input {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Input {
        Input::Text(text)
    }
}

impl From<Temporal> for Input {
    fn from(value: Temporal) -> Input {
        Input::Value(value)
    }
}

/// Outcome of the coercion stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Input was absent (or blank text); later rules pass it through.
    Missing,
    /// Input could not be parsed as ISO-8601; carries the raw text for the
    /// validity check to report.
    Invalid { raw: String },
    /// A canonical value with all configured transformations applied.
    Valid(Temporal),
}

impl Coerced {
    /// The canonical value, when there is one.
    pub fn as_value(&self) -> Option<Temporal> {
        match self {
            Coerced::Valid(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Coerced::Missing)
    }
}

/// Normalize a raw input against a field schema.
///
/// Steps, in order: parse (unless already canonical), resolve min/max
/// bounds, assign zone (schema flag, else context default, else keep the
/// value's own zone), truncate (`start_of` then `end_of`), clamp.
pub fn coerce(input: &Input, schema: &DateSchema, ctx: &ValidationContext) -> Coerced {
    let mut value = match input {
        Input::Missing => return Coerced::Missing,
        Input::Text(text) if text.trim().is_empty() => return Coerced::Missing,
        Input::Text(text) => match Temporal::parse_iso(text) {
            Some(value) => value,
            // Malformed text passes through untransformed; the validity
            // check reports it exactly once.
            None => return Coerced::Invalid { raw: text.clone() },
        },
        Input::Value(value) => *value,
    };

    let min = schema.min.as_ref().and_then(|bound| bound.resolve(ctx));
    let max = schema.max.as_ref().and_then(|bound| bound.resolve(ctx));

    if let Some(zone) = schema.timezone {
        value = value.set_zone(zone);
    } else if let Some(zone) = ctx.timezone() {
        value = value.set_zone(zone);
    }

    // startOf runs before endOf; when both are configured the endOf
    // truncation is the one that sticks.
    if let Some(unit) = schema.start_of {
        value = value.start_of(unit);
    }
    if let Some(unit) = schema.end_of {
        value = value.end_of(unit);
    }

    // Clamp instead of reject. A clamped value lands exactly on the bound,
    // so it still satisfies `gte(min)`/`lte(max)` but not the strict rules.
    if let Some(min) = min {
        if value < min {
            value = min;
        }
    }
    if let Some(max) = max {
        if value > max {
            value = max;
        }
    }

    Coerced::Valid(value)
}
