//! Ambient validation context -- sibling fields and default settings.
//!
//! Cross-field bounds resolve against the field map here; the optional
//! default timezone applies when a schema sets no zone flag of its own.
//! The context is plain data passed explicitly into every validation call,
//! never captured.

use crate::temporal::Temporal;
use chrono_tz::Tz;
use std::collections::HashMap;

/// Validation-time state shared by every rule evaluated for one record.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    fields: HashMap<String, Temporal>,
    timezone: Option<Tz>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ambient default timezone. A schema's own `set_zone` flag
    /// takes precedence over this.
    pub fn with_timezone(mut self, zone: Tz) -> Self {
        self.timezone = Some(zone);
        self
    }

    /// Record a sibling field's coerced value for reference resolution.
    pub fn with_field(mut self, name: impl Into<String>, value: Temporal) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Resolve a sibling field by name.
    pub fn field(&self, name: &str) -> Option<Temporal> {
        self.fields.get(name).copied()
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }
}
