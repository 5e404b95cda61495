//! Core data models for the cities service.
//!
//! Defines the two shapes a record passes through: [`RawRecord`] as it
//! arrives from the pollution API (untrusted, loosely typed) and [`City`]
//! as it leaves this service (validated, normalized, enriched).
//!
//! Parsing tolerance lives here, in one place: the upstream sometimes
//! labels the city field `name` and sometimes `city`, and sometimes sends
//! pollution as a quoted string. Everything downstream of serde works with
//! an already-shaped record.

use serde::{Deserialize, Serialize};

/// A pollution value as the upstream sends it: a number or a quoted number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PollutionReading {
    Number(f64),
    Text(String),
}

impl PollutionReading {
    /// Coerce to a float. Text readings are trimmed and parsed; anything
    /// unparseable is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// One record from the pollution API, before any validation.
///
/// All fields are optional because the upstream omits or misnames them
/// freely. The classifier decides what survives.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// City label; the upstream uses `name` or `city` interchangeably
    #[serde(alias = "city")]
    pub name: Option<String>,
    /// Country label as sent (usually an ISO-ish code)
    pub country: Option<String>,
    /// Pollution level, nominally 0..=200
    pub pollution: Option<PollutionReading>,
}

impl RawRecord {
    /// The city label with surrounding whitespace removed, if present and
    /// non-empty.
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The pollution value coerced to a float, if present and parseable.
    pub fn pollution_value(&self) -> Option<f64> {
        self.pollution.as_ref().and_then(PollutionReading::as_f64)
    }
}

/// A validated, normalized, enriched city as served to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    /// Cleaned display name
    pub name: String,
    /// Full country name (e.g. "Poland", not "PL")
    pub country: String,
    /// Pollution level
    pub pollution: f64,
    /// Short description, or the fallback sentinel
    pub description: String,
}
