//! Test utilities and fixtures for airsift tests.
//!
//! This module provides record and city factories to reduce boilerplate
//! in tests.
//!
//! # Example
//!
//! ```ignore
//! use airsift::test_utils::{mock_record, mock_city};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let record = mock_record("Warsaw");
//!     // ... test logic
//! }
//! ```

use crate::model::{City, PollutionReading, RawRecord};

/// Creates a RawRecord with sensible defaults: a Polish city with a
/// plausible numeric reading.
///
/// Use struct update syntax to customize:
///
/// ```ignore
/// let record = RawRecord {
///     pollution: None,
///     ..mock_record("Warsaw")
/// };
/// ```
pub fn mock_record(name: &str) -> RawRecord {
    RawRecord {
        name: Some(name.to_string()),
        country: Some("PL".to_string()),
        pollution: Some(PollutionReading::Number(42.5)),
    }
}

/// Creates a RawRecord for the given country code.
pub fn mock_record_in(name: &str, country: &str) -> RawRecord {
    RawRecord {
        country: Some(country.to_string()),
        ..mock_record(name)
    }
}

/// Creates a RawRecord with the given numeric reading.
pub fn mock_record_with_pollution(name: &str, pollution: f64) -> RawRecord {
    RawRecord {
        pollution: Some(PollutionReading::Number(pollution)),
        ..mock_record(name)
    }
}

/// Creates a fully populated City with sensible defaults.
pub fn mock_city(name: &str) -> City {
    City {
        name: name.to_string(),
        country: "Poland".to_string(),
        pollution: 42.5,
        description: "A test city.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_record_defaults() {
        let record = mock_record("Warsaw");
        assert_eq!(record.label(), Some("Warsaw"));
        assert_eq!(record.country.as_deref(), Some("PL"));
        assert_eq!(record.pollution_value(), Some(42.5));
    }

    #[test]
    fn test_mock_record_in_overrides_country() {
        let record = mock_record_in("Hamburg", "DE");
        assert_eq!(record.country.as_deref(), Some("DE"));
        assert_eq!(record.label(), Some("Hamburg"));
    }

    #[test]
    fn test_mock_record_with_pollution_overrides_reading() {
        let record = mock_record_with_pollution("Warsaw", 180.0);
        assert_eq!(record.pollution_value(), Some(180.0));
    }

    #[test]
    fn test_mock_city_defaults() {
        let city = mock_city("Warsaw");
        assert_eq!(city.name, "Warsaw");
        assert_eq!(city.country, "Poland");
        assert!(!city.description.is_empty());
    }
}
