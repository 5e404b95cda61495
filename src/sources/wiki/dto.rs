//! Wiki summary API Data Transfer Objects
//!
//! These types match EXACTLY what the summary endpoint returns, trimmed to
//! the fields we read. The real payload carries many more fields
//! (thumbnails, coordinates, revision metadata); serde ignores them.
//! DO NOT use these types outside the wiki module.

use serde::Deserialize;

/// Summary response; only the intro text matters to us
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    /// Plain-text intro of the page, HTML entities included
    #[serde(default)]
    pub extract: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    /// A realistic response carries far more than we parse
    #[test]
    fn test_parse_full_summary_response() {
        let json = r#"{
            "type": "standard",
            "title": "Warsaw",
            "displaytitle": "<span>Warsaw</span>",
            "pageid": 33603,
            "lang": "en",
            "dir": "ltr",
            "timestamp": "2024-11-02T01:30:05Z",
            "description": "Capital of Poland",
            "extract": "Warsaw is the capital and largest city of Poland."
        }"#;

        let response: SummaryResponse =
            serde_json::from_str(json).expect("Should parse full summary");

        assert_eq!(
            response.extract.as_deref(),
            Some("Warsaw is the capital and largest city of Poland.")
        );
    }

    #[test]
    fn test_parse_summary_without_extract() {
        let response: SummaryResponse =
            serde_json::from_str(r#"{"title": "Warsaw"}"#).expect("Should parse without extract");

        assert!(response.extract.is_none());
    }
}
