//! Heuristic classification of raw pollution records into real cities.
//!
//! The upstream feed mixes genuine cities with measurement-station labels,
//! zone identifiers and outright corrupted strings. [`check`] runs a fixed,
//! ordered set of conjunctive rules; failing any single rule rejects the
//! record with the first matching [`Rejection`]. There is no scoring or
//! partial credit.
//!
//! The rule set is deliberately false-negative-tolerant: a real city whose
//! name happens to carry a blacklisted token (say, "North Las Vegas") is
//! sacrificed to suppress known sensor noise. Every list and pattern below
//! is policy; changing one is a classification policy change, not a bug
//! fix.

use crate::model::RawRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Name length bounds in characters, applied after trimming.
const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 50;

/// Pollution bounds, inclusive.
const MIN_POLLUTION: f64 = 0.0;
const MAX_POLLUTION: f64 = 200.0;

/// Standalone tokens that mark a label as infrastructure, not a city.
/// Matched whole-word and case-insensitive, so "Eastwood" survives "east".
const STOP_WORDS: &[&str] = &[
    // measurement infrastructure
    "zone",
    "area",
    "station",
    "plant",
    "monitoring",
    "district",
    "sensor",
    "site",
    "sector",
    "grid",
    "measurement",
    // compass labels on split sensors
    "north",
    "south",
    "east",
    "west",
    "central",
    // placeholder data
    "test",
    "unknown",
    "sample",
];

/// Previously observed corrupted labels, matched as case-insensitive
/// substrings.
const CORRUPTED_LABELS: &[&str] = &[
    "n/a",
    "null",
    "undefined",
    "placeholder",
    "dummy",
    "asdf",
    "qwerty",
    "xxx",
];

/// Any embedded digit
static DIGIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d").expect("Invalid digit regex"));

/// Byte sequences left behind by UTF-8 text decoded as Latin-1
static MOJIBAKE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("Ã|Â|â€|ï¿|\u{FFFD}").expect("Invalid mojibake regex"));

/// Parenthetical sensor-type suffixes like "Berlin (District)"
static PARENTHETICAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\((district|station|zone|area|sensor)\)")
        .expect("Invalid parenthetical regex")
});

/// Known word pairs from split sensor labels, in either order
static ADJACENT_PAIR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(power[\s-]+east|east[\s-]+power|monitoring[\s-]+station|station[\s-]+monitoring)\b")
        .expect("Invalid adjacent pair regex")
});

/// Latin letters (incl. accents), spaces, hyphens, apostrophes, dots,
/// parentheses. Anything else suggests mixed-script corruption.
static CHARSET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Latin}\s\-'’.()]+$").expect("Invalid charset regex"));

/// Why a record was rejected. The first failing rule wins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("name is missing or blank")]
    MissingName,

    #[error("name length {0} outside {MIN_NAME_CHARS}..={MAX_NAME_CHARS}")]
    BadLength(usize),

    #[error("name contains non-city term {0:?}")]
    StopWord(String),

    #[error("name matches known corrupted label {0:?}")]
    CorruptedLabel(&'static str),

    #[error("name matches corruption pattern ({0})")]
    CorruptionPattern(&'static str),

    #[error("name contains characters outside the allowed set")]
    Charset,

    #[error("name has no alphabetic characters")]
    NoAlphabetic,

    #[error("pollution value missing or unparseable")]
    MissingPollution,

    #[error("pollution {0} not a finite value in {MIN_POLLUTION}..={MAX_POLLUTION}")]
    PollutionOutOfRange(f64),
}

impl Rejection {
    /// Stable label for counters and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::BadLength(_) => "bad_length",
            Self::StopWord(_) => "stop_word",
            Self::CorruptedLabel(_) => "corrupted_label",
            Self::CorruptionPattern(_) => "corruption_pattern",
            Self::Charset => "charset",
            Self::NoAlphabetic => "no_alphabetic",
            Self::MissingPollution => "missing_pollution",
            Self::PollutionOutOfRange(_) => "pollution_out_of_range",
        }
    }
}

/// Decide whether a raw record denotes a genuine city.
///
/// Pure and deterministic: same record, same verdict. Rules run in a fixed
/// order and the first failure is returned. `country` is the code the
/// record was fetched under; it never sways the verdict and only feeds
/// the rejection trace.
pub fn check(record: &RawRecord, country: &str) -> Result<(), Rejection> {
    let verdict = evaluate(record);
    if let Err(rejection) = &verdict {
        tracing::trace!(
            country,
            name = record.name.as_deref(),
            reason = %rejection,
            "record failed city heuristics"
        );
    }
    verdict
}

/// Yes/no facade over [`check`] for callers that don't need the reason.
pub fn is_valid_city(record: &RawRecord, country: &str) -> bool {
    check(record, country).is_ok()
}

/// The rule ladder itself, first failure wins.
fn evaluate(record: &RawRecord) -> Result<(), Rejection> {
    let Some(name) = record.label() else {
        return Err(Rejection::MissingName);
    };

    let char_count = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&char_count) {
        return Err(Rejection::BadLength(char_count));
    }

    if let Some(word) = tokens(name).find(|t| STOP_WORDS.contains(&t.as_str())) {
        return Err(Rejection::StopWord(word));
    }

    let lowered = name.to_lowercase();
    if let Some(label) = CORRUPTED_LABELS.iter().find(|l| lowered.contains(**l)) {
        return Err(Rejection::CorruptedLabel(label));
    }

    if DIGIT_PATTERN.is_match(name) {
        return Err(Rejection::CorruptionPattern("embedded digits"));
    }
    if MOJIBAKE_PATTERN.is_match(name) {
        return Err(Rejection::CorruptionPattern("mangled encoding"));
    }
    if PARENTHETICAL_PATTERN.is_match(name) {
        return Err(Rejection::CorruptionPattern("sensor suffix"));
    }
    if ADJACENT_PAIR_PATTERN.is_match(name) {
        return Err(Rejection::CorruptionPattern("sensor word pair"));
    }

    if !CHARSET_PATTERN.is_match(name) {
        return Err(Rejection::Charset);
    }

    if !name.chars().any(char::is_alphabetic) {
        return Err(Rejection::NoAlphabetic);
    }

    match record.pollution_value() {
        None => Err(Rejection::MissingPollution),
        Some(value) if !value.is_finite() || !(MIN_POLLUTION..=MAX_POLLUTION).contains(&value) => {
            Err(Rejection::PollutionOutOfRange(value))
        }
        Some(_) => Ok(()),
    }
}

/// Lowercased whole words of a label. Any non-letter is a separator, so
/// "PowerPlant-East" yields ["powerplant", "east"].
fn tokens(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Per-batch accounting of classifier outcomes for the pipeline summary
/// log line.
#[derive(Debug, Clone, Default)]
pub struct FilterStats {
    pub accepted: usize,
    pub rejected: usize,
    by_reason: BTreeMap<&'static str, usize>,
}

impl FilterStats {
    pub fn note_accepted(&mut self) {
        self.accepted += 1;
    }

    pub fn note_rejected(&mut self, rejection: &Rejection) {
        self.rejected += 1;
        *self.by_reason.entry(rejection.label()).or_insert(0) += 1;
    }

    /// Compact "reason:count" summary, deterministic order.
    pub fn summary(&self) -> String {
        if self.by_reason.is_empty() {
            return "none".to_string();
        }
        self.by_reason
            .iter()
            .map(|(reason, count)| format!("{reason}:{count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PollutionReading;

    fn record(name: &str, pollution: f64) -> RawRecord {
        RawRecord {
            name: Some(name.to_string()),
            country: Some("PL".to_string()),
            pollution: Some(PollutionReading::Number(pollution)),
        }
    }

    #[test]
    fn test_accepts_known_good_cities() {
        for name in ["Kraków", "Warsaw", "Hamburg", "Łódź", "Aix-en-Provence", "L'Aquila"] {
            assert!(check(&record(name, 42.0), "PL").is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn test_rejects_known_bad_labels() {
        for name in [
            "Unknown Area 22",
            "PowerPlant-East",
            "Monitoring Station A",
            "Berlin (District)",
        ] {
            assert!(check(&record(name, 42.0), "PL").is_err(), "accepted {name}");
        }
    }

    #[test]
    fn test_case_insensitive_and_deterministic() {
        assert!(is_valid_city(&record("BARCELONA", 10.0), "PL"));
        assert!(is_valid_city(&record("barcelona", 10.0), "PL"));

        let upper_bad = is_valid_city(&record("MONITORING POST", 10.0), "PL");
        let lower_bad = is_valid_city(&record("monitoring post", 10.0), "PL");
        assert_eq!(upper_bad, lower_bad);
        assert!(!upper_bad);
    }

    #[test]
    fn test_country_never_changes_the_verdict() {
        // The fetch country rides along for log context only
        for country in ["PL", "de", "??", ""] {
            assert!(is_valid_city(&record("Warsaw", 10.0), country));
            assert!(!is_valid_city(&record("Monitoring Station A", 10.0), country));
        }
    }

    #[test]
    fn test_stop_words_match_whole_tokens_only() {
        // "east" embedded in a longer word is not a hit
        assert!(check(&record("Eastwood", 10.0), "PL").is_ok());
        assert_eq!(
            check(&record("East Berlin", 10.0), "PL"),
            Err(Rejection::StopWord("east".to_string()))
        );
    }

    #[test]
    fn test_hyphen_splits_tokens() {
        assert_eq!(
            check(&record("PowerPlant-East", 10.0), "PL"),
            Err(Rejection::StopWord("east".to_string()))
        );
    }

    #[test]
    fn test_corrupted_label_substring() {
        assert_eq!(
            check(&record("Warsaw dummy feed", 10.0), "PL"),
            Err(Rejection::CorruptedLabel("dummy"))
        );
    }

    #[test]
    fn test_embedded_digits_rejected() {
        assert_eq!(
            check(&record("B4rcelona", 10.0), "PL"),
            Err(Rejection::CorruptionPattern("embedded digits"))
        );
    }

    #[test]
    fn test_mojibake_rejected_but_real_accents_pass() {
        // UTF-8 "Kraków" decoded as Latin-1
        assert_eq!(
            check(&record("KrakÃ³w", 10.0), "PL"),
            Err(Rejection::CorruptionPattern("mangled encoding"))
        );
        // genuine accented names are untouched
        assert!(check(&record("São Paulo", 10.0), "PL").is_ok());
        assert!(check(&record("Châteauroux", 10.0), "PL").is_ok());
    }

    #[test]
    fn test_sensor_word_pair_pattern() {
        // In check() the standalone vocab hit fires first; the pair
        // pattern is the backstop and must match in either order.
        assert!(ADJACENT_PAIR_PATTERN.is_match("Power East"));
        assert!(ADJACENT_PAIR_PATTERN.is_match("east-power"));
        assert!(ADJACENT_PAIR_PATTERN.is_match("Monitoring Station"));
        assert!(ADJACENT_PAIR_PATTERN.is_match("Station Monitoring"));
        assert!(!ADJACENT_PAIR_PATTERN.is_match("Eastwood Powers"));

        assert_eq!(
            check(&record("Power East", 10.0), "PL"),
            Err(Rejection::StopWord("east".to_string()))
        );
    }

    #[test]
    fn test_parenthetical_suffix_pattern() {
        assert!(PARENTHETICAL_PATTERN.is_match("Berlin (District)"));
        assert!(PARENTHETICAL_PATTERN.is_match("Madrid (sensor)"));
        assert!(!PARENTHETICAL_PATTERN.is_match("Frankfurt (Oder)"));
    }

    #[test]
    fn test_charset_rejects_other_scripts() {
        assert_eq!(check(&record("Москва", 10.0), "PL"), Err(Rejection::Charset));
        assert_eq!(check(&record("北京", 10.0), "PL"), Err(Rejection::Charset));
    }

    #[test]
    fn test_punctuation_only_name_rejected() {
        assert_eq!(check(&record("---", 10.0), "PL"), Err(Rejection::NoAlphabetic));
    }

    #[test]
    fn test_name_length_bounds() {
        assert_eq!(check(&record("X", 10.0), "PL"), Err(Rejection::BadLength(1)));
        assert!(check(&record("Ur", 10.0), "PL").is_ok());

        let long = "a".repeat(51);
        assert_eq!(check(&record(&long, 10.0), "PL"), Err(Rejection::BadLength(51)));
        let max = "a".repeat(50);
        assert!(check(&record(&max, 10.0), "PL").is_ok());
    }

    #[test]
    fn test_missing_name_rejected() {
        let record = RawRecord {
            name: None,
            country: Some("PL".to_string()),
            pollution: Some(PollutionReading::Number(10.0)),
        };
        assert_eq!(check(&record, "PL"), Err(Rejection::MissingName));
    }

    #[test]
    fn test_pollution_bounds_inclusive() {
        assert!(check(&record("Warsaw", 0.0), "PL").is_ok());
        assert!(check(&record("Warsaw", 200.0), "PL").is_ok());
        assert!(matches!(
            check(&record("Warsaw", -0.1), "PL"),
            Err(Rejection::PollutionOutOfRange(_))
        ));
        assert!(matches!(
            check(&record("Warsaw", 200.1), "PL"),
            Err(Rejection::PollutionOutOfRange(_))
        ));
    }

    #[test]
    fn test_pollution_missing_or_textual() {
        let missing = RawRecord {
            name: Some("Warsaw".to_string()),
            ..Default::default()
        };
        assert_eq!(check(&missing, "PL"), Err(Rejection::MissingPollution));

        let textual = RawRecord {
            name: Some("Warsaw".to_string()),
            pollution: Some(PollutionReading::Text("high".to_string())),
            ..Default::default()
        };
        assert_eq!(check(&textual, "PL"), Err(Rejection::MissingPollution));

        let numeric_text = RawRecord {
            name: Some("Warsaw".to_string()),
            pollution: Some(PollutionReading::Text("42".to_string())),
            ..Default::default()
        };
        assert!(check(&numeric_text, "PL").is_ok());
    }

    #[test]
    fn test_non_finite_pollution_rejected() {
        let nan = RawRecord {
            name: Some("Warsaw".to_string()),
            pollution: Some(PollutionReading::Text("NaN".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            check(&nan, "PL"),
            Err(Rejection::PollutionOutOfRange(_))
        ));
    }

    #[test]
    fn test_filter_stats_summary() {
        let mut stats = FilterStats::default();
        stats.note_accepted();
        stats.note_rejected(&Rejection::StopWord("zone".to_string()));
        stats.note_rejected(&Rejection::StopWord("area".to_string()));
        stats.note_rejected(&Rejection::Charset);

        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 3);
        assert_eq!(stats.summary(), "charset:1, stop_word:2");
    }

    #[test]
    fn test_empty_stats_summary() {
        assert_eq!(FilterStats::default().summary(), "none");
    }
}
