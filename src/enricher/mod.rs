//! Description enrichment - attaches a short textual description to each
//! validated city.
//!
//! Lookups walk a ladder of increasingly loose terms:
//! 1. `"{city}, {country}"`
//! 2. `"{city}"`
//! 3. `"{city} ({country})"`
//!
//! The first term that yields a non-empty summary wins. Summaries are
//! post-processed (HTML entities decoded, truncated to the first sentence
//! or 200 characters) and memoized per `(city, country)` in a TTL cache.
//!
//! A clean "no such page" outcome is cached too, so cities without an
//! article don't hammer the summary source on every request. Transport
//! failures are never cached; a flaky source can recover before the TTL
//! runs out.

use crate::cache::{CacheStats, TtlCache};
use crate::error::Result;
use crate::sources::traits::SummaryApi;
use std::time::Duration;

/// Descriptions longer than this are cut at a word boundary.
const MAX_DESCRIPTION_CHARS: usize = 200;

/// A page title that always exists, used by [`DescriptionEnricher::probe`].
const PROBE_TERM: &str = "Earth";

/// Enriches cities with descriptions from a summary source.
pub struct DescriptionEnricher<S: SummaryApi> {
    summaries: S,
    cache: TtlCache<(String, String), Option<String>>,
}

impl<S: SummaryApi> DescriptionEnricher<S> {
    /// Create an enricher whose cached descriptions live for `ttl`.
    /// Zero keeps them forever.
    pub fn new(summaries: S, ttl: Duration) -> Self {
        Self {
            summaries,
            cache: TtlCache::new(ttl),
        }
    }

    /// Look up a description for a city.
    ///
    /// `None` means no usable summary was found; the caller supplies its
    /// own fallback text. Lookup failures are logged and degrade to
    /// `None` rather than failing the batch.
    pub async fn describe(&self, city: &str, country: &str) -> Option<String> {
        let key = (city.to_string(), country.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let mut transport_failure = false;
        for term in lookup_terms(city, country) {
            match self.summaries.fetch_summary(&term).await {
                Ok(Some(extract)) => {
                    let cleaned = clean_summary(&extract);
                    if !cleaned.is_empty() {
                        self.cache.insert(key, Some(cleaned.clone()));
                        return Some(cleaned);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    transport_failure = true;
                    tracing::warn!(term = %term, error = %err, "summary lookup failed");
                }
            }
        }

        // Only a clean miss is worth remembering.
        if !transport_failure {
            self.cache.insert(key, None);
        }
        None
    }

    /// One uncached lookup against the summary source, for liveness
    /// checks. A miss still proves the source is answering.
    pub async fn probe(&self) -> Result<()> {
        self.summaries.fetch_summary(PROBE_TERM).await.map(|_| ())
    }

    /// Counters of the description cache, for health reporting.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Entries currently held, for health reporting.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Sweep expired descriptions; returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }
}

/// Lookup terms in order of specificity.
fn lookup_terms(city: &str, country: &str) -> [String; 3] {
    [
        format!("{city}, {country}"),
        city.to_string(),
        format!("{city} ({country})"),
    ]
}

/// Decode entities and shorten a raw summary for display.
fn clean_summary(raw: &str) -> String {
    let decoded = htmlescape::decode_html(raw).unwrap_or_else(|_| raw.to_string());
    let text = decoded.trim();

    if let Some(sentence) = first_sentence(text) {
        if sentence.chars().count() < MAX_DESCRIPTION_CHARS {
            return sentence.to_string();
        }
    }
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text.to_string();
    }
    truncate_at_word_boundary(text, MAX_DESCRIPTION_CHARS)
}

/// The text up to and including the first sentence-ending period.
fn first_sentence(text: &str) -> Option<&str> {
    text.find(". ")
        .map(|idx| &text[..=idx])
        .or_else(|| text.ends_with('.').then_some(text))
}

/// Cut to at most `max_chars`, backing up to the last whitespace so no
/// word is split, and append an ellipsis.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let hard: String = text.chars().take(max_chars).collect();
    let cut = match hard.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &hard[..idx],
        _ => hard.as_str(),
    };
    format!("{}…", cut.trim_end())
}
