//! The cities pipeline - fetch, filter, normalize, enrich.
//!
//! `CitiesPipeline` owns the whole journey from raw upstream measurements
//! to served `City` values:
//!
//! 1. Fetch one page of raw records from the pollution source
//! 2. Drop records the classifier rejects, counting reasons
//! 3. Normalize names, country codes and readings
//! 4. Attach descriptions, one summary lookup at a time
//!
//! Records are returned in upstream order; sorting belongs to callers.
//! Enrichment is deliberately sequential so a large page cannot fan out
//! into a burst of summary lookups.

use crate::cache::CacheStats;
use crate::classifier::{self, FilterStats};
use crate::enricher::DescriptionEnricher;
use crate::error::{Error, Result, ResultExt};
use crate::model::City;
use crate::sources::traits::{PollutionApi, SummaryApi};

/// Country codes the pollution source is known to serve.
pub const SUPPORTED_COUNTRIES: [&str; 4] = ["PL", "DE", "ES", "FR"];

/// Description served when enrichment finds nothing usable.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Orchestrates pollution fetches, classification and enrichment.
pub struct CitiesPipeline<P: PollutionApi, S: SummaryApi> {
    pollution: P,
    enricher: DescriptionEnricher<S>,
}

impl<P: PollutionApi, S: SummaryApi> CitiesPipeline<P, S> {
    pub fn new(pollution: P, enricher: DescriptionEnricher<S>) -> Self {
        Self {
            pollution,
            enricher,
        }
    }

    /// Fetch, clean and enrich one page of polluted cities.
    ///
    /// With a country code, serves that country's page; the code must be
    /// one of [`SUPPORTED_COUNTRIES`] (case-insensitive). Without one,
    /// walks every supported country and concatenates the results,
    /// logging and skipping countries whose fetch fails.
    pub async fn get_polluted_cities(
        &self,
        country: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<City>> {
        if page < 1 {
            return Err(Error::validation("page must be at least 1"));
        }
        if !(1..=100).contains(&limit) {
            return Err(Error::validation("limit must be between 1 and 100"));
        }

        match country {
            Some(raw) => {
                let code = normalize_country_code(raw)?;
                self.fetch_country(&code, page, limit).await
            }
            None => {
                let mut cities = Vec::new();
                for code in SUPPORTED_COUNTRIES {
                    match self.fetch_country(code, page, limit).await {
                        Ok(mut batch) => cities.append(&mut batch),
                        Err(err) => {
                            tracing::warn!(
                                country = code,
                                error = %err,
                                "skipping country after fetch failure"
                            );
                        }
                    }
                }
                Ok(cities)
            }
        }
    }

    async fn fetch_country(&self, country: &str, page: u32, limit: u32) -> Result<Vec<City>> {
        // Step 1: Pull one page of raw measurements
        let records = self.pollution.fetch_pollution(country, page, limit).await?;
        let fetched = records.len();

        // Step 2: Drop records that fail the city heuristics
        let mut stats = FilterStats::default();
        let mut keepers = Vec::new();
        for record in records {
            match classifier::check(&record, country) {
                Ok(()) => {
                    stats.note_accepted();
                    keepers.push(record);
                }
                Err(rejection) => {
                    tracing::debug!(reason = %rejection, "dropped pollution record");
                    stats.note_rejected(&rejection);
                }
            }
        }
        tracing::info!(
            country,
            fetched,
            accepted = stats.accepted,
            rejected = stats.rejected,
            reasons = %stats.summary(),
            "filtered pollution page"
        );

        // Step 3: Normalize names, country codes and readings
        let mut cities = Vec::new();
        for record in keepers {
            // `check` already proved both fields are present and usable
            let Some(name) = record.label() else { continue };
            let Some(pollution) = record.pollution_value() else {
                continue;
            };
            cities.push(City {
                name: collapse_whitespace(name),
                country: country_name(record.country.as_deref()),
                pollution,
                description: String::new(),
            });
        }

        // Step 4: Attach descriptions, one lookup at a time
        for city in &mut cities {
            city.description = self
                .enricher
                .describe(&city.name, &city.country)
                .await
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        }

        Ok(cities)
    }

    /// Cheap upstream liveness check against the pollution source.
    pub async fn probe_pollution(&self) -> Result<()> {
        self.pollution
            .fetch_pollution(SUPPORTED_COUNTRIES[0], 1, 1)
            .await
            .map(|_| ())
            .with_context("pollution probe failed")
    }

    /// Cheap upstream liveness check against the summary source.
    pub async fn probe_summaries(&self) -> Result<()> {
        self.enricher.probe().await.with_context("summary probe failed")
    }

    /// Counters of the description cache, for health reporting.
    pub fn cache_stats(&self) -> CacheStats {
        self.enricher.cache_stats()
    }

    /// Entries currently held in the description cache.
    pub fn cache_len(&self) -> usize {
        self.enricher.cache_len()
    }

    /// Sweep expired descriptions; returns how many were dropped.
    pub fn purge_expired_descriptions(&self) -> usize {
        self.enricher.purge_expired()
    }
}

/// Uppercase and validate a requested country code.
fn normalize_country_code(raw: &str) -> Result<String> {
    let code = raw.trim().to_uppercase();
    if SUPPORTED_COUNTRIES.contains(&code.as_str()) {
        Ok(code)
    } else {
        Err(Error::validation(format!(
            "unsupported country {raw:?}; expected one of {}",
            SUPPORTED_COUNTRIES.join(", ")
        )))
    }
}

/// Full display name for a record's country code. Unknown codes pass
/// through untouched; a missing code becomes "Unknown".
fn country_name(code: Option<&str>) -> String {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return "Unknown".to_string();
    };
    match code.to_uppercase().as_str() {
        "PL" => "Poland".to_string(),
        "DE" => "Germany".to_string(),
        "ES" => "Spain".to_string(),
        "FR" => "France".to_string(),
        _ => code.to_string(),
    }
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}
