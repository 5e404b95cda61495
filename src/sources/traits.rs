//! Trait definitions for external API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.
//!
//! # Example
//!
//! ```ignore
//! use airsift::sources::traits::PollutionApi;
//!
//! // In production code:
//! async fn first_page<T: PollutionApi>(client: &T) -> Result<Vec<RawRecord>> {
//!     client.fetch_pollution("PL", 1, 50).await
//! }
//!
//! // In tests:
//! let mock = mocks::MockPollution::with_records(vec![...]);
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::model::RawRecord;

/// Trait for the authenticated pollution data source.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait PollutionApi: Send + Sync {
    /// Fetch one page of raw records for a country.
    async fn fetch_pollution(&self, country: &str, page: u32, limit: u32)
        -> Result<Vec<RawRecord>>;
}

/// Trait for the wiki summary source.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Fetch the summary extract for a term; `Ok(None)` means not found.
    async fn fetch_summary(&self, term: &str) -> Result<Option<String>>;
}

// Implement traits for real clients

#[async_trait]
impl PollutionApi for super::pollution::PollutionClient {
    async fn fetch_pollution(
        &self,
        country: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawRecord>> {
        self.fetch_pollution(country, page, limit).await
    }
}

#[async_trait]
impl SummaryApi for super::wiki::WikiClient {
    async fn fetch_summary(&self, term: &str) -> Result<Option<String>> {
        self.fetch_summary(term).await
    }
}
