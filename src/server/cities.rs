//! The `/cities` endpoint.

use std::sync::Arc;

use axum::extract::Query;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::City;
use crate::server::AppState;
use crate::sources::traits::{PollutionApi, SummaryApi};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// Query parameters of `GET /cities`.
///
/// Paging values arrive as strings so a malformed number surfaces as the
/// service's own `{error, code}` body instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CitiesQuery {
    pub country: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Response envelope of `GET /cities`.
#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub page: u32,
    pub limit: u32,
    /// Number of cities in this response, after filtering.
    pub total: usize,
    pub cities: Vec<City>,
}

#[tracing::instrument(level = "info", skip_all, fields(country = query.country.as_deref()))]
pub async fn get_cities<P, S>(
    Extension(state): Extension<Arc<AppState<P, S>>>,
    Query(query): Query<CitiesQuery>,
) -> Result<Json<CitiesResponse>>
where
    P: PollutionApi + 'static,
    S: SummaryApi + 'static,
{
    let page = parse_paging(query.page.as_deref(), "page", DEFAULT_PAGE)?;
    let limit = parse_paging(query.limit.as_deref(), "limit", DEFAULT_LIMIT)?;

    let cities = state
        .pipeline
        .get_polluted_cities(query.country.as_deref(), page, limit)
        .await?;

    Ok(Json(CitiesResponse {
        page,
        limit,
        total: cities.len(),
        cities,
    }))
}

fn parse_paging(raw: Option<&str>, name: &str, default: u32) -> Result<u32> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            Error::validation(format!("{name} must be a positive integer, got {value:?}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enricher::DescriptionEnricher;
    use crate::pipeline::{CitiesPipeline, NO_DESCRIPTION, SUPPORTED_COUNTRIES};
    use crate::sources::traits::mocks::{MockPollution, MockSummary};
    use crate::test_utils::mock_record;
    use std::time::Duration;

    fn state(
        pollution: MockPollution,
        summaries: MockSummary,
    ) -> Arc<AppState<MockPollution, MockSummary>> {
        let enricher = DescriptionEnricher::new(summaries, Duration::from_secs(3600));
        Arc::new(AppState::new(CitiesPipeline::new(pollution, enricher)))
    }

    fn query(country: Option<&str>, page: Option<&str>, limit: Option<&str>) -> CitiesQuery {
        CitiesQuery {
            country: country.map(String::from),
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_get_cities_returns_envelope() {
        let state = state(
            MockPollution::with_records(vec![mock_record("Warsaw"), mock_record("Kraków")]),
            MockSummary::empty(),
        );

        let Json(response) = get_cities(Extension(state), Query(query(Some("PL"), None, None)))
            .await
            .unwrap();

        assert_eq!(response.page, 1);
        assert_eq!(response.limit, 10);
        assert_eq!(response.total, 2);
        assert_eq!(response.cities.len(), 2);
        assert!(response.cities.iter().all(|c| c.description == NO_DESCRIPTION));
    }

    #[tokio::test]
    async fn test_get_cities_without_country_walks_all() {
        let state = state(
            MockPollution::with_records(vec![mock_record("Warsaw")]),
            MockSummary::empty(),
        );

        let Json(response) = get_cities(Extension(state), Query(query(None, None, None)))
            .await
            .unwrap();

        assert_eq!(response.total, SUPPORTED_COUNTRIES.len());
    }

    #[tokio::test]
    async fn test_get_cities_rejects_unknown_country() {
        let state = state(MockPollution::with_records(vec![]), MockSummary::empty());

        let result = get_cities(Extension(state), Query(query(Some("XX"), None, None))).await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_cities_rejects_malformed_paging() {
        let state = state(MockPollution::with_records(vec![]), MockSummary::empty());

        for (page, limit) in [(Some("abc"), None), (None, Some("-1")), (None, Some("101"))] {
            let result = get_cities(
                Extension(state.clone()),
                Query(query(Some("PL"), page, limit)),
            )
            .await;
            assert!(
                matches!(result, Err(Error::Validation(_))),
                "page={page:?} limit={limit:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_get_cities_honors_explicit_paging() {
        let records = ["Warsaw", "Kraków", "Gdańsk", "Poznań", "Wrocław", "Łódź"]
            .iter()
            .map(|name| mock_record(name))
            .collect();
        let state = state(MockPollution::with_records(records), MockSummary::empty());

        let Json(response) = get_cities(
            Extension(state),
            Query(query(Some("PL"), Some("2"), Some("3"))),
        )
        .await
        .unwrap();

        assert_eq!(response.page, 2);
        assert_eq!(response.limit, 3);
        assert!(response.total <= 3);
    }
}
