#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Resolves free-text UK locations (postcodes or town names) to
//! coordinates.
//!
//! Two providers are tried in order:
//!
//! 1. **postcodes.io**: structured lookup, exact for valid postcodes.
//! 2. **Nominatim / `OpenStreetMap`**: free-text search restricted to
//!    Great Britain, best match only.
//!
//! Any failure of the first stage (network error, non-2xx status after
//! retries, malformed or empty payload) falls through to the second. No
//! results are cached; each call performs fresh network I/O.

pub mod nominatim;
pub mod postcodes;

use guardian_crime_models::Coordinate;
use guardian_fetch::service_registry::{Endpoints, ServiceDefinition};
use guardian_fetch::{FetchError, HttpClient};
use thiserror::Error;

/// A resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    /// Resolved point.
    pub coordinate: Coordinate,
    /// Which provider resolved it.
    pub provider: GeocodingProvider,
    /// Canonical name reported by the provider, if any.
    pub matched_name: Option<String>,
}

/// Which provider resolved a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingProvider {
    /// postcodes.io
    Postcodes,
    /// Nominatim / `OpenStreetMap`.
    Nominatim,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (after retries).
    #[error("Geocoding request failed: {0}")]
    Fetch(#[from] FetchError),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Both providers failed or found nothing.
    #[error("Location not found: {query}")]
    LocationNotFound {
        /// The input that could not be resolved.
        query: String,
    },
}

/// Postcode-first location resolver.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: HttpClient,
    postcodes: ServiceDefinition,
    nominatim: ServiceDefinition,
}

impl LocationResolver {
    /// Creates a resolver using the postcode and Nominatim services from
    /// `endpoints`.
    #[must_use]
    pub fn new(client: HttpClient, endpoints: &Endpoints) -> Self {
        Self {
            client,
            postcodes: endpoints.postcodes.clone(),
            nominatim: endpoints.nominatim.clone(),
        }
    }

    /// Resolves `location` to a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::LocationNotFound`] if the input is blank or
    /// neither provider can resolve it. Intermediate provider errors are
    /// logged, not returned.
    pub async fn resolve(&self, location: &str) -> Result<GeocodedLocation, GeocodeError> {
        let query = location.trim();
        if query.is_empty() {
            return Err(GeocodeError::LocationNotFound {
                query: location.to_string(),
            });
        }

        match postcodes::lookup(&self.client, &self.postcodes, query).await {
            Ok(Some(found)) => return Ok(found),
            Ok(None) => log::info!("'{query}' is not a known postcode, trying place search"),
            Err(e) => log::warn!("Postcode lookup for '{query}' failed ({e}), trying place search"),
        }

        match nominatim::search(&self.client, &self.nominatim, query).await {
            Ok(Some(found)) => return Ok(found),
            Ok(None) => log::info!("No place found for '{query}'"),
            Err(e) => log::error!("Town search failed for '{query}': {e}"),
        }

        Err(GeocodeError::LocationNotFound {
            query: query.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use guardian_fetch::RetryPolicy;
    use guardian_fetch::testing::{ScriptedReply, ScriptedTransport};

    use super::*;

    const BASE: &str = "http://mock.test";
    const POSTCODES: &str = "http://mock.test/pc/postcodes/";
    const SEARCH: &str = "http://mock.test/search";

    fn resolver(transport: &Arc<ScriptedTransport>) -> LocationResolver {
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff_step: Duration::from_millis(1000),
        };
        let client = HttpClient::new(transport.clone(), policy);
        LocationResolver::new(client, &Endpoints::local(BASE))
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_valid_postcode_without_fallback() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(
                    POSTCODES,
                    vec![ScriptedReply::ok(
                        r#"{"status":200,"result":{"postcode":"SW1A 1AA","latitude":51.501009,"longitude":-0.141588}}"#,
                    )],
                )
                .route(SEARCH, vec![ScriptedReply::ok("[]")]),
        );

        let found = resolver(&transport).resolve("SW1A 1AA").await.unwrap();

        assert_eq!(found.provider, GeocodingProvider::Postcodes);
        assert_eq!(found.coordinate, Coordinate::new(51.501_009, -0.141_588));
        assert_eq!(found.matched_name.as_deref(), Some("SW1A 1AA"));
        assert_eq!(transport.requests_to(SEARCH), 0);
        assert_eq!(transport.requests()[0], "http://mock.test/pc/postcodes/SW1A%201AA");
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_place_search_for_town_names() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(
                    POSTCODES,
                    vec![ScriptedReply::Respond {
                        status: 404,
                        body: r#"{"status":404,"error":"Invalid postcode"}"#.to_string(),
                    }],
                )
                .route(
                    SEARCH,
                    vec![ScriptedReply::ok(
                        r#"[{"lat":"53.4794892","lon":"-2.2451148","display_name":"Manchester, Greater Manchester, England, United Kingdom"}]"#,
                    )],
                ),
        );

        let found = resolver(&transport).resolve("Manchester").await.unwrap();

        assert_eq!(found.provider, GeocodingProvider::Nominatim);
        assert!((found.coordinate.latitude - 53.479_489_2).abs() < 1e-9);
        assert!((found.coordinate.longitude - -2.245_114_8).abs() < 1e-9);
        // The postcode stage spends its whole retry budget before falling back.
        assert_eq!(transport.requests_to(POSTCODES), 3);
        let search_url = &transport.requests()[3];
        assert!(search_url.contains("format=json"));
        assert!(search_url.contains("q=Manchester"));
        assert!(search_url.contains("countrycodes=gb"));
        assert!(search_url.contains("limit=1"));
    }

    #[tokio::test(start_paused = true)]
    async fn null_postcode_result_falls_back() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(POSTCODES, vec![ScriptedReply::ok(r#"{"status":200,"result":null}"#)])
                .route(SEARCH, vec![ScriptedReply::ok(r#"[{"lat":"52.0","lon":"-1.5"}]"#)]),
        );

        let found = resolver(&transport).resolve("Banbury").await.unwrap();

        assert_eq!(found.provider, GeocodingProvider::Nominatim);
        assert_eq!(transport.requests_to(POSTCODES), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gibberish_is_location_not_found() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(POSTCODES, vec![ScriptedReply::status(404)])
                .route(SEARCH, vec![ScriptedReply::ok("[]")]),
        );

        let err = resolver(&transport).resolve("xqzzvbnm").await.unwrap_err();

        assert!(matches!(err, GeocodeError::LocationNotFound { ref query } if query == "xqzzvbnm"));
    }

    #[tokio::test(start_paused = true)]
    async fn both_providers_unreachable_is_location_not_found() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = resolver(&transport).resolve("Leeds").await.unwrap_err();

        assert!(matches!(err, GeocodeError::LocationNotFound { .. }));
        assert_eq!(transport.request_count(), 6);
    }

    #[tokio::test]
    async fn blank_input_does_no_io() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = resolver(&transport).resolve("   ").await.unwrap_err();

        assert!(matches!(err, GeocodeError::LocationNotFound { .. }));
        assert_eq!(transport.request_count(), 0);
    }
}
