//! data.police.uk street-level crime client.
//!
//! `GET {base}/crimes-street/all-crime?lat=..&lng=..` returns every crime
//! reported within a one-mile radius of the point for the latest
//! available month.
//!
//! See <https://data.police.uk/docs/method/crime-street/>

use guardian_crime_models::{AreaStatistics, Coordinate, CrimeRecord};
use guardian_fetch::service_registry::{Endpoints, ServiceDefinition};
use guardian_fetch::{HttpClient, build_url};

use crate::{AnalyticsError, compute_area_statistics};

/// Fetches crimes around a coordinate and derives statistics from them.
#[derive(Debug, Clone)]
pub struct CrimeDataService {
    client: HttpClient,
    police: ServiceDefinition,
}

impl CrimeDataService {
    /// Creates a service using the police.uk endpoint from `endpoints`.
    #[must_use]
    pub fn new(client: HttpClient, endpoints: &Endpoints) -> Self {
        Self {
            client,
            police: endpoints.police.clone(),
        }
    }

    /// Fetches the crimes around `at`, propagating failures.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Fetch`] if the request fails after retries
    /// or the body is not a crime list.
    pub async fn fetch_crimes(&self, at: Coordinate) -> Result<Vec<CrimeRecord>, AnalyticsError> {
        let lat = at.latitude.to_string();
        let lng = at.longitude.to_string();
        let url = build_url(
            &self.police.base_url,
            &["crimes-street", "all-crime"],
            &[("lat", lat.as_str()), ("lng", lng.as_str())],
        )?;
        let crimes: Vec<CrimeRecord> = self.client.get_json(&url).await?;
        log::debug!("Fetched {} crime(s) around {at}", crimes.len());
        Ok(crimes)
    }

    /// Crimes around `at`. A failed fetch is logged and yields an empty
    /// list, so callers cannot tell an outage from a quiet area.
    pub async fn get_crimes_for_area(&self, at: Coordinate) -> Vec<CrimeRecord> {
        match self.fetch_crimes(at).await {
            Ok(crimes) => crimes,
            Err(e) => {
                log::error!("Error fetching crime data: {e}");
                Vec::new()
            }
        }
    }

    /// Statistics for the crimes around `at`, from a fresh fetch. A failed
    /// fetch is logged and yields `None`.
    pub async fn get_area_statistics(&self, at: Coordinate) -> Option<AreaStatistics> {
        match self.fetch_crimes(at).await {
            Ok(crimes) => Some(compute_area_statistics(&crimes)),
            Err(e) => {
                log::error!("Error fetching area statistics: {e}");
                None
            }
        }
    }
}
