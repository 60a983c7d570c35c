//! Immutable view of the current search results.

use guardian_analytics::risk::RiskProfile;
use guardian_crime_models::{AreaStatistics, Coordinate, CrimeRecord, DEFAULT_MAP_CENTER, RiskLevel};
use guardian_geocoder::GeocodedLocation;

/// Whether the crime listing for a snapshot actually loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAvailability {
    /// No search has completed yet.
    NotLoaded,
    /// The listing was fetched. It may still be empty.
    Available,
    /// The crime service could not be reached; the empty listing is not
    /// evidence of a quiet area.
    Unavailable,
}

/// State produced by one completed search (or check-in).
///
/// Snapshots are never mutated. A newer one replaces the old wholesale.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Token of the operation that produced this snapshot.
    pub generation: u64,
    /// Trimmed text of the last successful search.
    pub query: Option<String>,
    /// Resolved location of the last successful search.
    pub location: Option<GeocodedLocation>,
    /// Where the map is centred.
    pub center: Coordinate,
    /// Crimes around the searched location.
    pub crimes: Vec<CrimeRecord>,
    /// Statistics from their own fetch; `None` if it failed.
    pub statistics: Option<AreaStatistics>,
    /// Whether `crimes` actually loaded.
    pub availability: DataAvailability,
    risk: RiskProfile,
}

impl SessionSnapshot {
    /// State before any search: London centre, nothing loaded.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            generation: 0,
            query: None,
            location: None,
            center: DEFAULT_MAP_CENTER,
            crimes: Vec::new(),
            statistics: None,
            availability: DataAvailability::NotLoaded,
            risk: RiskProfile::new(&[]),
        }
    }

    pub(crate) fn searched(
        generation: u64,
        query: &str,
        location: GeocodedLocation,
        crimes: Vec<CrimeRecord>,
        statistics: Option<AreaStatistics>,
        availability: DataAvailability,
    ) -> Self {
        Self {
            generation,
            query: Some(query.to_string()),
            center: location.coordinate,
            location: Some(location),
            risk: RiskProfile::new(&crimes),
            crimes,
            statistics,
            availability,
        }
    }

    /// Copy of this snapshot centred on `center`.
    pub(crate) fn recentred(&self, generation: u64, center: Coordinate) -> Self {
        Self {
            generation,
            center,
            ..self.clone()
        }
    }

    /// Risk band of `crime` within this snapshot's area.
    #[must_use]
    pub fn risk_level(&self, crime: &CrimeRecord) -> RiskLevel {
        self.risk.level_for(&crime.category)
    }

    /// "Found N crime records for {query}", once a search has completed.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        self.query
            .as_ref()
            .map(|q| format!("Found {} crime records for {q}", self.crimes.len()))
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}
