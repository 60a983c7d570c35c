#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! One user's Guardian session.
//!
//! A [`Session`] ties the resolver, the crime service and the share
//! helpers together and holds the latest [`SessionSnapshot`]. Every
//! search or check-in takes a generation token when it starts; when it
//! finishes, its result is published only if no newer operation has
//! started in the meantime.

pub mod report;
pub mod snapshot;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use guardian_analytics::{AnalyticsError, CrimeDataService, generate_safe_route_recommendations};
use guardian_crime_models::{IncidentReport, RouteAdvisory};
use guardian_fetch::service_registry::Endpoints;
use guardian_fetch::{FetchError, HttpClient};
use guardian_geocoder::{GeocodeError, LocationResolver};
use guardian_social::geolocation::current_position;
use guardian_social::share::{self, ShareSink, app_url_from_env, plan_check_in, plan_message};
use guardian_social::{
    CheckInTarget, GeolocationError, GeolocationOptions, LocationProvider, Position, ShareError,
    SharePlatform,
};
use thiserror::Error;

pub use report::{ReportDraft, ReportError};
pub use snapshot::{DataAvailability, SessionSnapshot};

/// Shown when a search cannot be resolved to a place.
pub const LOCATION_NOT_FOUND_NOTICE: &str =
    "Location not found. Please try a different postcode or town name.";

/// Shown when a check-in cannot be completed.
pub const CHECK_IN_FAILED_NOTICE: &str = "Could not share your location. Please try again.";

/// Shown when route advice is requested before any crimes are loaded.
pub const SEARCH_FIRST_NOTICE: &str =
    "Please search for an area first to get safe route recommendations.";

/// Shown alongside results whose crime listing failed to load.
pub const DATA_UNAVAILABLE_NOTICE: &str =
    "Crime data is currently unavailable for this area. Showing no incidents does not mean none were reported.";

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The searched location could not be resolved.
    #[error("{0}")]
    Geocode(#[from] GeocodeError),

    /// No device position was available.
    #[error("{0}")]
    Geolocation(#[from] GeolocationError),

    /// A share could not be planned or delivered.
    #[error("{0}")]
    Share(#[from] ShareError),

    /// An incident report was rejected.
    #[error("{0}")]
    Report(#[from] ReportError),

    /// Route advice needs a loaded crime listing.
    #[error("No crime data loaded")]
    NoCrimeData,

    /// Client or endpoint configuration failed.
    #[error("{0}")]
    Fetch(#[from] FetchError),
}

impl SessionError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Geocode(_) => LOCATION_NOT_FOUND_NOTICE.to_string(),
            Self::Share(e @ ShareError::UnsupportedSharePlatform { .. }) => e.to_string(),
            Self::Geolocation(_) | Self::Share(_) => CHECK_IN_FAILED_NOTICE.to_string(),
            Self::NoCrimeData => SEARCH_FIRST_NOTICE.to_string(),
            Self::Report(e) => e.to_string(),
            Self::Fetch(e) => e.to_string(),
        }
    }
}

/// What became of a search.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The input was blank; nothing was requested.
    Ignored,
    /// The search completed and is now the current snapshot.
    Applied(Arc<SessionSnapshot>),
    /// A newer search or check-in started first; this result was dropped.
    Superseded,
}

/// Search, advice, check-in and reporting for one user.
pub struct Session {
    resolver: LocationResolver,
    crimes: CrimeDataService,
    app_url: String,
    latest: AtomicU64,
    current: RwLock<Arc<SessionSnapshot>>,
}

impl Session {
    /// Session over `client`, using `endpoints` for every lookup and
    /// `app_url` as the link shared with Facebook posts.
    #[must_use]
    pub fn new(client: HttpClient, endpoints: &Endpoints, app_url: impl Into<String>) -> Self {
        Self {
            resolver: LocationResolver::new(client.clone(), endpoints),
            crimes: CrimeDataService::new(client, endpoints),
            app_url: app_url.into(),
            latest: AtomicU64::new(0),
            current: RwLock::new(Arc::new(SessionSnapshot::initial())),
        }
    }

    /// Session configured from the embedded service registry and
    /// `GUARDIAN_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Fetch`] if the HTTP client or the endpoint
    /// registry cannot be set up.
    pub fn from_env() -> Result<Self, SessionError> {
        let client = HttpClient::from_env()?;
        let endpoints = Endpoints::from_env()?;
        Ok(Self::new(client, &endpoints, app_url_from_env()))
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_generation(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replaces the snapshot with `next(current)` if `generation` is still
    /// the newest token handed out.
    fn publish(
        &self,
        generation: u64,
        next: impl FnOnce(&SessionSnapshot) -> SessionSnapshot,
    ) -> Option<Arc<SessionSnapshot>> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if generation != self.latest.load(Ordering::SeqCst) {
            return None;
        }
        let snapshot = Arc::new(next(&current));
        *current = snapshot.clone();
        Some(snapshot)
    }

    /// Resolves `location`, then loads its crimes and statistics
    /// concurrently.
    ///
    /// A crime service outage does not fail the search; the snapshot is
    /// marked [`DataAvailability::Unavailable`] instead.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Geocode`] if `location` cannot be resolved.
    /// The current snapshot is left untouched.
    pub async fn search(&self, location: &str) -> Result<SearchOutcome, SessionError> {
        let query = location.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::Ignored);
        }

        let generation = self.next_generation();
        log::info!("Searching for '{query}' (generation {generation})");

        let resolved = self.resolver.resolve(query).await?;
        let at = resolved.coordinate;

        let (crimes, statistics) = futures::future::join(
            self.crimes.fetch_crimes(at),
            self.crimes.get_area_statistics(at),
        )
        .await;

        let (crimes, availability) = match crimes {
            Ok(crimes) => (crimes, DataAvailability::Available),
            Err(AnalyticsError::Fetch(e)) => {
                log::error!("Error fetching crime data: {e}");
                (Vec::new(), DataAvailability::Unavailable)
            }
        };

        let published = self.publish(generation, |_| {
            SessionSnapshot::searched(generation, query, resolved, crimes, statistics, availability)
        });

        Ok(match published {
            Some(snapshot) => {
                if let Some(summary) = snapshot.summary() {
                    log::info!("{summary}");
                }
                SearchOutcome::Applied(snapshot)
            }
            None => {
                log::debug!("Discarding stale search for '{query}' (generation {generation})");
                SearchOutcome::Superseded
            }
        })
    }

    /// Route advice for the crimes in the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoCrimeData`] if no crimes are loaded.
    pub fn route_advisory(&self) -> Result<RouteAdvisory, SessionError> {
        let snapshot = self.snapshot();
        if snapshot.crimes.is_empty() {
            return Err(SessionError::NoCrimeData);
        }
        Ok(generate_safe_route_recommendations(&snapshot.crimes))
    }

    /// Gets the device position, shares a check-in to `target` and moves
    /// the map centre there.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Geolocation`] if no position is available
    /// and [`SessionError::Share`] if the share cannot be delivered.
    pub async fn check_in(
        &self,
        target: CheckInTarget,
        provider: &dyn LocationProvider,
        sink: &dyn ShareSink,
    ) -> Result<Position, SessionError> {
        let position = current_position(provider, &GeolocationOptions::default()).await?;
        let plan = plan_check_in(target, position.coordinate, &self.app_url)?;
        share::execute(&plan, sink).await?;
        log::info!(
            "Checked in on {} at {}",
            target.label(),
            position.coordinate
        );

        let generation = self.next_generation();
        self.publish(generation, |current| {
            current.recentred(generation, position.coordinate)
        });

        Ok(position)
    }

    /// Shares `message` to `platform` without any location.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Share`] if the share cannot be delivered.
    pub async fn share_message(
        &self,
        platform: SharePlatform,
        message: &str,
        sink: &dyn ShareSink,
    ) -> Result<(), SessionError> {
        let plan = plan_message(platform, message, &self.app_url)?;
        share::execute(&plan, sink).await?;
        Ok(())
    }

    /// Validates and records an incident report.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Report`] if the draft is incomplete.
    pub fn submit_report(&self, draft: ReportDraft) -> Result<IncidentReport, SessionError> {
        Ok(report::submit(draft)?)
    }
}
