#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime data aggregation and heuristic safety advice.
//!
//! [`police::CrimeDataService`] fetches street-level crimes around a
//! coordinate. Everything else in this crate is a pure function of the
//! fetched [`CrimeRecord`](guardian_crime_models::CrimeRecord) list:
//!
//! - [`aggregate`]: frequency-sorted category/outcome/month breakdowns
//! - [`advisory`]: avoid-areas, travel windows and tips
//! - [`risk`]: per-incident risk band and category safety tips

pub mod advisory;
pub mod aggregate;
pub mod police;
pub mod risk;

pub use advisory::generate_safe_route_recommendations;
pub use aggregate::compute_area_statistics;
pub use police::CrimeDataService;

use thiserror::Error;

/// Errors that can occur while fetching crime data.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The crime API could not be reached or returned garbage.
    #[error("Crime data unavailable: {0}")]
    Fetch(#[from] guardian_fetch::FetchError),
}
