//! Device position lookup for safety check-ins.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_crime_models::Coordinate;
use thiserror::Error;

/// How long a check-in waits for a position fix.
pub const CHECK_IN_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from a position lookup.
#[derive(Debug, Error)]
pub enum GeolocationError {
    /// The host has no way of determining position.
    #[error("Geolocation is not supported: {message}")]
    Unavailable {
        /// Why no position source exists.
        message: String,
    },

    /// The user refused to share their position.
    #[error("Location permission denied")]
    Denied,

    /// No fix arrived in time.
    #[error("Timed out after {timeout:?} waiting for a location fix")]
    Timeout {
        /// The limit that was exceeded.
        timeout: Duration,
    },
}

/// Accuracy, deadline and cache requirements for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    /// Prefer GPS-grade accuracy.
    pub enable_high_accuracy: bool,
    /// Give up after this long.
    pub timeout: Duration,
    /// Oldest cached fix that may be returned. Zero demands a fresh fix.
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: CHECK_IN_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

/// A position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Where the device is.
    pub coordinate: Coordinate,
    /// Accuracy radius in metres, when known.
    pub accuracy_m: Option<f64>,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

/// A source of device positions.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolves the current position. Implementations need not enforce
    /// `options.timeout`; [`current_position`] does.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError`] if no position can be obtained.
    async fn locate(&self, options: &GeolocationOptions) -> Result<Position, GeolocationError>;
}

/// Current position from `provider`, bounded by `options.timeout`.
///
/// # Errors
///
/// Returns the provider's error, or [`GeolocationError::Timeout`] when the
/// deadline passes first.
pub async fn current_position(
    provider: &dyn LocationProvider,
    options: &GeolocationOptions,
) -> Result<Position, GeolocationError> {
    match tokio::time::timeout(options.timeout, provider.locate(options)).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("Location lookup timed out after {:?}", options.timeout);
            Err(GeolocationError::Timeout {
                timeout: options.timeout,
            })
        }
    }
}

/// Always reports the same coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    coordinate: Coordinate,
}

impl FixedLocationProvider {
    /// Provider that always reports `coordinate`.
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn locate(&self, _options: &GeolocationOptions) -> Result<Position, GeolocationError> {
        Ok(Position {
            coordinate: self.coordinate,
            accuracy_m: None,
            timestamp: Utc::now(),
        })
    }
}

/// For hosts with no position source at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocationProvider;

#[async_trait]
impl LocationProvider for UnavailableLocationProvider {
    async fn locate(&self, _options: &GeolocationOptions) -> Result<Position, GeolocationError> {
        Err(GeolocationError::Unavailable {
            message: "no location source on this device".to_string(),
        })
    }
}
