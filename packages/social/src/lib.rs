#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Safety check-in sharing and device geolocation.
//!
//! Sharing never talks to a social network directly. [`share`] composes
//! pre-filled share links (or clipboard text) into a [`share::SharePlan`],
//! and a host-provided [`share::ShareSink`] opens or copies them.
//! [`geolocation`] wraps a host [`geolocation::LocationProvider`] with the
//! check-in's accuracy, timeout and freshness options.

pub mod geolocation;
pub mod share;

pub use geolocation::{GeolocationError, GeolocationOptions, LocationProvider, Position};
pub use share::{CheckInTarget, ShareAction, ShareError, SharePlan, SharePlatform, ShareSink};
