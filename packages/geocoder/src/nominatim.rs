//! Nominatim / `OpenStreetMap` free-text search.
//!
//! Used when the input is not a postcode. Results are restricted to the
//! country codes configured for the service (Great Britain) and only the
//! best match is requested.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use guardian_crime_models::Coordinate;
use guardian_fetch::service_registry::{ProviderConfig, ServiceDefinition};
use guardian_fetch::{HttpClient, build_url};

use crate::{GeocodeError, GeocodedLocation, GeocodingProvider};

const DEFAULT_COUNTRY_CODES: &str = "gb";

/// Searches Nominatim for `query`.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the request fails after retries or the
/// response cannot be parsed.
pub async fn search(
    client: &HttpClient,
    service: &ServiceDefinition,
    query: &str,
) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let (country_codes, limit) = match &service.provider {
        ProviderConfig::Nominatim {
            country_codes,
            limit,
        } => (country_codes.as_str(), limit.to_string()),
        _ => (DEFAULT_COUNTRY_CODES, "1".to_string()),
    };

    let url = build_url(
        &service.base_url,
        &[],
        &[
            ("format", "json"),
            ("q", query),
            ("countrycodes", country_codes),
            ("limit", limit.as_str()),
        ],
    )?;

    let body: serde_json::Value = client.get_json(&url).await?;
    parse_response(&body)
}

/// Parses a Nominatim JSON response, taking the first result.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = parse_degrees(&first["lat"]).ok_or_else(|| GeocodeError::Parse {
        message: "Missing lat in Nominatim response".to_string(),
    })?;

    let lon = parse_degrees(&first["lon"]).ok_or_else(|| GeocodeError::Parse {
        message: "Missing lon in Nominatim response".to_string(),
    })?;

    Ok(Some(GeocodedLocation {
        coordinate: Coordinate::new(lat, lon),
        provider: GeocodingProvider::Nominatim,
        matched_name: first["display_name"].as_str().map(String::from),
    }))
}

// Nominatim sends coordinates as strings; accept bare numbers too.
fn parse_degrees(value: &serde_json::Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| value.as_f64())
}
