//! postcodes.io client.
//!
//! `GET {base}/postcodes/{postcode}` returns
//! `{"status": 200, "result": {"latitude": .., "longitude": .., ..}}` for a
//! known postcode. Unknown postcodes come back as HTTP 404, which the
//! retrying client reports as an error like any other non-2xx status.
//!
//! See <https://postcodes.io/docs>

use guardian_crime_models::Coordinate;
use guardian_fetch::service_registry::ServiceDefinition;
use guardian_fetch::{HttpClient, build_url};
use serde::Deserialize;

use crate::{GeocodeError, GeocodedLocation, GeocodingProvider};

#[derive(Debug, Deserialize)]
struct PostcodeResponse {
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    postcode: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Looks up `postcode` on postcodes.io.
///
/// Returns `Ok(None)` when the service answers successfully but without a
/// usable result (e.g. `"result": null`, or a terminated postcode with no
/// coordinates).
///
/// # Errors
///
/// Returns [`GeocodeError`] if the request fails after retries or the
/// body is not a postcodes.io payload.
pub async fn lookup(
    client: &HttpClient,
    service: &ServiceDefinition,
    postcode: &str,
) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let url = build_url(&service.base_url, &["postcodes", postcode], &[])?;
    let response = client.get(&url).await?;
    parse_response(&response.body)
}

fn parse_response(body: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let parsed: PostcodeResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse {
            message: format!("Malformed postcodes.io response: {e}"),
        })?;

    let Some(result) = parsed.result else {
        return Ok(None);
    };

    let (Some(latitude), Some(longitude)) = (result.latitude, result.longitude) else {
        return Ok(None);
    };

    Ok(Some(GeocodedLocation {
        coordinate: Coordinate::new(latitude, longitude),
        provider: GeocodingProvider::Postcodes,
        matched_name: result.postcode,
    }))
}
