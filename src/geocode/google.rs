use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::{GeoPoint, Geocoder};
use crate::error::GeocodeError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};

const FIND_PLACE_URL: &str = "https://maps.googleapis.com/maps/api/place/findplacefromtext/json";

#[derive(Deserialize)]
struct FindPlaceResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    status: String,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Geocoder backed by the Google Places "find place from text" endpoint.
pub struct GoogleGeocoder<C> {
    client: C,
    base_url: String,
}

impl GoogleGeocoder<UrlParam<BasicClient>> {
    /// Creates a geocoder that authenticates with `api_key`.
    pub fn with_api_key(api_key: String) -> Result<Self, GeocodeError> {
        let client = UrlParam::new(BasicClient::new()?, "key", api_key);
        Ok(Self::new(client))
    }
}

impl<C: HttpClient> GoogleGeocoder<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_url: FIND_PLACE_URL.to_string(),
        }
    }

    pub fn request_url(&self, query: &str) -> Result<Url, GeocodeError> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", "geometry"),
            ],
        )
        .map_err(|e| GeocodeError::Other(anyhow::anyhow!("invalid geocoding url: {e}")))
    }
}

#[async_trait]
impl<C: HttpClient> Geocoder for GoogleGeocoder<C> {
    async fn locate(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = self.request_url(query)?;
        debug!(query, "Querying geocoder");

        let bytes = fetch_bytes(&self.client, url).await?;
        parse_find_place(&bytes)
    }
}

/// Extracts the first candidate's position from a find-place response.
pub(crate) fn parse_find_place(bytes: &[u8]) -> Result<Option<GeoPoint>, GeocodeError> {
    let response: FindPlaceResponse = serde_json::from_slice(bytes)?;

    match response.status.as_str() {
        "OK" => Ok(response
            .candidates
            .first()
            .map(|c| GeoPoint::new(c.geometry.location.lng, c.geometry.location.lat))),
        "ZERO_RESULTS" => Ok(None),
        status => Err(GeocodeError::Status(match response.error_message {
            Some(message) => format!("{status}: {message}"),
            None => status.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_candidate() {
        let body = br#"{
            "candidates": [
                {"geometry": {"location": {"lat": 50.7678, "lng": 6.0915}}},
                {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
            ],
            "status": "OK"
        }"#;
        let point = parse_find_place(body).unwrap().unwrap();

        assert_eq!(point, GeoPoint::new(6.0915, 50.7678));
    }

    #[test]
    fn test_parse_zero_results() {
        let body = br#"{"candidates": [], "status": "ZERO_RESULTS"}"#;
        assert!(parse_find_place(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_ok_without_candidates() {
        let body = br#"{"status": "OK"}"#;
        assert!(parse_find_place(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_error_status() {
        let body = br#"{"candidates": [], "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#;
        let err = parse_find_place(body).unwrap_err();

        assert!(matches!(err, GeocodeError::Status(ref s) if s.starts_with("REQUEST_DENIED")));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_find_place(b"not json"),
            Err(GeocodeError::Decode(_))
        ));
    }

    #[test]
    fn test_request_url_encodes_query() {
        let geocoder = GoogleGeocoder::new(BasicClient::new().unwrap());
        let url = geocoder.request_url("Köln Hbf").unwrap();

        assert!(url.as_str().starts_with(FIND_PLACE_URL));
        assert!(url.query_pairs().any(|(k, v)| k == "input" && v == "Köln Hbf"));
        assert!(url.query_pairs().any(|(k, v)| k == "inputtype" && v == "textquery"));
    }
}
