//! Geocoding of location names.
//!
//! [`Geocoder`] is the seam to the external lookup. [`GoogleGeocoder`]
//! queries the Google Places text search; [`CacheOnly`] refuses every
//! lookup so that a run can be restricted to already cached vertices.

mod google;

pub use google::GoogleGeocoder;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeocodeError;

/// Names starting with this prefix denote short connector segments
/// ("Streckenübergang") whose position is not published.
pub const CONNECTOR_PREFIX: &str = "StrUeb";

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Looks up the position of a free-text place query.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns `Ok(None)` when the service has no candidate for `query`.
    async fn locate(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

/// A geocoder for offline runs: every lookup fails.
pub struct CacheOnly;

#[async_trait]
impl Geocoder for CacheOnly {
    async fn locate(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Err(GeocodeError::Offline(query.to_string()))
    }
}

pub fn is_connector(name: &str) -> bool {
    name.starts_with(CONNECTOR_PREFIX)
}

/// Picks the name to geocode for `name`, seen in a segment whose other
/// endpoint is `other`. Connectors are located via their neighbour.
pub fn query_name<'a>(name: &'a str, other: &'a str) -> &'a str {
    if is_connector(name) { other } else { name }
}

/// Reduces a register name to text the geocoder understands.
///
/// Only the part after the first `-` is kept, since `A-B` reads as a
/// route from A to B rather than suburb B of A. Anything from the first
/// `,` on is operator detail and dropped.
pub fn search_text(name: &str) -> &str {
    let mut parts = name.split('-');
    let head = parts.next().unwrap_or(name);
    let text = match parts.next() {
        Some(part) if !part.trim().is_empty() => part,
        _ => head,
    };
    let text = text.split(',').next().unwrap_or(text).trim();
    if text.is_empty() { name.trim() } else { text }
}
