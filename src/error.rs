//! Error types for the network extraction core.

use thiserror::Error;

/// Reasons a raw track row cannot be turned into a [`TrackSegment`](crate::track::TrackSegment).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("row {id}: malformed record: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("row {id}: unknown track type '{label}'")]
    UnknownTrackType { id: String, label: String },

    #[error("row {id}: invalid {field} value '{value}'")]
    InvalidField {
        id: String,
        field: &'static str,
        value: String,
    },
}

/// Structural failures while assembling the network matrices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("segment {segment} ({from} - {to}) references unknown vertex '{name}'")]
    UnknownVertex {
        segment: String,
        from: String,
        to: String,
        name: String,
    },
}

/// Failures talking to a geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding service returned status {0}")]
    Status(String),

    #[error("could not decode geocoding response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("'{0}' is not cached and geocoding is disabled")]
    Offline(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of the vertex resolver as a whole.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not locate '{name}': {source}")]
    Geocode {
        name: String,
        #[source]
        source: GeocodeError,
    },

    #[error("no location found for '{name}' (last search term '{query}')")]
    NotFound { name: String, query: String },

    #[error("operator prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
