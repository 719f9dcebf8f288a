//! Vertex resolution: turns the location names referenced by segments
//! into positioned [`Vertex`] values.
//!
//! [`VertexStore`] persists located positions so repeated runs skip the
//! geocoder. [`Operator`] is asked for a better search term when the
//! geocoder comes back empty.

mod prompt;
mod store;

pub use prompt::{NoOperator, Operator, StdinOperator};
pub use store::{CsvVertexStore, MemoryVertexStore, VertexStore};

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::geocode::{GeoPoint, Geocoder, query_name, search_text};
use crate::network::Vertex;
use crate::track::TrackSegment;

/// Maps geographic positions onto the planar coordinates of the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Reference point moved to the origin, `x` = longitude, `y` = latitude.
    pub center: Option<GeoPoint>,
    pub scale: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            center: None,
            scale: 1.0,
        }
    }
}

impl Projection {
    pub fn new(center: Option<GeoPoint>, scale: f64) -> Self {
        Self { center, scale }
    }

    pub fn project(&self, point: GeoPoint) -> (f64, f64) {
        let (lon, lat) = match self.center {
            Some(c) => (point.lon - c.lon, point.lat - c.lat),
            None => (point.lon, point.lat),
        };
        (lon * self.scale, lat * self.scale)
    }
}

/// Distinct names referenced by `segments`, each with the other endpoint
/// of the segment it first appears in. Sources come before sinks.
pub fn referenced_names(segments: &[TrackSegment]) -> Vec<(&str, &str)> {
    let mut seen = std::collections::HashSet::new();
    let mut names = Vec::new();

    for segment in segments {
        for (name, other) in [
            (segment.source.as_str(), segment.sink.as_str()),
            (segment.sink.as_str(), segment.source.as_str()),
        ] {
            if seen.insert(name) {
                names.push((name, other));
            }
        }
    }

    names
}

pub struct VertexResolver<G, S> {
    geocoder: G,
    store: S,
    operator: Arc<dyn Operator>,
    projection: Projection,
}

impl<G: Geocoder, S: VertexStore> VertexResolver<G, S> {
    pub fn new(geocoder: G, store: S, operator: Box<dyn Operator>, projection: Projection) -> Self {
        Self {
            geocoder,
            store,
            operator: Arc::from(operator),
            projection,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves every location referenced by `segments`.
    ///
    /// Cached names are served from the store; the rest are geocoded one
    /// by one and written back to the store as soon as they are found.
    /// Vertices are returned in order of first reference.
    ///
    /// # Errors
    ///
    /// Any name that cannot be located fails the whole resolution.
    #[tracing::instrument(skip_all, fields(segments = segments.len()))]
    pub async fn resolve(&mut self, segments: &[TrackSegment]) -> Result<Vec<Vertex>, ResolveError> {
        let mut known: HashMap<String, GeoPoint> = self.store.load_all()?.into_iter().collect();
        let names = referenced_names(segments);

        info!(
            referenced = names.len(),
            cached = names.iter().filter(|(n, _)| known.contains_key(*n)).count(),
            "Resolving vertices"
        );

        let mut vertices = Vec::with_capacity(names.len());
        for (name, other) in names {
            let point = match known.get(name) {
                Some(point) => {
                    debug!(name, "Vertex cached");
                    *point
                }
                None => {
                    let point = self.locate(name, other).await?;
                    self.store.upsert(name, point)?;
                    known.insert(name.to_string(), point);
                    info!(name, lon = point.lon, lat = point.lat, "Vertex located");
                    point
                }
            };

            let (x, y) = self.projection.project(point);
            vertices.push(Vertex::new(name, x, y));
        }

        Ok(vertices)
    }

    async fn locate(&self, name: &str, other: &str) -> Result<GeoPoint, ResolveError> {
        let mut query = search_text(query_name(name, other)).to_string();

        loop {
            let found = self
                .geocoder
                .locate(&query)
                .await
                .map_err(|source| ResolveError::Geocode {
                    name: name.to_string(),
                    source,
                })?;

            if let Some(point) = found {
                return Ok(point);
            }

            warn!(name, query = %query, "No location found");
            match self.ask_operator(name, &query).await? {
                Some(term) => query = term,
                None => {
                    return Err(ResolveError::NotFound {
                        name: name.to_string(),
                        query,
                    });
                }
            }
        }
    }

    /// Runs the operator on the blocking pool so a waiting prompt does not
    /// hold up the runtime.
    async fn ask_operator(&self, name: &str, query: &str) -> io::Result<Option<String>> {
        let operator = Arc::clone(&self.operator);
        let (name, query) = (name.to_string(), query.to_string());

        tokio::task::spawn_blocking(move || operator.search_term(&name, &query))
            .await
            .map_err(io::Error::other)?
    }
}
