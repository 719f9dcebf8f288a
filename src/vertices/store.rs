use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::geocode::GeoPoint;

/// Durable name → position cache for located vertices.
pub trait VertexStore {
    /// Returns every stored entry in storage order.
    fn load_all(&self) -> Result<Vec<(String, GeoPoint)>>;

    /// Stores the position for `name`, replacing any earlier entry.
    fn upsert(&mut self, name: &str, point: GeoPoint) -> Result<()>;
}

/// Vertex cache kept in a header-less CSV file of `name,lon,lat` rows.
///
/// Upserts append a row; on load, later rows win over earlier ones.
pub struct CsvVertexStore {
    path: PathBuf,
}

impl CsvVertexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VertexStore for CsvVertexStore {
    fn load_all(&self) -> Result<Vec<(String, GeoPoint)>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No vertex cache yet");
            return Ok(Vec::new());
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .with_context(|| format!("failed to open vertex cache '{}'", self.path.display()))?;

        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let (name, lon, lat): (String, f64, f64) = result
                .with_context(|| format!("invalid row in vertex cache '{}'", self.path.display()))?;
            entries.push((name, GeoPoint::new(lon, lat)));
        }

        debug!(path = %self.path.display(), entries = entries.len(), "Vertex cache loaded");
        Ok(entries)
    }

    fn upsert(&mut self, name: &str, point: GeoPoint) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("failed to open vertex cache '{}'", self.path.display()))?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .from_writer(file);

        writer.serialize((name, point.lon, point.lat))?;
        writer.flush()?;

        Ok(())
    }
}

/// In-memory store, used when no cache file is wanted and in tests.
#[derive(Debug, Default)]
pub struct MemoryVertexStore {
    entries: Vec<(String, GeoPoint)>,
}

impl MemoryVertexStore {
    pub fn new(entries: Vec<(String, GeoPoint)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VertexStore for MemoryVertexStore {
    fn load_all(&self) -> Result<Vec<(String, GeoPoint)>> {
        Ok(self.entries.clone())
    }

    fn upsert(&mut self, name: &str, point: GeoPoint) -> Result<()> {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = point,
            None => self.entries.push((name.to_string(), point)),
        }
        Ok(())
    }
}
