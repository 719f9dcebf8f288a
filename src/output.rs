//! Output formatting and persistence for networks and segments.
//!
//! The network is written as a single JSON document for the solver;
//! normalized segments can be dumped to CSV for inspection.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::network::Network;
use crate::stats::NetworkStats;
use crate::track::TrackSegment;
use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Logs network statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &NetworkStats) {
    debug!("{:#?}", stats);
}

fn create_parent(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Writes `network` as JSON to `path`, replacing any existing file.
pub fn write_network(path: &str, network: &Network, pretty: bool) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("failed to create '{path}'"))?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, network)?;
    } else {
        serde_json::to_writer(&mut writer, network)?;
    }
    writer.flush()?;

    info!(path, vertices = network.vertices.len(), "Network written");
    Ok(())
}

/// Writes segments as CSV with a header row to `path`.
pub fn write_segments(path: &str, segments: &[TrackSegment]) -> Result<()> {
    create_parent(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create '{path}'"))?;

    for segment in segments {
        writer.serialize(segment)?;
    }
    writer.flush()?;

    info!(path, segments = segments.len(), "Segments written");
    Ok(())
}
