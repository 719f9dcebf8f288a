//! CSV reader for the scraper's track export.
//!
//! The export has a header row followed by one quoted row per track
//! section with six columns: line number, section name, track type,
//! length, maximum speed and brake length.

use std::fs::File;
use std::io::Read;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::error::TrackError;
use crate::track::{RawTrackRow, TrackSegment, normalize};

const COLUMNS: usize = 6;

/// Segments that normalized cleanly, plus the rows that were rejected.
#[derive(Debug, Default)]
pub struct ParsedTracks {
    pub segments: Vec<TrackSegment>,
    pub rejected: Vec<TrackError>,
}

/// Reads a raw row from a CSV record, positionally.
pub fn raw_row(line: usize, record: &StringRecord) -> Result<RawTrackRow, TrackError> {
    if record.len() != COLUMNS {
        return Err(TrackError::MalformedRecord {
            id: record
                .get(0)
                .map(str::to_string)
                .unwrap_or_else(|| format!("line {line}")),
            reason: format!("expected {COLUMNS} columns, found {}", record.len()),
        });
    }
    Ok(RawTrackRow::new(
        &record[0], &record[1], &record[2], &record[3], &record[4], &record[5],
    ))
}

/// Parses and normalizes every row of a track export.
///
/// Rows that cannot be normalized are logged and skipped; only I/O or
/// encoding failures abort.
pub fn parse_tracks<R: Read>(reader: R) -> Result<ParsedTracks> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = ParsedTracks::default();

    for (index, result) in rdr.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = result.with_context(|| format!("failed to read track export line {line}"))?;

        match raw_row(line, &record).and_then(|row| normalize(&row)) {
            Ok(segment) => {
                debug!(id = %segment.id, source = %segment.source, sink = %segment.sink, "Segment normalized");
                parsed.segments.push(segment);
            }
            Err(e) => {
                warn!(line, error = %e, "Skipping track row");
                parsed.rejected.push(e);
            }
        }
    }

    info!(
        segments = parsed.segments.len(),
        rejected = parsed.rejected.len(),
        "Track export parsed"
    );
    Ok(parsed)
}

/// Opens `path` and runs [`parse_tracks`] on it.
#[tracing::instrument]
pub fn parse_tracks_file(path: &str) -> Result<ParsedTracks> {
    let file = File::open(path).with_context(|| format!("failed to open track export '{path}'"))?;
    parse_tracks(file)
}
