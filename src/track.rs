//! Track segment records and their normalization from raw export rows.
//!
//! A raw row holds six text fields as exported from the infrastructure
//! register. Measurements may be unpublished, in which case defaults are
//! substituted before cost and capacity are derived.

use serde::Serialize;

use crate::error::TrackError;

/// Marks a measurement that is only available on request.
pub const ON_REQUEST: &str = "auf Anfrage";

/// Marks a brake length for which no document exists.
pub const NO_DOCUMENT: &str = "Kein Dokument vorhanden";

/// Separator between the two endpoint names of a section.
pub const SECTION_SEPARATOR: &str = " - ";

pub const DEFAULT_LENGTH_KM: u64 = 10;
pub const DEFAULT_LENGTH_M: u64 = 0;
pub const MIN_LENGTH_M: u64 = 100;
pub const DEFAULT_SPEED_KMH: u64 = 50;
pub const DEFAULT_BRAKE_LENGTH_M: u64 = 700;

/// How a track can be used by the two travel directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackType {
    /// One-directional track.
    Simplex,
    /// Bidirectional, full capacity each way.
    Duplex,
    /// Bidirectional single track, capacity shared between directions.
    DuplexHalfed,
}

impl TrackType {
    /// Maps the register's label onto a track type.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Richtungsgleis" => Some(TrackType::Simplex),
            "Gegengleis" => Some(TrackType::Duplex),
            "eingleisig" => Some(TrackType::DuplexHalfed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackType::Simplex => "Richtungsgleis",
            TrackType::Duplex => "Gegengleis",
            TrackType::DuplexHalfed => "eingleisig",
        }
    }

    /// Splits a segment capacity into `(forward, reverse)` contributions.
    ///
    /// Halfed tracks round each half up, so the two directions together may
    /// exceed the segment capacity by one.
    pub fn split_capacity(self, capacity: u64) -> (u64, u64) {
        match self {
            TrackType::Simplex => (capacity, 0),
            TrackType::Duplex => (capacity, capacity),
            TrackType::DuplexHalfed => {
                let half = capacity.div_ceil(2);
                (half, half)
            }
        }
    }
}

/// One row of the scraper export, fields in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrackRow {
    pub id: String,
    pub section: String,
    pub track_type: String,
    pub length: String,
    pub speed: String,
    pub brake_length: String,
}

impl RawTrackRow {
    pub fn new(
        id: &str,
        section: &str,
        track_type: &str,
        length: &str,
        speed: &str,
        brake_length: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            section: section.to_string(),
            track_type: track_type.to_string(),
            length: length.to_string(),
            speed: speed.to_string(),
            brake_length: brake_length.to_string(),
        }
    }
}

/// A normalized track segment between two named locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackSegment {
    pub id: String,
    pub source: String,
    pub sink: String,
    pub track_type: TrackType,
    /// Minutes to traverse, always at least 1.
    pub cost: u64,
    pub capacity: u64,
}

/// Converts a raw row into a [`TrackSegment`].
///
/// Unpublished measurements fall back to 10 km length, 50 km/h and a
/// 700 m brake length. Lengths are floored at 100 m so every segment has a
/// strictly positive cost.
///
/// The section is trimmed before it is split, so an endpoint name is never
/// empty: `" - B"` is a malformed record, not a segment from `""` to `"B"`.
/// Values too large to compute a cost from are invalid fields.
pub fn normalize(row: &RawTrackRow) -> Result<TrackSegment, TrackError> {
    let id = row.id.trim();

    let (source, sink) = row
        .section
        .trim()
        .split_once(SECTION_SEPARATOR)
        .ok_or_else(|| TrackError::MalformedRecord {
            id: id.to_string(),
            reason: format!("no '{}' in section '{}'", SECTION_SEPARATOR, row.section),
        })?;

    let track_type =
        TrackType::from_label(row.track_type.trim()).ok_or_else(|| TrackError::UnknownTrackType {
            id: id.to_string(),
            label: row.track_type.clone(),
        })?;

    let length_m = parse_length(id, row.length.trim())?;
    let speed_kmh = parse_speed(id, row.speed.trim())?;
    let brake_m = parse_brake_length(id, row.brake_length.trim())?;

    let cost = 60u64
        .checked_mul(length_m)
        .ok_or_else(|| invalid(id, "length", &row.length))?
        .div_ceil(
            speed_kmh
                .checked_mul(1000)
                .ok_or_else(|| invalid(id, "speed", &row.speed))?,
        );
    let simultaneous_usage = 0.5 * (length_m as f64 / brake_m as f64);
    let traversals_per_hour = 60.0 / cost as f64;
    let capacity = (simultaneous_usage * traversals_per_hour).floor() as u64;

    Ok(TrackSegment {
        id: id.to_string(),
        source: source.trim().to_string(),
        sink: sink.trim().to_string(),
        track_type,
        cost,
        capacity,
    })
}

fn invalid(id: &str, field: &'static str, value: &str) -> TrackError {
    TrackError::InvalidField {
        id: id.to_string(),
        field,
        value: value.to_string(),
    }
}

/// Parses `"<km>,<m>"` into meters.
fn parse_length(id: &str, value: &str) -> Result<u64, TrackError> {
    let (km, m) = if value == ON_REQUEST {
        (DEFAULT_LENGTH_KM, DEFAULT_LENGTH_M)
    } else {
        let (km, m) = value
            .split_once(',')
            .ok_or_else(|| invalid(id, "length", value))?;
        let km = km.trim().parse::<u64>().map_err(|_| invalid(id, "length", value))?;
        let m = m.trim().parse::<u64>().map_err(|_| invalid(id, "length", value))?;
        (km, m)
    };
    km.checked_mul(1000)
        .and_then(|meters| meters.checked_add(m))
        .map(|meters| meters.max(MIN_LENGTH_M))
        .ok_or_else(|| invalid(id, "length", value))
}

fn parse_speed(id: &str, value: &str) -> Result<u64, TrackError> {
    if value == ON_REQUEST {
        return Ok(DEFAULT_SPEED_KMH);
    }
    match value.parse::<u64>() {
        Ok(speed) if speed > 0 => Ok(speed),
        _ => Err(invalid(id, "speed", value)),
    }
}

/// Reads the leading integer of a field like `"1000 m"`.
fn parse_brake_length(id: &str, value: &str) -> Result<u64, TrackError> {
    if value == ON_REQUEST || value == NO_DOCUMENT {
        return Ok(DEFAULT_BRAKE_LENGTH_M);
    }
    let token = value.split_whitespace().next().unwrap_or_default();
    match token.parse::<u64>() {
        Ok(brake) if brake > 0 => Ok(brake),
        _ => Err(invalid(id, "brake length", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_published_values() {
        let row = RawTrackRow::new("2600", "Köln Hbf - Köln-Deutz", "Gegengleis", "1,500", "80", "1000 m");
        let segment = normalize(&row).unwrap();

        assert_eq!(segment.source, "Köln Hbf");
        assert_eq!(segment.sink, "Köln-Deutz");
        assert_eq!(segment.track_type, TrackType::Duplex);
        // 60 * 1500 / 80000 = 1.125 -> 2 minutes
        assert_eq!(segment.cost, 2);
        // 0.5 * 1.5 * 30 = 22.5
        assert_eq!(segment.capacity, 22);
    }

    #[test]
    fn test_normalize_defaults() {
        let row = RawTrackRow::new("1", "A - B", "Richtungsgleis", ON_REQUEST, ON_REQUEST, NO_DOCUMENT);
        let segment = normalize(&row).unwrap();

        assert_eq!(segment.cost, 12);
        // 0.5 * (10000 / 700) * (60 / 12) = 35.71
        assert_eq!(segment.capacity, 35);
    }

    #[test]
    fn test_brake_on_request_uses_default() {
        let row = RawTrackRow::new("1", "A - B", "Richtungsgleis", ON_REQUEST, ON_REQUEST, ON_REQUEST);
        assert_eq!(normalize(&row).unwrap().capacity, 35);
    }

    #[test]
    fn test_length_floor() {
        let row = RawTrackRow::new("1", "A - B", "eingleisig", "0,0", "100", "100 m");
        let segment = normalize(&row).unwrap();

        // 100 m at 100 km/h is 0.06 minutes, rounded up to 1
        assert_eq!(segment.cost, 1);
        // 0.5 * (100 / 100) * 60 = 30
        assert_eq!(segment.capacity, 30);
    }

    #[test]
    fn test_capacity_may_be_zero() {
        let row = RawTrackRow::new("1", "A - B", "Gegengleis", "0,300", "20", "2000 m");
        let segment = normalize(&row).unwrap();

        assert_eq!(segment.cost, 1);
        // 0.5 * 0.15 * 60 = 4.5
        assert_eq!(segment.capacity, 4);

        let row = RawTrackRow::new("2", "A - B", "Gegengleis", "0,150", "10", "9000 m");
        assert_eq!(normalize(&row).unwrap().capacity, 0);
    }

    #[test]
    fn test_section_splits_on_first_separator() {
        let row = RawTrackRow::new("1", "A - B - C", "Gegengleis", ON_REQUEST, ON_REQUEST, ON_REQUEST);
        let segment = normalize(&row).unwrap();

        assert_eq!(segment.source, "A");
        assert_eq!(segment.sink, "B - C");
    }

    #[test]
    fn test_hyphenated_names_are_not_separators() {
        let row = RawTrackRow::new("1", "Köln-Mülheim - Köln-Deutz", "Gegengleis", ON_REQUEST, ON_REQUEST, ON_REQUEST);
        let segment = normalize(&row).unwrap();

        assert_eq!(segment.source, "Köln-Mülheim");
        assert_eq!(segment.sink, "Köln-Deutz");
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let row = RawTrackRow::new("7", "Aachen Hbf", "Gegengleis", ON_REQUEST, ON_REQUEST, ON_REQUEST);
        let err = normalize(&row).unwrap_err();

        assert!(matches!(err, TrackError::MalformedRecord { ref id, .. } if id == "7"));
    }

    #[test]
    fn test_empty_endpoint_is_malformed() {
        for section in [" - B", "A - ", " - "] {
            let row = RawTrackRow::new("9", section, "Gegengleis", ON_REQUEST, ON_REQUEST, ON_REQUEST);
            assert!(
                matches!(normalize(&row), Err(TrackError::MalformedRecord { .. })),
                "section {section:?}"
            );
        }
    }

    #[test]
    fn test_unknown_track_type() {
        let row = RawTrackRow::new("8", "A - B", "zweigleisig", ON_REQUEST, ON_REQUEST, ON_REQUEST);
        let err = normalize(&row).unwrap_err();

        assert_eq!(
            err,
            TrackError::UnknownTrackType {
                id: "8".to_string(),
                label: "zweigleisig".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_fields() {
        let bad_length = RawTrackRow::new("1", "A - B", "Gegengleis", "12", ON_REQUEST, ON_REQUEST);
        assert!(matches!(
            normalize(&bad_length),
            Err(TrackError::InvalidField { field: "length", .. })
        ));

        let zero_speed = RawTrackRow::new("1", "A - B", "Gegengleis", ON_REQUEST, "0", ON_REQUEST);
        assert!(matches!(
            normalize(&zero_speed),
            Err(TrackError::InvalidField { field: "speed", .. })
        ));

        let huge_length = RawTrackRow::new("1", "A - B", "Gegengleis", "99999999999999999,0", "80", "1000 m");
        assert!(matches!(
            normalize(&huge_length),
            Err(TrackError::InvalidField { field: "length", .. })
        ));

        // multiplies into the 64-bit range only when converted to minutes
        let long_length = RawTrackRow::new("1", "A - B", "Gegengleis", "999999999999999,0", "80", "1000 m");
        assert!(matches!(
            normalize(&long_length),
            Err(TrackError::InvalidField { field: "length", .. })
        ));

        let huge_speed = RawTrackRow::new("1", "A - B", "Gegengleis", "1,500", "2305843009213693952", "1000 m");
        assert!(matches!(
            normalize(&huge_speed),
            Err(TrackError::InvalidField { field: "speed", .. })
        ));

        let bad_brake = RawTrackRow::new("1", "A - B", "Gegengleis", ON_REQUEST, ON_REQUEST, "m 1000");
        assert!(matches!(
            normalize(&bad_brake),
            Err(TrackError::InvalidField { field: "brake length", .. })
        ));
    }

    #[test]
    fn test_split_capacity() {
        assert_eq!(TrackType::Simplex.split_capacity(10), (10, 0));
        assert_eq!(TrackType::Duplex.split_capacity(10), (10, 10));
        assert_eq!(TrackType::DuplexHalfed.split_capacity(10), (5, 5));
        assert_eq!(TrackType::DuplexHalfed.split_capacity(7), (4, 4));
        assert_eq!(TrackType::DuplexHalfed.split_capacity(0), (0, 0));
    }

    #[test]
    fn test_labels_round_trip() {
        for track_type in [TrackType::Simplex, TrackType::Duplex, TrackType::DuplexHalfed] {
            assert_eq!(TrackType::from_label(track_type.label()), Some(track_type));
        }
    }
}
