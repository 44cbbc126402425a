//! Survey waypoint records.
//!
//! Each line's geometry comes from a spreadsheet export with one row per
//! surveyed waypoint. Only a handful of columns matter:
//!
//! | column | meaning |
//! |-------:|---------|
//! | 0  | waypoint index within its spur (0 starts a new spur) |
//! | 1  | longitude |
//! | 2  | latitude |
//! | 10 | number of LEDs between the previous waypoint and this one |
//! | 14 | Δlon from the previous waypoint to the first LED |
//! | 15 | Δlat from the previous waypoint to the first LED |
//! | 16 | Δlon between consecutive LEDs |
//! | 17 | Δlat between consecutive LEDs |
//! | 18 | survey segment id |

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::geo::{Coordinate, InvalidCoordinate};

use super::error::GeometryError;

const COL_INDEX: usize = 0;
const COL_LON: usize = 1;
const COL_LAT: usize = 2;
const COL_LED_COUNT: usize = 10;
const COL_DLON_OFFSET: usize = 14;
const COL_DLAT_OFFSET: usize = 15;
const COL_DLON_LED: usize = 16;
const COL_DLAT_LED: usize = 17;
const COL_SEGMENT: usize = 18;

/// One surveyed waypoint.
///
/// Numeric cells that were empty in the source are `None`; whether that is
/// acceptable depends on where the waypoint sits in its spur, which the
/// builder decides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointRecord {
    /// 1-based row in the source file, for diagnostics.
    pub row: u64,
    pub index: usize,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub led_count: Option<u32>,
    pub dlon_offset: Option<f64>,
    pub dlat_offset: Option<f64>,
    pub dlon_led: Option<f64>,
    pub dlat_led: Option<f64>,
    pub segment_id: Option<u32>,
}

impl WaypointRecord {
    /// The waypoint's own position, if both components are present.
    pub fn coordinate(&self) -> Option<Result<Coordinate, InvalidCoordinate>> {
        Some(Coordinate::new(self.lat?, self.lon?))
    }
}

/// Read all waypoint rows from a survey CSV.
///
/// Rows with an empty index cell are spreadsheet padding and are skipped.
/// A non-numeric index is accepted once, before any data row, as a header.
pub fn read_waypoints<R: Read>(reader: R) -> Result<Vec<WaypointRecord>, GeometryError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut seen_header = false;

    for result in rdr.records() {
        let record = result?;
        let row = record.position().map(|p| p.line()).unwrap_or(0);

        let index_cell = field(&record, COL_INDEX);
        if index_cell.is_empty() {
            continue;
        }

        let index = match parse_integer(index_cell) {
            Some(index) => index as usize,
            None if records.is_empty() && !seen_header => {
                seen_header = true;
                continue;
            }
            None => {
                return Err(GeometryError::MalformedField {
                    row,
                    column: "waypoint index",
                    value: index_cell.to_string(),
                });
            }
        };

        records.push(WaypointRecord {
            row,
            index,
            lon: float_field(&record, row, COL_LON, "longitude")?,
            lat: float_field(&record, row, COL_LAT, "latitude")?,
            led_count: integer_field(&record, row, COL_LED_COUNT, "LED count")?,
            dlon_offset: float_field(&record, row, COL_DLON_OFFSET, "offset longitude delta")?,
            dlat_offset: float_field(&record, row, COL_DLAT_OFFSET, "offset latitude delta")?,
            dlon_led: float_field(&record, row, COL_DLON_LED, "LED longitude delta")?,
            dlat_led: float_field(&record, row, COL_DLAT_LED, "LED latitude delta")?,
            segment_id: integer_field(&record, row, COL_SEGMENT, "segment id")?,
        });
    }

    Ok(records)
}

/// Split a flat record list into spurs.
///
/// Index 0 starts a new spur and indices must then count up by one. A
/// skipped or repeated waypoint would shift every LED after it, so it is
/// rejected rather than tolerated.
pub fn group_into_spurs(
    records: Vec<WaypointRecord>,
) -> Result<Vec<Vec<WaypointRecord>>, GeometryError> {
    let mut spurs: Vec<Vec<WaypointRecord>> = Vec::new();

    for record in records {
        if record.index == 0 {
            spurs.push(vec![record]);
            continue;
        }

        let Some(current) = spurs.last_mut() else {
            return Err(GeometryError::OrphanWaypoint {
                row: record.row,
                index: record.index,
            });
        };

        let expected = current.len();
        if record.index != expected {
            return Err(GeometryError::WaypointOutOfOrder {
                row: record.row,
                expected,
                found: record.index,
            });
        }

        current.push(record);
    }

    Ok(spurs)
}

fn field(record: &StringRecord, col: usize) -> &str {
    record.get(col).unwrap_or("")
}

fn float_field(
    record: &StringRecord,
    row: u64,
    col: usize,
    column: &'static str,
) -> Result<Option<f64>, GeometryError> {
    let cell = field(record, col);
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(GeometryError::MalformedField {
            row,
            column,
            value: cell.to_string(),
        }),
    }
}

fn integer_field(
    record: &StringRecord,
    row: u64,
    col: usize,
    column: &'static str,
) -> Result<Option<u32>, GeometryError> {
    let cell = field(record, col);
    if cell.is_empty() {
        return Ok(None);
    }
    parse_integer(cell)
        .map(Some)
        .ok_or_else(|| GeometryError::MalformedField {
            row,
            column,
            value: cell.to_string(),
        })
}

/// Spreadsheets export counts as either `12` or `12.0`.
fn parse_integer(cell: &str) -> Option<u32> {
    if let Ok(v) = cell.parse::<u32>() {
        return Some(v);
    }
    let v = cell.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Some(v as u32)
    } else {
        None
    }
}
