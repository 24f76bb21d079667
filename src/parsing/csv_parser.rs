//! Ingestion of the flight schedule export into typed records.
//!
//! The export is read into a Polars DataFrame with every column as text;
//! timestamp and passenger-count parsing happens during typed extraction so
//! that bad values are counted per row instead of silently coerced to null.

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::flight::{Direction, FlightRecord};
use crate::parsing::schema::{self, canonical, Scheme};

/// How many per-row issue messages are kept verbatim; the counters carry
/// the totals.
const ISSUE_LIMIT: usize = 5;

/// Per-direction ingestion outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectionIngest {
    /// Header scheme the direction's columns matched.
    pub scheme: String,
    pub rows_seen: usize,
    pub legs_ingested: usize,
    /// Rows whose leg fields were entirely blank for this direction
    /// (one-legged rotations in turnaround exports). Not errors.
    pub blank_legs_skipped: usize,
    pub bad_timestamps: usize,
    pub bad_pax_counts: usize,
    pub negative_pax_counts: usize,
    /// First few issue messages, capped at [`ISSUE_LIMIT`].
    pub issues: Vec<String>,
}

impl DirectionIngest {
    fn record_issue(&mut self, message: String) {
        if self.issues.len() < ISSUE_LIMIT {
            self.issues.push(message);
        }
    }

    pub fn excluded_rows(&self) -> usize {
        self.bad_timestamps + self.bad_pax_counts + self.negative_pax_counts
    }
}

/// Combined ingestion outcome for both directions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub arrival: DirectionIngest,
    pub departure: DirectionIngest,
}

impl IngestReport {
    pub fn excluded_rows(&self) -> usize {
        self.arrival.excluded_rows() + self.departure.excluded_rows()
    }
}

/// Read a schedule export CSV into a DataFrame with all-text columns.
///
/// Type inference is disabled on purpose: typed extraction parses
/// timestamps and counts itself so parse failures stay visible.
pub fn read_flight_table(csv_path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()?;
    Ok(df)
}

/// Project one direction's columns onto the canonical schema.
///
/// Header names are whitespace-trimmed before scheme matching; values are
/// cast to text so extraction is uniform regardless of how the table was
/// produced.
pub fn canonical_frame(df: &DataFrame, direction: Direction) -> Result<(DataFrame, Scheme)> {
    let actual: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let trimmed: Vec<String> = actual.iter().map(|s| s.trim().to_string()).collect();

    let resolved = schema::resolve_columns(&trimmed, direction)?;

    let exprs: Vec<Expr> = resolved
        .columns
        .iter()
        .map(|(source, canon)| {
            let idx = trimmed
                .iter()
                .position(|t| t == source)
                .expect("resolved column came from the trimmed header set");
            col(actual[idx].as_str())
                .cast(DataType::String)
                .alias(*canon)
        })
        .collect();

    let canon_df = df.clone().lazy().select(exprs).collect()?;
    Ok((canon_df, resolved.scheme))
}

/// Extract one direction's flight legs from the raw table.
///
/// Rows with unparseable timestamps or missing/invalid passenger counts are
/// excluded and counted; rows whose leg fields are entirely blank are
/// skipped separately.
pub fn extract_flights(
    df: &DataFrame,
    direction: Direction,
) -> Result<(Vec<FlightRecord>, DirectionIngest)> {
    let (canon_df, scheme) = canonical_frame(df, direction)?;
    debug!(
        direction = direction.label(),
        scheme = scheme.label(),
        rows = canon_df.height(),
        "resolved export columns"
    );

    let mut ingest = DirectionIngest {
        scheme: scheme.label().to_string(),
        rows_seen: canon_df.height(),
        ..DirectionIngest::default()
    };

    let flight_numbers = canon_df.column(canonical::FLIGHT_NUMBER)?.str()?;
    let times = canon_df.column(canonical::SCHEDULED_TIME)?.str()?;
    let stands = canon_df.column(canonical::STAND)?.str()?;
    let terminals = canon_df.column(canonical::TERMINAL)?.str()?;
    let pax_counts = canon_df.column(canonical::PAX_COUNT)?.str()?;
    let aircraft_types = canon_df.column(canonical::AIRCRAFT_TYPE)?.str()?;
    let stand_types = canon_df.column(canonical::STAND_TYPE)?.str()?;

    let airline_codes = canon_df
        .column(canonical::AIRLINE_CODE)
        .ok()
        .and_then(|c| c.str().ok());
    let flight_types = canon_df
        .column(canonical::FLIGHT_TYPE)
        .ok()
        .and_then(|c| c.str().ok());
    let flight_directions = canon_df
        .column(canonical::FLIGHT_DIRECTION)
        .ok()
        .and_then(|c| c.str().ok());
    let airport_codes = canon_df
        .column(canonical::AIRPORT_CODE)
        .ok()
        .and_then(|c| c.str().ok());

    let mut records = Vec::new();

    for i in 0..canon_df.height() {
        let number = nonblank(flight_numbers.get(i));
        let time_raw = nonblank(times.get(i));
        let pax_raw = nonblank(pax_counts.get(i));

        if number.is_none() && time_raw.is_none() && pax_raw.is_none() {
            ingest.blank_legs_skipped += 1;
            continue;
        }

        let scheduled_time = match time_raw {
            Some(raw) => match parse_timestamp(raw) {
                Ok(t) => t,
                Err(e) => {
                    ingest.bad_timestamps += 1;
                    ingest.record_issue(format!("row {}: {}", i, e));
                    continue;
                }
            },
            None => {
                ingest.bad_timestamps += 1;
                ingest.record_issue(format!("row {}: missing scheduled block time", i));
                continue;
            }
        };

        let pax_count = match pax_raw {
            Some(raw) => match parse_pax(raw) {
                Ok(p) => p,
                Err(PaxIssue::Negative) => {
                    ingest.negative_pax_counts += 1;
                    ingest.record_issue(format!("row {}: negative pax count {:?}", i, raw));
                    continue;
                }
                Err(PaxIssue::Unparseable) => {
                    ingest.bad_pax_counts += 1;
                    ingest.record_issue(format!("row {}: unparseable pax count {:?}", i, raw));
                    continue;
                }
            },
            None => {
                ingest.bad_pax_counts += 1;
                ingest.record_issue(format!("row {}: missing pax count", i));
                continue;
            }
        };

        records.push(FlightRecord {
            direction,
            flight_number: number.unwrap_or("").to_string(),
            scheduled_time,
            stand: stands.get(i).unwrap_or("").to_string(),
            terminal: terminals.get(i).map(|s| s.to_string()),
            pax_count,
            aircraft_type: aircraft_types.get(i).map(|s| s.to_string()),
            stand_type: stand_types.get(i).map(|s| s.to_string()),
            airline_code: airline_codes.and_then(|c| c.get(i)).map(|s| s.to_string()),
            flight_type: flight_types.and_then(|c| c.get(i)).map(|s| s.to_string()),
            flight_direction: flight_directions
                .and_then(|c| c.get(i))
                .map(|s| s.to_string()),
            airport_code: airport_codes.and_then(|c| c.get(i)).map(|s| s.to_string()),
        });
    }

    ingest.legs_ingested = records.len();
    Ok((records, ingest))
}

fn nonblank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Timestamp formats seen in schedule exports: ISO with space or `T`
/// separator (optional seconds and fraction) and the day-first form.
const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a scheduled block time. Anything unrecognized is a `ParseError`
/// the caller counts, never a silent null.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(t);
        }
    }
    Err(Error::Parse(format!("unrecognized timestamp {:?}", raw)))
}

#[derive(Debug)]
enum PaxIssue {
    Negative,
    Unparseable,
}

fn parse_pax(raw: &str) -> std::result::Result<u32, PaxIssue> {
    let value: f64 = raw.parse().map_err(|_| PaxIssue::Unparseable)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(PaxIssue::Unparseable);
    }
    if value < 0.0 {
        return Err(PaxIssue::Negative);
    }
    Ok(value as u32)
}
