//! Domain models for flight legs and their bus-service windows.
//!
//! One `FlightRecord` is one arrival or departure leg read from the schedule
//! export. Everything derived from it (terminal class, gate window) is a new
//! immutable value; nothing mutates the record after ingestion.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::config::ServiceParams;

/// Which leg of a rotation a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Arrival,
    Departure,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Arrival => "Arrival",
            Direction::Departure => "Departure",
        }
    }
}

/// Terminal classification of a flight leg.
///
/// Classified once per record by case-sensitive substring match on the
/// terminal text (International checked before Domestic); blank or missing
/// text is `Unknown`. All downstream branching is on this variant, never on
/// re-matched strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TerminalClass {
    International,
    Domestic,
    Unknown,
}

impl TerminalClass {
    pub fn classify(terminal: Option<&str>) -> Self {
        match terminal {
            Some(text) if text.contains("International") => TerminalClass::International,
            Some(text) if text.contains("Domestic") => TerminalClass::Domestic,
            _ => TerminalClass::Unknown,
        }
    }
}

/// One flight leg in the canonical schema. Immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub direction: Direction,
    pub flight_number: String,
    pub scheduled_time: NaiveDateTime,
    pub stand: String,
    pub terminal: Option<String>,
    pub pax_count: u32,
    pub aircraft_type: Option<String>,
    /// Stand handling type text; must contain "Remote" to qualify for
    /// bus service.
    pub stand_type: Option<String>,
    pub airline_code: Option<String>,
    pub flight_type: Option<String>,
    pub flight_direction: Option<String>,
    pub airport_code: Option<String>,
}

impl FlightRecord {
    pub fn terminal_class(&self) -> TerminalClass {
        TerminalClass::classify(self.terminal.as_deref())
    }

    /// The interval during which this flight occupies bus service, or
    /// `None` when the terminal class is `Unknown`. Unknown-class flights
    /// carry no defined rollover and are excluded before accumulation.
    pub fn gate_window(&self, params: &ServiceParams) -> Option<GateWindow> {
        let rollover = params.rollover(self.terminal_class())?;
        Some(GateWindow::for_leg(
            self.direction,
            self.scheduled_time,
            rollover,
        ))
    }
}

/// Bus-service occupancy interval of one flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl GateWindow {
    /// Arrivals occupy `[scheduled, scheduled + rollover]`; departures
    /// occupy `[scheduled - rollover, scheduled]`.
    pub fn for_leg(direction: Direction, scheduled: NaiveDateTime, rollover: Duration) -> Self {
        match direction {
            Direction::Arrival => Self {
                start: scheduled,
                end: scheduled + rollover,
            },
            Direction::Departure => Self {
                start: scheduled - rollover,
                end: scheduled,
            },
        }
    }
}
