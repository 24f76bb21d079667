//! Header schemes of the flight schedule export.
//!
//! Two naming conventions exist in practice: the direct scheme
//! (`Arrival Flight.<field>` / `Departure Flight.<field>`) and the
//! turnaround scheme with a `Turnaround.` prefix. Both carry the same
//! fields; resolution picks whichever scheme is present and maps its
//! columns onto the canonical names the rest of the pipeline uses.

use crate::error::{Error, Result};
use crate::models::flight::Direction;

/// Canonical column names shared by both directions after ingestion.
pub mod canonical {
    pub const FLIGHT_NUMBER: &str = "Flight_Number";
    pub const SCHEDULED_TIME: &str = "Scheduled_Time";
    pub const STAND: &str = "Stand";
    pub const TERMINAL: &str = "Terminal";
    pub const PAX_COUNT: &str = "Pax_Count";
    pub const AIRCRAFT_TYPE: &str = "Aircraft_Type";
    pub const STAND_TYPE: &str = "Stand Type";
    pub const AIRLINE_CODE: &str = "Airline_Code";
    pub const FLIGHT_TYPE: &str = "Flight_Type";
    pub const FLIGHT_DIRECTION: &str = "Flight_Direction";
    pub const AIRPORT_CODE: &str = "Airport_Code";
}

/// Source field suffixes that must be present for a direction.
const REQUIRED_FIELDS: [(&str, &str); 7] = [
    ("Flight Number [String]", canonical::FLIGHT_NUMBER),
    ("Scheduled Block Time [Date/Time]", canonical::SCHEDULED_TIME),
    ("Stand Name [String]", canonical::STAND),
    ("Terminal [String]", canonical::TERMINAL),
    ("Pax Count [Integer]", canonical::PAX_COUNT),
    ("Aircraft Type [String]", canonical::AIRCRAFT_TYPE),
    (
        "Stand.Stand Type [Enumeration:TStandHandlingType]",
        canonical::STAND_TYPE,
    ),
];

/// Source field suffixes carried through when the export has them.
const OPTIONAL_FIELDS: [(&str, &str); 4] = [
    ("Airline Code [String]", canonical::AIRLINE_CODE),
    ("Flight Type [String]", canonical::FLIGHT_TYPE),
    ("Flight Direction [String]", canonical::FLIGHT_DIRECTION),
    ("Airport Code [String]", canonical::AIRPORT_CODE),
];

/// One of the two known header-naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Direct,
    Turnaround,
}

impl Scheme {
    fn prefix(&self) -> &'static str {
        match self {
            Scheme::Direct => "",
            Scheme::Turnaround => "Turnaround.",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scheme::Direct => "direct",
            Scheme::Turnaround => "turnaround",
        }
    }

    fn source_header(&self, direction: Direction, field: &str) -> String {
        format!("{}{} Flight.{}", self.prefix(), direction.label(), field)
    }
}

/// Outcome of matching one direction's columns against the headers.
#[derive(Debug, Clone)]
pub struct ResolvedColumns {
    pub scheme: Scheme,
    /// `(source header, canonical name)` pairs, required fields first.
    pub columns: Vec<(String, &'static str)>,
}

/// Resolve which scheme a header set uses for a direction.
///
/// Headers are expected pre-trimmed. Fails with a `SchemaError` naming the
/// direction, the closest-matching scheme, and its missing columns when
/// neither scheme is fully present.
pub fn resolve_columns(headers: &[String], direction: Direction) -> Result<ResolvedColumns> {
    let mut best: Option<(Scheme, Vec<String>)> = None;

    for scheme in [Scheme::Direct, Scheme::Turnaround] {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .map(|(field, _)| scheme.source_header(direction, field))
            .filter(|header| !headers.iter().any(|h| h == header))
            .collect();

        if missing.is_empty() {
            let mut columns: Vec<(String, &'static str)> = REQUIRED_FIELDS
                .iter()
                .map(|(field, canon)| (scheme.source_header(direction, field), *canon))
                .collect();
            for (field, canon) in OPTIONAL_FIELDS {
                let header = scheme.source_header(direction, field);
                if headers.iter().any(|h| *h == header) {
                    columns.push((header, canon));
                }
            }
            return Ok(ResolvedColumns { scheme, columns });
        }

        match &best {
            Some((_, best_missing)) if best_missing.len() <= missing.len() => {}
            _ => best = Some((scheme, missing)),
        }
    }

    let (scheme, missing) = best.expect("two schemes were examined");
    Err(Error::Schema(format!(
        "no known header scheme matches the {} columns; closest is the {} scheme, missing: {}",
        direction.label(),
        scheme.label(),
        missing.join(", ")
    )))
}
