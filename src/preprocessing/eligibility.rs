//! Eligibility filter for bus-served flights.

use serde::Serialize;

use crate::models::flight::{FlightRecord, TerminalClass};

/// Per-clause rejection counts from one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub kept: usize,
    /// Stand handling type did not contain "Remote".
    pub not_remote: usize,
    /// Terminal text present but matched neither International nor Domestic.
    pub unrecognized_terminal: usize,
    pub zero_pax: usize,
}

/// Keep the flights that need bus service.
///
/// A flight is kept iff its stand handling type contains "Remote"
/// (case-sensitive substring), its terminal is International, Domestic, or
/// blank/missing, and its passenger count is nonzero. Blank-terminal
/// flights pass here on purpose; they are excluded later at the window
/// stage because their class is `Unknown`, and that exclusion is counted
/// separately.
///
/// Returns an independent filtered copy; the input is never mutated.
pub fn filter_eligible(records: &[FlightRecord]) -> (Vec<FlightRecord>, FilterSummary) {
    let mut summary = FilterSummary::default();
    let mut kept = Vec::new();

    for record in records {
        let remote = record
            .stand_type
            .as_deref()
            .map(|s| s.contains("Remote"))
            .unwrap_or(false);
        if !remote {
            summary.not_remote += 1;
            continue;
        }

        let blank_terminal = record
            .terminal
            .as_deref()
            .map(|t| t.trim().is_empty())
            .unwrap_or(true);
        if record.terminal_class() == TerminalClass::Unknown && !blank_terminal {
            summary.unrecognized_terminal += 1;
            continue;
        }

        if record.pax_count == 0 {
            summary.zero_pax += 1;
            continue;
        }

        kept.push(record.clone());
    }

    summary.kept = kept.len();
    (kept, summary)
}
