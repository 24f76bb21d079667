//! End-to-end demand estimation pipeline.
//!
//! Ingest -> eligibility filter -> gate windows -> demand profiles ->
//! per-segment accumulation -> category aggregation. One run consumes one
//! input snapshot, owns all of its state, and recomputes everything; there
//! is no shared accumulator across invocations.

use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::ServiceParams;
use crate::error::Result;
use crate::models::flight::{Direction, FlightRecord, TerminalClass};
use crate::models::series::TickGrid;
use crate::parsing::csv_parser::{self, IngestReport};
use crate::preprocessing::eligibility::{filter_eligible, FilterSummary};
use crate::services::accumulator::{accumulate, SegmentFlight};
use crate::services::aggregate::{DemandTable, Peak};
use crate::services::demand::demand_profile;

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct DemandReport {
    /// Full-resolution demand table.
    pub table: DemandTable,
    /// Peak of the combined Arrival + Departure demand.
    pub peak: Peak,
    pub ingest: IngestReport,
    pub filter: FilterSummary,
    /// Eligible flights excluded before accumulation because their terminal
    /// was blank and no rollover is defined for them.
    pub unclassified_excluded: usize,
    /// Flights actually accumulated into the series.
    pub accumulated_flights: usize,
}

impl DemandReport {
    /// Demand table resampled to the coarser reporting grid.
    pub fn reporting_table(&self, params: &ServiceParams) -> DemandTable {
        let factor = (params.reporting_step_min / params.tick_min).max(1) as usize;
        self.table.resample_max(factor)
    }
}

/// The demand estimation pipeline, parametrized by service parameters.
pub struct DemandPipeline {
    params: ServiceParams,
}

impl DemandPipeline {
    /// Pipeline with the built-in default parameters.
    pub fn new() -> Self {
        Self {
            params: ServiceParams::default(),
        }
    }

    /// Pipeline with custom parameters, validated up front.
    pub fn with_params(params: ServiceParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ServiceParams {
        &self.params
    }

    /// Run the pipeline over a schedule export CSV.
    pub fn run_file(&self, path: &Path) -> Result<DemandReport> {
        let df = csv_parser::read_flight_table(path)?;
        self.run_dataframe(&df)
    }

    /// Run the pipeline over an in-memory flight table.
    pub fn run_dataframe(&self, df: &DataFrame) -> Result<DemandReport> {
        let (arrivals, arrival_ingest) = csv_parser::extract_flights(df, Direction::Arrival)?;
        let (departures, departure_ingest) =
            csv_parser::extract_flights(df, Direction::Departure)?;

        let mut records = arrivals;
        records.extend(departures);

        self.run_records(
            records,
            IngestReport {
                arrival: arrival_ingest,
                departure: departure_ingest,
            },
        )
    }

    /// Run the computation over already-ingested records.
    pub fn run_records(
        &self,
        records: Vec<FlightRecord>,
        ingest: IngestReport,
    ) -> Result<DemandReport> {
        let (eligible, filter) = filter_eligible(&records);
        debug!(
            eligible = filter.kept,
            not_remote = filter.not_remote,
            unrecognized_terminal = filter.unrecognized_terminal,
            zero_pax = filter.zero_pax,
            "eligibility filter applied"
        );

        // Split eligible flights into (direction, terminal) segments.
        // Unknown-terminal flights have no defined rollover and therefore
        // no window; they are excluded here, counted, never defaulted.
        let mut segments: [Vec<SegmentFlight>; 4] = std::array::from_fn(|_| Vec::new());
        let mut windows = Vec::with_capacity(eligible.len());
        let mut unclassified_excluded = 0usize;

        for record in &eligible {
            let Some(window) = record.gate_window(&self.params) else {
                unclassified_excluded += 1;
                continue;
            };
            let profile = demand_profile(record, &self.params);
            let segment = segment_index(record.direction, record.terminal_class());
            segments[segment].push(SegmentFlight {
                gate_start: window.start,
                profile,
            });
            windows.push(window);
        }

        if unclassified_excluded > 0 {
            warn!(
                count = unclassified_excluded,
                "excluded eligible flights with unclassified terminal"
            );
        }

        let accumulated_flights = windows.len();
        let Some(grid) = TickGrid::spanning(&windows, self.params.tick()) else {
            warn!("no accumulable flights; producing an empty demand series");
            let table = DemandTable::empty(TickGrid::empty(self.params.tick()));
            let peak = table.peak();
            return Ok(DemandReport {
                table,
                peak,
                ingest,
                filter,
                unclassified_excluded,
                accumulated_flights: 0,
            });
        };

        // Each segment accumulates over its own terminal rollover, so the
        // accumulation interval equals the gate window.
        let international = chrono::Duration::minutes(self.params.international_rollover_min);
        let domestic = chrono::Duration::minutes(self.params.domestic_rollover_min);

        let arrival_international = accumulate(&grid, &segments[0], international);
        let arrival_domestic = accumulate(&grid, &segments[1], domestic);
        let departure_international = accumulate(&grid, &segments[2], international);
        let departure_domestic = accumulate(&grid, &segments[3], domestic);

        let table = DemandTable::combine(
            grid,
            &arrival_international,
            &arrival_domestic,
            &departure_international,
            &departure_domestic,
        );
        let peak = table.peak();
        debug!(
            ticks = table.grid.len(),
            peak = peak.buses,
            flights = accumulated_flights,
            "demand series accumulated"
        );

        Ok(DemandReport {
            table,
            peak,
            ingest,
            filter,
            unclassified_excluded,
            accumulated_flights,
        })
    }
}

impl Default for DemandPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn segment_index(direction: Direction, class: TerminalClass) -> usize {
    match (direction, class) {
        (Direction::Arrival, TerminalClass::International) => 0,
        (Direction::Arrival, TerminalClass::Domestic) => 1,
        (Direction::Departure, TerminalClass::International) => 2,
        (Direction::Departure, TerminalClass::Domestic) => 3,
        (_, TerminalClass::Unknown) => unreachable!("unclassified flights carry no window"),
    }
}

/// Convenience function to run the whole pipeline over a CSV export.
pub fn estimate_demand(path: &Path, params: ServiceParams) -> Result<DemandReport> {
    DemandPipeline::with_params(params)?.run_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        direction: Direction,
        time: &str,
        terminal: Option<&str>,
        pax: u32,
        stand_type: &str,
    ) -> FlightRecord {
        FlightRecord {
            direction,
            flight_number: "XY100".to_string(),
            scheduled_time: time.parse().unwrap(),
            stand: "R1".to_string(),
            terminal: terminal.map(|t| t.to_string()),
            pax_count: pax,
            aircraft_type: None,
            stand_type: Some(stand_type.to_string()),
            airline_code: None,
            flight_type: None,
            flight_direction: None,
            airport_code: None,
        }
    }

    #[test]
    fn test_end_to_end_overlapping_scenario() {
        // International arrival 10:00 pax 180: trips = 3 (odd), buses = 2,
        // window 10:00-10:45, extra bus until 10:22:30.
        // Domestic departure 10:30 pax 30: trips = 1 (odd), buses = 1,
        // window 10:15-10:30, the single bus covers 10:15-10:22:30.
        let records = vec![
            record(
                Direction::Arrival,
                "2025-03-01T10:00:00",
                Some("International"),
                180,
                "Remote",
            ),
            record(
                Direction::Departure,
                "2025-03-01T10:30:00",
                Some("Domestic"),
                30,
                "Remote",
            ),
        ];

        let pipeline = DemandPipeline::new();
        let report = pipeline
            .run_records(records, IngestReport::default())
            .unwrap();

        assert_eq!(report.accumulated_flights, 2);
        assert_eq!(report.peak.buses, 3);
        assert_eq!(
            report.peak.tick,
            Some("2025-03-01T10:15:00".parse().unwrap())
        );

        // Domestic column carries only the departure leg
        let grid = &report.table.grid;
        let idx =
            |t: &str| -> usize {
                let t: chrono::NaiveDateTime = t.parse().unwrap();
                ((t - grid.start()).num_seconds() / grid.tick().num_seconds()) as usize
            };
        assert_eq!(report.table.domestic[idx("2025-03-01T10:15:00")], 1);
        assert_eq!(report.table.domestic[idx("2025-03-01T10:20:00")], 1);
        assert_eq!(report.table.domestic[idx("2025-03-01T10:25:00")], 0);
        assert_eq!(report.table.arrival[idx("2025-03-01T10:45:00")], 1);
    }

    #[test]
    fn test_blank_terminal_excluded_and_counted() {
        let records = vec![
            record(
                Direction::Arrival,
                "2025-03-01T10:00:00",
                None,
                100,
                "Remote",
            ),
            record(
                Direction::Arrival,
                "2025-03-01T10:00:00",
                Some("Domestic"),
                50,
                "Remote",
            ),
        ];

        let report = DemandPipeline::new()
            .run_records(records, IngestReport::default())
            .unwrap();

        assert_eq!(report.filter.kept, 2);
        assert_eq!(report.unclassified_excluded, 1);
        assert_eq!(report.accumulated_flights, 1);
    }

    #[test]
    fn test_no_eligible_flights_is_valid_and_empty() {
        let records = vec![record(
            Direction::Arrival,
            "2025-03-01T10:00:00",
            Some("International"),
            200,
            "Contact",
        )];

        let report = DemandPipeline::new()
            .run_records(records, IngestReport::default())
            .unwrap();

        assert!(report.table.grid.is_empty());
        assert_eq!(report.peak.buses, 0);
        assert!(report.peak.tick.is_none());
        assert_eq!(report.filter.not_remote, 1);
    }

    #[test]
    fn test_domestic_bounded_by_directions() {
        let records = vec![
            record(
                Direction::Arrival,
                "2025-03-01T08:00:00",
                Some("Domestic"),
                250,
                "Remote",
            ),
            record(
                Direction::Departure,
                "2025-03-01T08:20:00",
                Some("Domestic"),
                90,
                "Remote",
            ),
            record(
                Direction::Departure,
                "2025-03-01T09:00:00",
                Some("International"),
                400,
                "Remote",
            ),
        ];

        let report = DemandPipeline::new()
            .run_records(records, IngestReport::default())
            .unwrap();

        let table = &report.table;
        for i in 0..table.grid.len() {
            assert!(table.domestic[i] <= table.arrival[i] + table.departure[i]);
        }
    }
}
