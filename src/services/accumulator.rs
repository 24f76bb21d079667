//! Tick-by-tick accumulation of concurrent bus demand.

use chrono::{Duration, NaiveDateTime};

use crate::models::series::{DemandSeries, TickGrid};
use crate::services::demand::DemandProfile;

/// One flight of a (direction, terminal) segment, ready to accumulate.
#[derive(Debug, Clone, Copy)]
pub struct SegmentFlight {
    pub gate_start: NaiveDateTime,
    pub profile: DemandProfile,
}

/// Sum the buses in use per tick across a segment's flights.
///
/// The rollover is passed per call so each segment accumulates over its own
/// terminal-specific window width; the accumulation interval
/// `[gate_start, gate_start + rollover]` then coincides with the flight's
/// gate window. Both interval ends are inclusive, and windows reaching
/// outside the grid are clipped, never dropped.
///
/// An odd trip count leaves one bus making a shorter final run: that bus
/// occupies only the first half of the window while the rest of the fleet
/// spans all of it. Even trip counts load the whole fleet uniformly.
pub fn accumulate(grid: &TickGrid, flights: &[SegmentFlight], rollover: Duration) -> DemandSeries {
    let mut series = DemandSeries::zeros(grid.len());
    let half = Duration::seconds(rollover.num_seconds() / 2);

    for flight in flights {
        let start = flight.gate_start;
        let buses = flight.profile.buses_needed;

        if flight.profile.is_odd_trip_count() {
            if buses > 1 {
                if let Some((first, last)) = grid.tick_range(start, start + rollover) {
                    series.add_range(first, last, buses - 1);
                }
            }
            if let Some((first, last)) = grid.tick_range(start, start + half) {
                series.add_range(first, last, 1);
            }
        } else if let Some((first, last)) = grid.tick_range(start, start + rollover) {
            series.add_range(first, last, buses);
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::flight::GateWindow;

    fn grid_for_day() -> TickGrid {
        let windows = vec![GateWindow {
            start: "2025-03-01T10:00:00".parse().unwrap(),
            end: "2025-03-01T10:45:00".parse().unwrap(),
        }];
        TickGrid::spanning(&windows, Duration::minutes(5)).unwrap()
    }

    fn flight(start: &str, trips: u32, buses: u32) -> SegmentFlight {
        SegmentFlight {
            gate_start: start.parse().unwrap(),
            profile: DemandProfile {
                trips_needed: trips,
                buses_needed: buses,
            },
        }
    }

    fn count_at(grid: &TickGrid, series: &DemandSeries, time: &str) -> u32 {
        let t: NaiveDateTime = time.parse().unwrap();
        let idx = ((t - grid.start()).num_seconds() / grid.tick().num_seconds()) as usize;
        series.counts()[idx]
    }

    #[test]
    fn test_odd_trips_split_full_and_half_window() {
        let grid = grid_for_day();
        // trips = 3 (odd), buses = 2: one bus over the full 45 minutes,
        // one extra over only the first 22.5 minutes (ticks +0..+20)
        let series = accumulate(
            &grid,
            &[flight("2025-03-01T10:00:00", 3, 2)],
            Duration::minutes(45),
        );

        assert_eq!(count_at(&grid, &series, "2025-03-01T10:00:00"), 2);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:20:00"), 2);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:25:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:45:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:50:00"), 0);
        assert_eq!(count_at(&grid, &series, "2025-03-01T09:55:00"), 0);
    }

    #[test]
    fn test_even_trips_uniform_over_window() {
        let grid = grid_for_day();
        let series = accumulate(
            &grid,
            &[flight("2025-03-01T10:00:00", 2, 1)],
            Duration::minutes(45),
        );

        assert_eq!(count_at(&grid, &series, "2025-03-01T10:00:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:25:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:45:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:50:00"), 0);
    }

    #[test]
    fn test_single_odd_trip_only_half_window() {
        let grid = grid_for_day();
        // trips = 1 (odd), buses = 1: no full-window contribution at all
        let series = accumulate(
            &grid,
            &[flight("2025-03-01T10:15:00", 1, 1)],
            Duration::minutes(15),
        );

        assert_eq!(count_at(&grid, &series, "2025-03-01T10:15:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:20:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:25:00"), 0);
    }

    #[test]
    fn test_window_clipped_at_grid_end() {
        let grid = grid_for_day();
        let series = accumulate(
            &grid,
            &[flight("2025-03-01T23:40:00", 2, 1)],
            Duration::minutes(45),
        );

        assert_eq!(count_at(&grid, &series, "2025-03-01T23:40:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T23:55:00"), 1);
    }

    #[test]
    fn test_overlapping_flights_sum() {
        let grid = grid_for_day();
        let series = accumulate(
            &grid,
            &[
                flight("2025-03-01T10:00:00", 2, 1),
                flight("2025-03-01T10:30:00", 2, 2),
            ],
            Duration::minutes(45),
        );

        assert_eq!(count_at(&grid, &series, "2025-03-01T10:25:00"), 1);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:30:00"), 3);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:45:00"), 3);
        assert_eq!(count_at(&grid, &series, "2025-03-01T10:50:00"), 2);
    }
}
