//! Category combination, peak demand, and reporting-grid resampling.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::series::{DemandSeries, TickGrid};

/// The combined demand table: one count per category per tick.
///
/// A Domestic flight contributes to both its direction's category and the
/// Domestic category, so for every tick
/// `domestic[t] <= arrival[t] + departure[t]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandTable {
    pub grid: TickGrid,
    pub arrival: Vec<u32>,
    pub departure: Vec<u32>,
    pub domestic: Vec<u32>,
}

/// Peak concurrent bus demand over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Peak {
    pub buses: u32,
    /// Earliest tick attaining the peak; `None` for an empty horizon.
    pub tick: Option<NaiveDateTime>,
}

impl DemandTable {
    /// Merge the four per-segment series into the category table.
    pub fn combine(
        grid: TickGrid,
        arrival_international: &DemandSeries,
        arrival_domestic: &DemandSeries,
        departure_international: &DemandSeries,
        departure_domestic: &DemandSeries,
    ) -> Self {
        let arrival = arrival_international.combined(arrival_domestic);
        let departure = departure_international.combined(departure_domestic);
        let domestic = arrival_domestic.combined(departure_domestic);
        Self {
            grid,
            arrival: arrival.into_counts(),
            departure: departure.into_counts(),
            domestic: domestic.into_counts(),
        }
    }

    /// An empty table for runs with no accumulable flights.
    pub fn empty(grid: TickGrid) -> Self {
        Self {
            grid,
            arrival: Vec::new(),
            departure: Vec::new(),
            domestic: Vec::new(),
        }
    }

    /// Peak of `arrival[t] + departure[t]`. Domestic is informational and
    /// already counted inside the direction categories, so it is not added
    /// a second time.
    pub fn peak(&self) -> Peak {
        let mut peak = Peak {
            buses: 0,
            tick: None,
        };
        for (idx, (a, d)) in self.arrival.iter().zip(&self.departure).enumerate() {
            let total = a + d;
            if peak.tick.is_none() || total > peak.buses {
                peak.buses = total;
                peak.tick = Some(self.grid.time_at(idx));
            }
        }
        peak
    }

    /// Resample onto a grid coarsened by `factor` ticks per bucket, taking
    /// the per-category maximum within each left-closed, left-labeled
    /// bucket so peaks survive.
    pub fn resample_max(&self, factor: usize) -> Self {
        let factor = factor.max(1);
        let coarse_len = self.grid.len().div_ceil(factor);
        let coarse_grid = self.grid.coarsened(factor, coarse_len);

        let resample = |counts: &[u32]| -> Vec<u32> {
            (0..coarse_len)
                .map(|bucket| {
                    let lo = bucket * factor;
                    let hi = ((bucket + 1) * factor).min(counts.len());
                    counts[lo..hi].iter().copied().max().unwrap_or(0)
                })
                .collect()
        };

        Self {
            grid: coarse_grid,
            arrival: resample(&self.arrival),
            departure: resample(&self.departure),
            domestic: resample(&self.domestic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::models::flight::GateWindow;

    fn small_grid() -> TickGrid {
        let windows = vec![GateWindow {
            start: "2025-03-01T00:00:00".parse().unwrap(),
            end: "2025-03-01T01:00:00".parse().unwrap(),
        }];
        TickGrid::spanning(&windows, Duration::minutes(5)).unwrap()
    }

    fn series_with(grid: &TickGrid, first: usize, last: usize, amount: u32) -> DemandSeries {
        let mut s = DemandSeries::zeros(grid.len());
        s.add_range(first, last, amount);
        s
    }

    #[test]
    fn test_combine_categories() {
        let grid = small_grid();
        let arr_int = series_with(&grid, 0, 2, 2);
        let arr_dom = series_with(&grid, 1, 3, 1);
        let dep_int = series_with(&grid, 2, 4, 1);
        let dep_dom = series_with(&grid, 0, 0, 3);

        let table = DemandTable::combine(grid, &arr_int, &arr_dom, &dep_int, &dep_dom);

        assert_eq!(&table.arrival[0..5], &[2, 3, 3, 1, 0]);
        assert_eq!(&table.departure[0..5], &[3, 0, 1, 1, 1]);
        assert_eq!(&table.domestic[0..5], &[4, 1, 1, 1, 0]);

        // Domestic never exceeds the direction totals
        for i in 0..table.grid.len() {
            assert!(table.domestic[i] <= table.arrival[i] + table.departure[i]);
        }
    }

    #[test]
    fn test_peak_excludes_domestic_double_count() {
        let grid = small_grid();
        let arr_dom = series_with(&grid, 0, 1, 2);
        let dep_dom = series_with(&grid, 1, 2, 3);
        let zeros = DemandSeries::zeros(grid.len());

        let table = DemandTable::combine(grid.clone(), &zeros, &arr_dom, &zeros, &dep_dom);
        let peak = table.peak();

        // arrival+departure peaks at tick 1 with 2+3; the domestic column
        // (also 5 there) must not double it to 10
        assert_eq!(peak.buses, 5);
        assert_eq!(peak.tick, Some(grid.time_at(1)));
    }

    #[test]
    fn test_peak_takes_earliest_tie() {
        let grid = small_grid();
        let arr = series_with(&grid, 2, 6, 4);
        let zeros = DemandSeries::zeros(grid.len());
        let table = DemandTable::combine(grid.clone(), &arr, &zeros, &zeros, &zeros);

        assert_eq!(table.peak().tick, Some(grid.time_at(2)));
    }

    #[test]
    fn test_empty_table_peak_is_zero() {
        let table = DemandTable::empty(TickGrid::empty(Duration::minutes(5)));
        let peak = table.peak();
        assert_eq!(peak.buses, 0);
        assert!(peak.tick.is_none());
    }

    #[test]
    fn test_resample_takes_bucket_maximum() {
        let grid = small_grid();
        let mut arr = DemandSeries::zeros(grid.len());
        arr.add_range(1, 1, 7);
        arr.add_range(4, 5, 2);
        let zeros = DemandSeries::zeros(grid.len());
        let table = DemandTable::combine(grid, &arr, &zeros, &zeros, &zeros);

        let coarse = table.resample_max(3);
        assert_eq!(coarse.grid.len(), table.grid.len().div_ceil(3));
        assert_eq!(coarse.arrival[0], 7);
        assert_eq!(coarse.arrival[1], 2);
        assert_eq!(coarse.grid.tick(), Duration::minutes(15));

        // Max-preserving per category
        assert_eq!(
            coarse.arrival.iter().max(),
            table.arrival.iter().max()
        );
    }
}
