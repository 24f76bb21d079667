//! Discretized time grid and per-category demand counts.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::flight::GateWindow;

/// A fixed-step grid of sample points covering the observation horizon.
///
/// The grid runs from midnight of the earliest day touched by a gate window
/// through the last tick of the latest day (23:55 for a 5-minute tick), so
/// every window of the run falls inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickGrid {
    start: NaiveDateTime,
    tick_secs: i64,
    len: usize,
}

impl TickGrid {
    /// Build the grid spanning all given windows. `None` when there are no
    /// windows to span.
    pub fn spanning(windows: &[GateWindow], tick: Duration) -> Option<Self> {
        let min_start = windows.iter().map(|w| w.start).min()?;
        let max_end = windows.iter().map(|w| w.end).max()?;

        let start = min_start.date().and_hms_opt(0, 0, 0)?;
        let last_day_start = max_end.date().and_hms_opt(0, 0, 0)?;
        let tick_secs = tick.num_seconds();
        // Last tick of the latest relevant day: midnight + 1 day - tick.
        let end = last_day_start + Duration::days(1) - tick;

        let len = ((end - start).num_seconds() / tick_secs + 1) as usize;
        Some(Self {
            start,
            tick_secs,
            len,
        })
    }

    /// A zero-length grid, used for the valid-but-empty result.
    pub fn empty(tick: Duration) -> Self {
        Self {
            start: NaiveDateTime::default(),
            tick_secs: tick.num_seconds(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn tick(&self) -> Duration {
        Duration::seconds(self.tick_secs)
    }

    /// Timestamp of the `idx`-th sample point.
    pub fn time_at(&self, idx: usize) -> NaiveDateTime {
        self.start + Duration::seconds(self.tick_secs * idx as i64)
    }

    pub fn iter_times(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len).map(|i| self.time_at(i))
    }

    /// Same origin, `factor`-times wider ticks. Used for the reporting
    /// resample.
    pub(crate) fn coarsened(&self, factor: usize, len: usize) -> Self {
        Self {
            start: self.start,
            tick_secs: self.tick_secs * factor as i64,
            len,
        }
    }

    /// Grid indices of the closed interval `[start, end]`, clipped to the
    /// horizon. Unaligned boundaries round inward: the first tick is the
    /// first grid point >= `start`, the last is the last grid point <=
    /// `end`. Returns `None` when no tick falls inside the interval.
    pub fn tick_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<(usize, usize)> {
        if self.len == 0 || end < start {
            return None;
        }
        let start_offset = (start - self.start).num_seconds();
        let end_offset = (end - self.start).num_seconds();

        let first = start_offset.div_euclid(self.tick_secs)
            + i64::from(start_offset.rem_euclid(self.tick_secs) != 0);
        let last = end_offset.div_euclid(self.tick_secs);

        // Clip to the horizon rather than dropping the window.
        let first = first.max(0) as usize;
        if last < 0 {
            return None;
        }
        let last = (last as usize).min(self.len - 1);
        (first <= last).then_some((first, last))
    }
}

/// One non-negative count per grid tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemandSeries {
    counts: Vec<u32>,
}

impl DemandSeries {
    pub fn zeros(len: usize) -> Self {
        Self {
            counts: vec![0; len],
        }
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn into_counts(self) -> Vec<u32> {
        self.counts
    }

    /// Add `amount` to every tick of the closed index range.
    pub fn add_range(&mut self, first: usize, last: usize, amount: u32) {
        for count in &mut self.counts[first..=last] {
            *count += amount;
        }
    }

    /// Elementwise sum of two series over the same grid.
    pub fn combined(&self, other: &Self) -> Self {
        debug_assert_eq!(self.counts.len(), other.counts.len());
        Self {
            counts: self
                .counts
                .iter()
                .zip(&other.counts)
                .map(|(a, b)| a + b)
                .collect(),
        }
    }
}
