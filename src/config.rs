//! Service parameter configuration file support.
//!
//! Bus capacity, rollovers, timeframes, and grid resolutions can be loaded
//! from a TOML file or taken from the built-in defaults.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::flight::{Direction, TerminalClass};

/// Parameters of the bus service model.
///
/// Two families of durations live here and must not be conflated: the
/// *timeframe* is direction-based and bounds how many trips one bus can make
/// (it feeds the `max_trips_per_bus` divisor), while the *rollover* is
/// terminal-based and sets how long a flight occupies bus service at the
/// gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceParams {
    /// Passengers carried per one-way bus trip.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: u32,
    /// Minutes available to serve one arriving flight.
    #[serde(default = "default_arrival_timeframe")]
    pub arrival_timeframe_min: i64,
    /// Minutes available to serve one departing flight.
    #[serde(default = "default_departure_timeframe")]
    pub departure_timeframe_min: i64,
    /// Gate occupancy in minutes for International-terminal flights.
    #[serde(default = "default_international_rollover")]
    pub international_rollover_min: i64,
    /// Gate occupancy in minutes for Domestic-terminal flights.
    #[serde(default = "default_domestic_rollover")]
    pub domestic_rollover_min: i64,
    /// Average one-way stand-terminal travel time in minutes.
    #[serde(default = "default_transit_time")]
    pub transit_time_min: f64,
    /// Resolution of the demand series in minutes.
    #[serde(default = "default_tick")]
    pub tick_min: i64,
    /// Resolution of the resampled reporting series in minutes.
    #[serde(default = "default_reporting_step")]
    pub reporting_step_min: i64,
}

fn default_bus_capacity() -> u32 {
    60
}

fn default_arrival_timeframe() -> i64 {
    45
}

fn default_departure_timeframe() -> i64 {
    45
}

fn default_international_rollover() -> i64 {
    45
}

fn default_domestic_rollover() -> i64 {
    15
}

fn default_transit_time() -> f64 {
    21.7
}

fn default_tick() -> i64 {
    5
}

fn default_reporting_step() -> i64 {
    15
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self {
            bus_capacity: default_bus_capacity(),
            arrival_timeframe_min: default_arrival_timeframe(),
            departure_timeframe_min: default_departure_timeframe(),
            international_rollover_min: default_international_rollover(),
            domestic_rollover_min: default_domestic_rollover(),
            transit_time_min: default_transit_time(),
            tick_min: default_tick(),
            reporting_step_min: default_reporting_step(),
        }
    }
}

impl ServiceParams {
    /// Load service parameters from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ServiceParams)` if the file parses and validates
    /// * `Err(Error::Config)` if the file cannot be read, parsed, or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse service parameters from a TOML string and validate them.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let params: ServiceParams = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        params.validate()?;
        Ok(params)
    }

    /// Check that every parameter is usable before any computation starts.
    pub fn validate(&self) -> Result<()> {
        if self.bus_capacity == 0 {
            return Err(Error::Config("bus_capacity must be >= 1".to_string()));
        }
        for (name, value) in [
            ("arrival_timeframe_min", self.arrival_timeframe_min),
            ("departure_timeframe_min", self.departure_timeframe_min),
            ("international_rollover_min", self.international_rollover_min),
            ("domestic_rollover_min", self.domestic_rollover_min),
            ("tick_min", self.tick_min),
            ("reporting_step_min", self.reporting_step_min),
        ] {
            if value <= 0 {
                return Err(Error::Config(format!("{} must be >= 1", name)));
            }
        }
        if !(self.transit_time_min > 0.0) {
            return Err(Error::Config("transit_time_min must be > 0".to_string()));
        }
        // A bus must fit at least one trip into each direction's timeframe,
        // otherwise buses_needed is undefined.
        for direction in [Direction::Arrival, Direction::Departure] {
            if self.max_trips_per_bus(direction) == 0 {
                return Err(Error::Config(format!(
                    "{} timeframe ({} min) is shorter than the transit time ({} min)",
                    direction.label(),
                    self.timeframe_minutes(direction),
                    self.transit_time_min
                )));
            }
        }
        if self.reporting_step_min % self.tick_min != 0 {
            return Err(Error::Config(format!(
                "reporting_step_min ({}) must be a multiple of tick_min ({})",
                self.reporting_step_min, self.tick_min
            )));
        }
        if 1440 % self.tick_min != 0 {
            return Err(Error::Config(format!(
                "tick_min ({}) must divide a day evenly",
                self.tick_min
            )));
        }
        Ok(())
    }

    /// Service timeframe in minutes for one direction.
    pub fn timeframe_minutes(&self, direction: Direction) -> i64 {
        match direction {
            Direction::Arrival => self.arrival_timeframe_min,
            Direction::Departure => self.departure_timeframe_min,
        }
    }

    /// Maximum one-way trips a single bus can make within a direction's
    /// timeframe. Computed once per direction, shared by all its flights.
    pub fn max_trips_per_bus(&self, direction: Direction) -> u32 {
        (self.timeframe_minutes(direction) as f64 / self.transit_time_min).floor() as u32
    }

    /// Gate-occupancy rollover for a terminal class. `None` for flights
    /// whose terminal could not be classified; such flights get no window.
    pub fn rollover(&self, class: TerminalClass) -> Option<Duration> {
        match class {
            TerminalClass::International => {
                Some(Duration::minutes(self.international_rollover_min))
            }
            TerminalClass::Domestic => Some(Duration::minutes(self.domestic_rollover_min)),
            TerminalClass::Unknown => None,
        }
    }

    /// Width of one sample point in the demand series.
    pub fn tick(&self) -> Duration {
        Duration::minutes(self.tick_min)
    }
}
