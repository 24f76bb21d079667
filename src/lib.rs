//! apronbus - shuttle-bus demand estimation for remote aircraft stands.
//!
//! Given a flight schedule export, the pipeline derives per-flight
//! gate-occupancy windows, converts passenger counts into bus-trip counts,
//! and accumulates concurrent bus demand into a 5-minute time series split
//! by Arrival, Departure, and Domestic categories, with a peak value and a
//! coarser reporting resample.

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod parsing;
pub mod preprocessing;
pub mod services;

pub use config::ServiceParams;
pub use error::{Error, Result};
pub use models::flight::{Direction, FlightRecord, GateWindow, TerminalClass};
pub use preprocessing::pipeline::{estimate_demand, DemandPipeline, DemandReport};
pub use services::aggregate::{DemandTable, Peak};
pub use services::demand::DemandProfile;
