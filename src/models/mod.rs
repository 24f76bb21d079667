pub mod flight;
pub mod series;

pub use flight::{Direction, FlightRecord, GateWindow, TerminalClass};
pub use series::{DemandSeries, TickGrid};
