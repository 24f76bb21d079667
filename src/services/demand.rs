//! Trip and bus counts per flight.

use serde::Serialize;

use crate::config::ServiceParams;
use crate::models::flight::FlightRecord;

/// Bus demand derived for one flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemandProfile {
    /// One-way trips required to move all passengers.
    pub trips_needed: u32,
    /// Buses working the flight at once.
    pub buses_needed: u32,
}

impl DemandProfile {
    pub fn is_odd_trip_count(&self) -> bool {
        self.trips_needed % 2 == 1
    }
}

/// One-way trips needed to carry `pax_count` passengers.
pub fn trips_needed(pax_count: u32, bus_capacity: u32) -> u32 {
    pax_count.div_ceil(bus_capacity)
}

/// Simultaneous buses needed to fit `trips` into the direction timeframe,
/// never less than one.
pub fn buses_needed(trips: u32, max_trips_per_bus: u32) -> u32 {
    trips.div_ceil(max_trips_per_bus).max(1)
}

/// Demand profile for one flight. `max_trips_per_bus` is direction-based
/// and shared by every flight of the direction; config validation
/// guarantees it is at least one.
pub fn demand_profile(record: &FlightRecord, params: &ServiceParams) -> DemandProfile {
    let trips = trips_needed(record.pax_count, params.bus_capacity);
    let buses = buses_needed(trips, params.max_trips_per_bus(record.direction));
    DemandProfile {
        trips_needed: trips,
        buses_needed: buses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::flight::Direction;

    fn record(direction: Direction, pax: u32) -> FlightRecord {
        FlightRecord {
            direction,
            flight_number: "XY100".to_string(),
            scheduled_time: "2025-03-01T10:00:00".parse().unwrap(),
            stand: "R1".to_string(),
            terminal: Some("International".to_string()),
            pax_count: pax,
            aircraft_type: None,
            stand_type: Some("Remote".to_string()),
            airline_code: None,
            flight_type: None,
            flight_direction: None,
            airport_code: None,
        }
    }

    #[test]
    fn test_trips_round_up() {
        assert_eq!(trips_needed(1, 60), 1);
        assert_eq!(trips_needed(60, 60), 1);
        assert_eq!(trips_needed(61, 60), 2);
        assert_eq!(trips_needed(121, 60), 3);
    }

    #[test]
    fn test_buses_never_zero() {
        assert_eq!(buses_needed(1, 2), 1);
        assert_eq!(buses_needed(3, 2), 2);
        assert_eq!(buses_needed(4, 2), 2);
        assert_eq!(buses_needed(5, 2), 3);
    }

    #[test]
    fn test_profile_121_pax() {
        // trips = ceil(121/60) = 3 (odd); max_trips = floor(45/21.7) = 2;
        // buses = ceil(3/2) = 2
        let params = ServiceParams::default();
        let profile = demand_profile(&record(Direction::Arrival, 121), &params);
        assert_eq!(profile.trips_needed, 3);
        assert_eq!(profile.buses_needed, 2);
        assert!(profile.is_odd_trip_count());
    }

    #[test]
    fn test_profile_120_pax_even() {
        let params = ServiceParams::default();
        let profile = demand_profile(&record(Direction::Departure, 120), &params);
        assert_eq!(profile.trips_needed, 2);
        assert_eq!(profile.buses_needed, 1);
        assert!(!profile.is_odd_trip_count());
    }
}
