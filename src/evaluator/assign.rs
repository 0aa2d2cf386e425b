//! C2 — aircraft assigner.
//!
//! Greedy first-fit assignment of a chromosome's active flights to the
//! fleet: at each flight in departure order, pick the earliest-free
//! aircraft that can legally fly it. Grounded on the teacher's
//! `graph::route_finding::find_route` in shape (a single forward scan that
//! maintains a best-candidate-so-far and a tie-break rule) even though the
//! underlying search here is a greedy assignment, not Dijkstra.

use crate::model::{FlightInstance, TURNAROUND};

#[derive(Debug, Clone, Copy)]
struct AircraftState {
    /// Airport the aircraft is sitting at; `-1` before its first flight.
    airport: i32,
    /// Minute from which the aircraft is free to depart again.
    available: i32,
    used: bool,
}

/// Assigns aircraft to `flights` (expected pre-sorted ascending by
/// `dep_min`) in place, setting `aircraft_idx` on each. Flights that can't
/// be legally assigned keep `aircraft_idx = -1` and are the caller's
/// responsibility to drop before demand routing.
pub fn assign_aircraft(flights: &mut [FlightInstance], num_aircraft: usize, day_start: i32) {
    let mut fleet = vec![
        AircraftState {
            airport: -1,
            available: day_start,
            used: false,
        };
        num_aircraft
    ];

    for flight in flights.iter_mut() {
        let mut best: Option<usize> = None;
        let mut best_available = i32::MAX;

        for (idx, ac) in fleet.iter().enumerate() {
            let eligible = if !ac.used {
                flight.dep_min >= ac.available
            } else {
                ac.airport == flight.orig as i32 && ac.available + TURNAROUND <= flight.dep_min
            };

            if eligible && ac.available < best_available {
                best = Some(idx);
                best_available = ac.available;
            }
        }

        let Some(chosen) = best else {
            continue;
        };

        flight.aircraft_idx = chosen as i32;
        let ac = &mut fleet[chosen];
        ac.airport = flight.dest as i32;
        ac.available = flight.arr_min;
        ac.used = true;
    }
}
