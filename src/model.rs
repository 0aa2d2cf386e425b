//! Core data model: airports, routes, demand, fleet, and the flight-template
//! universe the GA's chromosomes index into.
//!
//! Mirrors the teacher's `graph::types` module (plain `Serialize`/
//! `Deserialize` structs, dense integer ids, a `Default` derive where it
//! makes sense) but for the flight-scheduling domain instead of a road
//! adjacency list.

use serde::{Deserialize, Serialize};

/// Minimum ground time (minutes) before an aircraft can depart again.
pub const TURNAROUND: i32 = 60;

/// First permitted departure slot, minutes since 00:00 local.
pub const DAY_START: i32 = 360;
/// Last minute an arrival may land on, minutes since 00:00 local.
pub const DAY_END: i32 = 1320;
/// Spacing between candidate departure slots, in minutes.
pub const SLOT_MIN: i32 = 60;
/// Last permitted departure slot (21:00), inclusive.
pub const LAST_DEP_SLOT: i32 = 1260;

pub type AirportId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: AirportId,
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: usize,
    pub orig: AirportId,
    pub dest: AirportId,
    pub time_min: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ODDemand {
    pub orig: AirportId,
    pub dest: AirportId,
    pub demand: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetInfo {
    pub num_aircraft: usize,
    pub seats_per_aircraft: u32,
    pub aircraft_ids: Vec<String>,
}

impl FleetInfo {
    /// Pads `aircraft_ids` up to `num_aircraft` with synthesized
    /// `AC_000`, `AC_001`, ... identifiers, the way the original
    /// `GAEngine::loadData` fills short `aircraft_ids` arrays.
    pub fn with_synthesized_ids(mut self) -> Self {
        while self.aircraft_ids.len() < self.num_aircraft {
            self.aircraft_ids
                .push(format!("AC_{:03}", self.aircraft_ids.len()));
        }
        self
    }
}

/// An unordered collection of origin-destination pairs excluded entirely
/// from the flight universe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenOD {
    pairs: std::collections::HashSet<(AirportId, AirportId)>,
}

impl ForbiddenOD {
    pub fn new(pairs: impl IntoIterator<Item = (AirportId, AirportId)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    pub fn contains(&self, orig: AirportId, dest: AirportId) -> bool {
        self.pairs.contains(&(orig, dest))
    }
}

/// A candidate flight: a route flown at a specific departure slot. Stable
/// `tmpl_id` is the gene's position in the chromosome bit-vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightTemplate {
    pub tmpl_id: usize,
    pub route_id: usize,
    pub orig: AirportId,
    pub dest: AirportId,
    pub dep_min: i32,
    pub arr_min: i32,
}

/// A chromosome is a bit-vector over the flight-template universe; bit `g`
/// on means template `g` is active for this candidate schedule.
pub type Chromosome = Vec<bool>;

/// A realized flight within one evaluation: a copy of its template plus
/// aircraft and seat-usage state. Ephemeral — owned by a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightInstance {
    pub tmpl_id: usize,
    pub route_id: usize,
    pub orig: AirportId,
    pub dest: AirportId,
    pub dep_min: i32,
    pub arr_min: i32,
    pub aircraft_idx: i32,
    pub capacity: u32,
    pub used_seats: u32,
}

impl FlightInstance {
    pub fn from_template(ft: &FlightTemplate, capacity: u32) -> Self {
        FlightInstance {
            tmpl_id: ft.tmpl_id,
            route_id: ft.route_id,
            orig: ft.orig,
            dest: ft.dest,
            dep_min: ft.dep_min,
            arr_min: ft.arr_min,
            aircraft_idx: -1,
            capacity,
            used_seats: 0,
        }
    }

    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.used_seats)
    }
}

/// Formats minutes-since-midnight as zero-padded 24h `HH:MM`, the way the
/// teacher's `static_controller::routes::timeint_to_time` turns a
/// seconds-since-midnight GTFS integer into a `chrono::NaiveTime`.
pub fn format_hhmm(minutes: i32) -> String {
    let minutes = minutes.rem_euclid(24 * 60);
    let time = chrono::NaiveTime::from_num_seconds_from_midnight(minutes as u32 * 60, 0);
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_missing_aircraft_ids() {
        let fleet = FleetInfo {
            num_aircraft: 3,
            seats_per_aircraft: 100,
            aircraft_ids: vec!["CUSTOM".to_string()],
        }
        .with_synthesized_ids();

        assert_eq!(fleet.aircraft_ids, vec!["CUSTOM", "AC_001", "AC_002"]);
    }

    #[test]
    fn formats_hhmm() {
        assert_eq!(format_hhmm(0), "00:00");
        assert_eq!(format_hhmm(360), "06:00");
        assert_eq!(format_hhmm(1320), "22:00");
        assert_eq!(format_hhmm(90), "01:30");
    }

    #[test]
    fn forbidden_od_membership() {
        let forbidden = ForbiddenOD::new([(0, 1), (2, 3)]);
        assert!(forbidden.contains(0, 1));
        assert!(!forbidden.contains(1, 0));
    }
}
