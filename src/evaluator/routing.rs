//! C3 — demand router.
//!
//! Routes OD demand over direct and one-hop paths under seat-capacity
//! constraints, greedily filling the fastest candidates first. Grounded on
//! the teacher's `static_controller::demand_to_passenger` /
//! `basic_route_finding`: enumerate candidate paths for a demand record,
//! rank them (there: by detour distance to the destination; here: by
//! total travel time), then walk the ranked list assigning capacity.

use crate::model::{AirportId, FlightInstance, ODDemand};

#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingStats {
    pub served_direct: u32,
    pub served_one_hop: u32,
    pub unserved: u32,
    pub total_travel_time: i64,
}

impl RoutingStats {
    pub fn served_total(&self) -> u32 {
        self.served_direct + self.served_one_hop
    }
}

#[derive(Debug, Clone)]
pub struct PaxLeg {
    pub flight_index: usize,
    pub route_id: usize,
    pub orig: AirportId,
    pub dest: AirportId,
    pub dep_min: i32,
    pub arr_min: i32,
    pub aircraft_idx: i32,
}

#[derive(Debug, Clone)]
pub struct PaxAssignment {
    pub orig: AirportId,
    pub dest: AirportId,
    pub pax: u32,
    pub dep_min: i32,
    pub arr_min: i32,
    pub legs: Vec<PaxLeg>,
}

impl PaxAssignment {
    pub fn num_legs(&self) -> usize {
        self.legs.len()
    }
}

struct PathCandidate {
    flight_idxs: Vec<usize>,
    travel_min: i32,
}

/// Routes `demand` over `flights` (already aircraft-assigned, with
/// `aircraft_idx >= 0`), mutating each flight's `used_seats` in place and
/// returning the pax assignment records plus aggregate stats.
pub fn route_demand(
    flights: &mut [FlightInstance],
    demand: &[ODDemand],
    num_airports: usize,
) -> (Vec<PaxAssignment>, RoutingStats) {
    let mut by_od = vec![vec![Vec::<usize>::new(); num_airports]; num_airports];
    for (idx, f) in flights.iter().enumerate() {
        by_od[f.orig][f.dest].push(idx);
    }
    // `flights` is already dep_min-ascending from the assigner's sort, so
    // each by_od bucket inherits that order without re-sorting.

    let mut remaining = vec![vec![0u32; num_airports]; num_airports];
    for d in demand {
        remaining[d.orig][d.dest] += d.demand;
    }

    let mut assignments = Vec::new();
    let mut stats = RoutingStats::default();

    for d in demand {
        let (o, dest) = (d.orig, d.dest);
        if remaining[o][dest] == 0 {
            continue;
        }

        let mut candidates: Vec<PathCandidate> = Vec::new();

        for &idx in &by_od[o][dest] {
            let f = &flights[idx];
            candidates.push(PathCandidate {
                flight_idxs: vec![idx],
                travel_min: f.arr_min - f.dep_min,
            });
        }

        for mid in 0..num_airports {
            if mid == o || mid == dest {
                continue;
            }
            let first_leg = &by_od[o][mid];
            let second_leg = &by_od[mid][dest];
            if first_leg.is_empty() || second_leg.is_empty() {
                continue;
            }
            for &idx1 in first_leg {
                for &idx2 in second_leg {
                    let f1 = &flights[idx1];
                    let f2 = &flights[idx2];
                    if f1.arr_min + 60 > f2.dep_min {
                        continue;
                    }
                    candidates.push(PathCandidate {
                        flight_idxs: vec![idx1, idx2],
                        travel_min: f2.arr_min - f1.dep_min,
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            a.travel_min
                .cmp(&b.travel_min)
                .then_with(|| a.flight_idxs.len().cmp(&b.flight_idxs.len()))
        });

        let mut demand_left = remaining[o][dest];

        for cand in &candidates {
            if demand_left == 0 {
                break;
            }

            let path_cap = cand
                .flight_idxs
                .iter()
                .map(|&idx| flights[idx].remaining_capacity())
                .min()
                .unwrap_or(0);
            if path_cap == 0 {
                continue;
            }

            let alloc = path_cap.min(demand_left);
            for &idx in &cand.flight_idxs {
                flights[idx].used_seats += alloc;
            }

            demand_left -= alloc;
            if cand.flight_idxs.len() == 1 {
                stats.served_direct += alloc;
            } else {
                stats.served_one_hop += alloc;
            }
            stats.total_travel_time += cand.travel_min as i64 * alloc as i64;

            let dep_first = flights[*cand.flight_idxs.first().unwrap()].dep_min;
            let arr_last = flights[*cand.flight_idxs.last().unwrap()].arr_min;

            let legs = cand
                .flight_idxs
                .iter()
                .map(|&idx| {
                    let f = &flights[idx];
                    PaxLeg {
                        flight_index: idx,
                        route_id: f.route_id,
                        orig: f.orig,
                        dest: f.dest,
                        dep_min: f.dep_min,
                        arr_min: f.arr_min,
                        aircraft_idx: f.aircraft_idx,
                    }
                })
                .collect();

            assignments.push(PaxAssignment {
                orig: o,
                dest,
                pax: alloc,
                dep_min: dep_first,
                arr_min: arr_last,
                legs,
            });
        }

        remaining[o][dest] = demand_left;
    }

    for row in &remaining {
        stats.unserved += row.iter().sum::<u32>();
    }

    (assignments, stats)
}
