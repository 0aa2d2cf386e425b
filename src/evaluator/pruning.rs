//! C4 — schedule pruner.
//!
//! Drops the empty prefix/suffix of each aircraft's flight list (interior
//! empty flights are kept, per spec §9's open question) and remaps the
//! pax-assignment legs' flight indices to match. Grounded on the teacher's
//! `graph::bounding::bind_adjacencylist`, which filters a collection down
//! to the relevant subset and rebuilds the derived index (there:
//! `adjacency`; here: the leg `flight_index` remap) from the filtered set.

use crate::{evaluator::routing::PaxAssignment, model::FlightInstance};

/// Prunes `flights` (already dep_min-ascending) in place and rewrites every
/// `flight_index` in `assignments` through the resulting old->new map.
/// Returns the pruned, renumbered flight list.
///
/// `drop_interior_empty` controls spec §9's open question: the documented
/// behavior keeps interior empty flights (between two populated flights on
/// the same aircraft) and only the weak fitness penalty discourages them.
/// Set this to drop them outright instead — a policy change, never silent.
pub fn prune_schedule(
    flights: Vec<FlightInstance>,
    assignments: &mut [PaxAssignment],
    num_aircraft: usize,
    drop_interior_empty: bool,
) -> Vec<FlightInstance> {
    let mut per_aircraft: Vec<Vec<usize>> = vec![Vec::new(); num_aircraft];
    for (idx, f) in flights.iter().enumerate() {
        if f.aircraft_idx >= 0 && (f.aircraft_idx as usize) < num_aircraft {
            per_aircraft[f.aircraft_idx as usize].push(idx);
        }
    }

    let mut keep = vec![true; flights.len()];
    for idxs in &per_aircraft {
        if idxs.is_empty() {
            continue;
        }

        let mut first_non_empty = 0;
        while first_non_empty < idxs.len() && flights[idxs[first_non_empty]].used_seats == 0 {
            first_non_empty += 1;
        }
        for &idx in &idxs[..first_non_empty] {
            keep[idx] = false;
        }

        let mut last_non_empty = idxs.len() as i64 - 1;
        while last_non_empty >= 0 && flights[idxs[last_non_empty as usize]].used_seats == 0 {
            last_non_empty -= 1;
        }
        for &idx in &idxs[(last_non_empty + 1) as usize..] {
            keep[idx] = false;
        }

        if drop_interior_empty && (first_non_empty as i64) <= last_non_empty {
            for &idx in &idxs[first_non_empty..=(last_non_empty as usize)] {
                if flights[idx].used_seats == 0 {
                    keep[idx] = false;
                }
            }
        }
    }

    let mut map_old_to_new = vec![-1i32; flights.len()];
    let mut pruned = Vec::with_capacity(flights.len());
    for (old_idx, f) in flights.into_iter().enumerate() {
        if !keep[old_idx] {
            continue;
        }
        map_old_to_new[old_idx] = pruned.len() as i32;
        pruned.push(f);
    }

    for assignment in assignments.iter_mut() {
        for leg in assignment.legs.iter_mut() {
            let new_idx = map_old_to_new[leg.flight_index];
            debug_assert!(new_idx >= 0, "pax leg referenced a pruned (empty) flight");
            leg.flight_index = new_idx.max(0) as usize;
        }
    }

    pruned
}
