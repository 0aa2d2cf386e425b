//! C7 — result assembler.
//!
//! Collects the best chromosome's evaluation output into the three
//! documented output shapes (spec §6): the flights/summary document, the
//! passengers/flights document, and the evolution document. Grounded on
//! the teacher's `analytics::mod::run`, which folds per-tick events into a
//! final printed tally — the same "accumulated state in, human-readable
//! and machine-readable views out" shape, just over a GA run instead of a
//! simulation tick stream.

use std::fmt;

use serde::Serialize;

use crate::{
    evaluator::routing::PaxAssignment,
    ga::GaResult,
    model::{format_hhmm, Airport, FleetInfo, FlightInstance},
};

#[derive(Debug, Clone, Serialize)]
pub struct SummaryDoc {
    pub summary: Summary,
    pub airports: Vec<AirportDoc>,
    pub flights: Vec<FlightDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub served_total: u32,
    pub served_direct: u32,
    pub served_1hop: u32,
    pub unserved: u32,
    pub num_flights: usize,
    pub used_aircraft: usize,
    pub total_travel_time_min: i64,
}

impl fmt::Display for Summary {
    /// Mirrors the original's `result.summaryText` block verbatim in
    /// content and order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Served total: {}", self.served_total)?;
        writeln!(f, "   direct   : {}", self.served_direct)?;
        writeln!(f, "   1-hop    : {}", self.served_1hop)?;
        writeln!(f, "Unserved passengers: {}", self.unserved)?;
        writeln!(f, "Flights used: {}", self.num_flights)?;
        writeln!(f, "Aircraft used: {}", self.used_aircraft)?;
        write!(f, "Total travel time (min * pax): {}", self.total_travel_time_min)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AirportDoc {
    pub id: usize,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightDoc {
    pub tmpl_id: usize,
    pub route_id: usize,
    pub orig_id: usize,
    pub dest_id: usize,
    pub dep_min: i32,
    pub arr_min: i32,
    pub dep_hhmm: String,
    pub arr_hhmm: String,
    pub aircraft_idx: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft_id: Option<String>,
    pub capacity: u32,
    pub used_seats: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassengersDoc {
    pub assignments: Vec<AssignmentDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDoc {
    pub orig_id: usize,
    pub dest_id: usize,
    pub pax: u32,
    pub num_legs: usize,
    pub dep_min: i32,
    pub arr_min: i32,
    pub dep_hhmm: String,
    pub arr_hhmm: String,
    pub legs: Vec<LegDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegDoc {
    pub flight_index: usize,
    pub route_id: usize,
    pub orig_id: usize,
    pub dest_id: usize,
    pub dep_min: i32,
    pub arr_min: i32,
    pub dep_hhmm: String,
    pub arr_hhmm: String,
    pub aircraft_idx: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvolutionDoc {
    pub evolution: Vec<GenerationDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationDoc {
    pub generation: usize,
    pub best_score: f64,
    pub avg_score: f64,
    pub worst_score: f64,
    pub served_total: u32,
    pub served_direct: u32,
    pub served_1hop: u32,
    pub unserved: u32,
    pub num_flights: usize,
    pub used_aircraft: usize,
    pub duration_ms: u128,
}

/// Builds the flights/summary document from the best evaluation's pruned
/// flight list. Flights with no aircraft never reach this stage (the
/// evaluator drops them before pruning), so every entry here has
/// `aircraft_idx >= 0`.
pub fn build_summary_doc(flights: &[FlightInstance], airports: &[Airport], fleet: &FleetInfo) -> SummaryDoc {
    let summary = Summary {
        served_total: 0,
        served_direct: 0,
        served_1hop: 0,
        unserved: 0,
        num_flights: flights.len(),
        used_aircraft: flights
            .iter()
            .map(|f| f.aircraft_idx)
            .collect::<std::collections::HashSet<_>>()
            .len(),
        total_travel_time_min: 0,
    };

    let airport_docs = airports
        .iter()
        .map(|a| AirportDoc {
            id: a.id,
            code: a.code.clone(),
            name: a.name.clone(),
        })
        .collect();

    let flight_docs = flights
        .iter()
        .map(|f| FlightDoc {
            tmpl_id: f.tmpl_id,
            route_id: f.route_id,
            orig_id: f.orig,
            dest_id: f.dest,
            dep_min: f.dep_min,
            arr_min: f.arr_min,
            dep_hhmm: format_hhmm(f.dep_min),
            arr_hhmm: format_hhmm(f.arr_min),
            aircraft_idx: f.aircraft_idx,
            aircraft_id: fleet.aircraft_ids.get(f.aircraft_idx as usize).cloned(),
            capacity: f.capacity,
            used_seats: f.used_seats,
        })
        .collect();

    SummaryDoc {
        summary,
        airports: airport_docs,
        flights: flight_docs,
    }
}

/// Fills in the summary's aggregate fields from the GA's eval stats;
/// separate from `build_summary_doc` because the stats live on
/// `EvalOutcome` alongside, not inside, the flight list.
pub fn fill_summary_stats(doc: &mut SummaryDoc, stats: &crate::evaluator::scoring::EvalStats) {
    doc.summary.served_total = stats.served_total;
    doc.summary.served_direct = stats.served_direct;
    doc.summary.served_1hop = stats.served_one_hop;
    doc.summary.unserved = stats.unserved;
    doc.summary.total_travel_time_min = stats.total_travel_time;
}

pub fn build_passengers_doc(assignments: &[PaxAssignment]) -> PassengersDoc {
    let docs = assignments
        .iter()
        .map(|a| AssignmentDoc {
            orig_id: a.orig,
            dest_id: a.dest,
            pax: a.pax,
            num_legs: a.num_legs(),
            dep_min: a.dep_min,
            arr_min: a.arr_min,
            dep_hhmm: format_hhmm(a.dep_min),
            arr_hhmm: format_hhmm(a.arr_min),
            legs: a
                .legs
                .iter()
                .map(|l| LegDoc {
                    flight_index: l.flight_index,
                    route_id: l.route_id,
                    orig_id: l.orig,
                    dest_id: l.dest,
                    dep_min: l.dep_min,
                    arr_min: l.arr_min,
                    dep_hhmm: format_hhmm(l.dep_min),
                    arr_hhmm: format_hhmm(l.arr_min),
                    aircraft_idx: l.aircraft_idx,
                })
                .collect(),
        })
        .collect();

    PassengersDoc { assignments: docs }
}

pub fn build_evolution_doc(result: &GaResult) -> EvolutionDoc {
    let evolution = result
        .history
        .iter()
        .map(|g| GenerationDoc {
            generation: g.generation,
            best_score: g.best_score,
            avg_score: g.avg_score,
            worst_score: g.worst_score,
            served_total: g.served_total,
            served_direct: g.served_direct,
            served_1hop: g.served_one_hop,
            unserved: g.unserved,
            num_flights: g.num_flights,
            used_aircraft: g.used_aircraft,
            duration_ms: g.duration_ms,
        })
        .collect();

    EvolutionDoc { evolution }
}

/// Assembles all three documents from a finished GA run, the way a caller
/// of the original's `runGA` would consume `result.fullJson`,
/// `result.passengersJson` and `result.evolutionJson` together.
pub fn assemble(result: &GaResult, airports: &[Airport], fleet: &FleetInfo) -> (SummaryDoc, PassengersDoc, EvolutionDoc) {
    let mut summary_doc = build_summary_doc(&result.best_outcome.flights, airports, fleet);
    fill_summary_stats(&mut summary_doc, &result.best_outcome.stats);

    let passengers_doc = build_passengers_doc(&result.best_outcome.assignments);
    let evolution_doc = build_evolution_doc(result);

    (summary_doc, passengers_doc, evolution_doc)
}
