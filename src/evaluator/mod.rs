//! The per-chromosome evaluator: C2 → C3 → C4 → C5 in sequence. Each call
//! owns its own `FlightInstance` buffer end to end, per spec §5's ownership
//! rules, so this is safe to call concurrently across a population.

pub mod assign;
pub mod pruning;
pub mod routing;
pub mod scoring;

use std::collections::HashSet;

use crate::model::{Chromosome, FleetInfo, FlightInstance, FlightTemplate, ODDemand, DAY_START};
use routing::PaxAssignment;
use scoring::{EvalStats, ScoringTunables, SHORT_CIRCUIT_SCORE};

pub struct EvalConfig<'a> {
    pub universe: &'a [FlightTemplate],
    pub fleet: &'a FleetInfo,
    pub od: &'a [ODDemand],
    pub num_airports: usize,
    pub scoring: ScoringTunables,
    pub drop_interior_empty: bool,
}

#[derive(Debug, Clone)]
pub struct EvalOutcome {
    pub score: f64,
    pub stats: EvalStats,
    pub flights: Vec<FlightInstance>,
    pub assignments: Vec<PaxAssignment>,
}

impl EvalOutcome {
    fn short_circuit() -> Self {
        EvalOutcome {
            score: SHORT_CIRCUIT_SCORE,
            stats: EvalStats::default(),
            flights: Vec::new(),
            assignments: Vec::new(),
        }
    }
}

/// Evaluates one chromosome end to end, returning its fitness plus the
/// final (post-pruning) schedule and pax assignments.
pub fn evaluate(chromosome: &Chromosome, cfg: &EvalConfig) -> EvalOutcome {
    if chromosome.len() != cfg.universe.len() {
        return EvalOutcome::short_circuit();
    }

    let mut flights: Vec<FlightInstance> = chromosome
        .iter()
        .zip(cfg.universe.iter())
        .filter(|(&on, _)| on)
        .map(|(_, tmpl)| FlightInstance::from_template(tmpl, cfg.fleet.seats_per_aircraft))
        .collect();

    if flights.is_empty() {
        return EvalOutcome::short_circuit();
    }

    flights.sort_by_key(|f| f.dep_min);

    assign::assign_aircraft(&mut flights, cfg.fleet.num_aircraft, DAY_START);
    flights.retain(|f| f.aircraft_idx >= 0);

    if flights.is_empty() {
        return EvalOutcome::short_circuit();
    }

    let (mut assignments, routing_stats) = routing::route_demand(&mut flights, cfg.od, cfg.num_airports);

    let flights = pruning::prune_schedule(
        flights,
        &mut assignments,
        cfg.fleet.num_aircraft,
        cfg.drop_interior_empty,
    );

    if flights.is_empty() {
        return EvalOutcome::short_circuit();
    }

    let used_aircraft: HashSet<i32> = flights.iter().map(|f| f.aircraft_idx).collect();

    let stats = EvalStats {
        served_total: routing_stats.served_total(),
        served_direct: routing_stats.served_direct,
        served_one_hop: routing_stats.served_one_hop,
        unserved: routing_stats.unserved,
        num_flights: flights.len(),
        used_aircraft: used_aircraft.len(),
        total_travel_time: routing_stats.total_travel_time,
    };

    let score = scoring::score(&stats, &flights, cfg.fleet.num_aircraft, cfg.scoring);

    EvalOutcome {
        score,
        stats,
        flights,
        assignments,
    }
}
