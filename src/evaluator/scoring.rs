//! C5 — fitness scorer.
//!
//! A weighted sum/penalty over one evaluation's statistics, computed after
//! pruning. Grounded on the teacher's `analytics::SimulationAnalyticsEvent`
//! handling, which folds a stream of per-tick numbers into a handful of
//! running aggregates (there: average tick time; here: a single scalar
//! fitness) — same "sum up weighted terms" shape, just applied once per
//! evaluation instead of incrementally per tick.

use crate::model::FlightInstance;

/// Score floor for evaluations that never produce a usable schedule.
pub const SHORT_CIRCUIT_SCORE: f64 = -1e9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    pub served_total: u32,
    pub served_direct: u32,
    pub served_one_hop: u32,
    pub unserved: u32,
    pub num_flights: usize,
    pub used_aircraft: usize,
    pub total_travel_time: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoringTunables {
    /// The assigner never uses more aircraft than the fleet, so this term
    /// is dead in practice (spec §9's open question on "num_aircraft
    /// exceeded"). Retained as a flag, defensive, rather than removed.
    pub penalize_excess_aircraft: bool,
}

impl Default for ScoringTunables {
    fn default() -> Self {
        Self::compiled_in()
    }
}

impl ScoringTunables {
    pub fn compiled_in() -> Self {
        ScoringTunables {
            penalize_excess_aircraft: true,
        }
    }
}

/// Computes spec §4.5's weighted fitness score from post-pruning stats and
/// flights. `fleet_size` is the configured fleet size used for the (in
/// practice unreachable — the assigner never exceeds it) excess-aircraft
/// penalty.
pub fn score(stats: &EvalStats, flights: &[FlightInstance], fleet_size: usize, tunables: ScoringTunables) -> f64 {
    let mut score = 100_000.0 * stats.served_total as f64;
    score -= 10.0 * stats.total_travel_time as f64;
    score -= 50_000.0 * stats.unserved as f64;

    if stats.num_flights > 1000 {
        score -= 100_000.0 * (stats.num_flights - 1000) as f64;
    }
    if tunables.penalize_excess_aircraft && stats.used_aircraft > fleet_size {
        score -= 100_000.0 * (stats.used_aircraft - fleet_size) as f64;
    }

    let empty_flights = flights.iter().filter(|f| f.used_seats == 0).count();
    score -= 1_000.0 * empty_flights as f64;

    score
}
