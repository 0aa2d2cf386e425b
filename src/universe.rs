//! C1 — flight-universe builder.
//!
//! Enumerates every (route, departure-slot) pair not on a forbidden OD
//! pair. This is the gene universe every chromosome indexes into, built
//! once at load time. Grounded on the teacher's `resource::load_graph`
//! pattern of turning raw input (there: shapefiles; here: routes) into the
//! structure the rest of the pipeline reads (there: an `AdjacencyList`;
//! here: a flat `Vec<FlightTemplate>`), wrapped in the same `Module`
//! startup-timing idiom as `graph::Graph`.

use serde::Deserialize;

use crate::{
    model::{FlightTemplate, ForbiddenOD, Route, DAY_END, DAY_START, LAST_DEP_SLOT, SLOT_MIN},
    Module, ScheduleError,
};

#[derive(Debug, Default, Clone)]
pub struct FlightUniverse {
    templates: Vec<FlightTemplate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UniverseConfig {}

#[derive(Debug, Default, Clone)]
pub struct UniverseParams {
    pub routes: Vec<Route>,
    pub forbidden: ForbiddenOD,
}

impl Module for FlightUniverse {
    type Configuration = UniverseConfig;
    type ReturnType = ();
    type Parameters = UniverseParams;

    fn get_name(&self) -> &str {
        "FlightUniverse"
    }

    fn init(
        &mut self,
        _config: Self::Configuration,
        parameters: Self::Parameters,
    ) -> Result<Self::ReturnType, ScheduleError> {
        let time = std::time::Instant::now();

        self.templates = build_templates(&parameters.routes, &parameters.forbidden);

        if self.templates.is_empty() {
            return Err(ScheduleError::NoFeasibleFlights);
        }

        println!(
            "[{}] Initialised in {:?} ({} templates)",
            self.get_name(),
            time.elapsed(),
            self.templates.len()
        );
        Ok(())
    }
}

impl FlightUniverse {
    /// Builds the universe directly, bypassing the `Module` ceremony — the
    /// call the GA driver and tests actually use, the same way
    /// `graph::route_finding::find_route` is called directly rather than
    /// through a `Module`.
    pub fn build(routes: &[Route], forbidden: &ForbiddenOD) -> Result<Self, ScheduleError> {
        let templates = build_templates(routes, forbidden);
        if templates.is_empty() {
            return Err(ScheduleError::NoFeasibleFlights);
        }
        Ok(FlightUniverse { templates })
    }

    pub fn templates(&self) -> &[FlightTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn build_templates(routes: &[Route], forbidden: &ForbiddenOD) -> Vec<FlightTemplate> {
    let mut templates = Vec::new();
    let mut tmpl_id = 0usize;

    for route in routes {
        if forbidden.contains(route.orig, route.dest) {
            continue;
        }

        let mut dep = DAY_START;
        while dep <= LAST_DEP_SLOT {
            let arr = dep + route.time_min;
            if arr <= DAY_END {
                templates.push(FlightTemplate {
                    tmpl_id,
                    route_id: route.id,
                    orig: route.orig,
                    dest: route.dest,
                    dep_min: dep,
                    arr_min: arr,
                });
                tmpl_id += 1;
            }
            dep += SLOT_MIN;
        }
    }

    templates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForbiddenOD;

    fn route(id: usize, orig: usize, dest: usize, time_min: i32) -> Route {
        Route {
            id,
            orig,
            dest,
            time_min,
        }
    }

    #[test]
    fn builds_one_slot_per_hour_within_day_window() {
        let routes = vec![route(0, 0, 1, 60)];
        let forbidden = ForbiddenOD::default();
        let universe = FlightUniverse::build(&routes, &forbidden).unwrap();

        // 06:00 .. 21:00 inclusive, hourly => 16 slots
        assert_eq!(universe.len(), 16);
        assert_eq!(universe.templates()[0].dep_min, 360);
        assert_eq!(universe.templates()[0].arr_min, 420);
        assert_eq!(universe.templates().last().unwrap().dep_min, 1260);
    }

    #[test]
    fn rejects_slots_that_would_land_after_day_end() {
        let routes = vec![route(0, 0, 1, 600)]; // 10h flight
        let forbidden = ForbiddenOD::default();
        let universe = FlightUniverse::build(&routes, &forbidden).unwrap();

        // last dep such that dep + 600 <= 1320 is dep <= 720
        assert!(universe.templates().iter().all(|t| t.arr_min <= DAY_END));
        assert!(universe.templates().iter().all(|t| t.dep_min <= 720));
    }

    #[test]
    fn forbidden_route_produces_no_templates() {
        let routes = vec![route(0, 0, 1, 60)];
        let forbidden = ForbiddenOD::new([(0, 1)]);
        let err = FlightUniverse::build(&routes, &forbidden).unwrap_err();
        assert_eq!(err, ScheduleError::NoFeasibleFlights);
    }

    #[test]
    fn universe_order_is_route_major_then_slot_ascending() {
        let routes = vec![route(0, 0, 1, 600), route(1, 1, 0, 600)];
        let forbidden = ForbiddenOD::default();
        let universe = FlightUniverse::build(&routes, &forbidden).unwrap();

        let route0_count = universe
            .templates()
            .iter()
            .take_while(|t| t.route_id == 0)
            .count();
        assert!(route0_count > 0);
        for w in universe.templates()[..route0_count].windows(2) {
            assert!(w[0].dep_min < w[1].dep_min);
        }
        assert!(universe.templates()[route0_count..]
            .iter()
            .all(|t| t.route_id == 1));
    }
}
