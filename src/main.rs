use std::error::Error;

use odbrs::{
    ga::{GaDriver, GaParams, GaTunables},
    model::{Airport, FleetInfo, ODDemand, Route},
    result,
    universe::FlightUniverse,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Demonstration harness only, the way the teacher's `main.rs` wires
/// `Resources -> Graph -> Simulation -> Gui` together. It builds a small
/// synthetic dataset in-process and runs the pipeline on it, printing the
/// summary the way the original's `runGA` caller does. Loading the five
/// input documents off disk and any CLI/GUI surface are out of scope for
/// the core (spec'd as external collaborators).
fn main() -> Result<(), Box<dyn Error>> {
    let airports = vec![
        Airport {
            id: 0,
            code: "AAA".to_string(),
            name: "Alpha".to_string(),
            lat: 0.0,
            lon: 0.0,
        },
        Airport {
            id: 1,
            code: "BBB".to_string(),
            name: "Bravo".to_string(),
            lat: 0.0,
            lon: 0.0,
        },
        Airport {
            id: 2,
            code: "CCC".to_string(),
            name: "Charlie".to_string(),
            lat: 0.0,
            lon: 0.0,
        },
    ];

    let routes = vec![
        Route {
            id: 0,
            orig: 0,
            dest: 1,
            time_min: 60,
        },
        Route {
            id: 1,
            orig: 1,
            dest: 2,
            time_min: 60,
        },
        Route {
            id: 2,
            orig: 1,
            dest: 0,
            time_min: 60,
        },
        Route {
            id: 3,
            orig: 2,
            dest: 1,
            time_min: 60,
        },
    ];

    let od = vec![
        ODDemand {
            orig: 0,
            dest: 1,
            demand: 150,
        },
        ODDemand {
            orig: 0,
            dest: 2,
            demand: 60,
        },
    ];

    let fleet = FleetInfo {
        num_aircraft: 2,
        seats_per_aircraft: 100,
        aircraft_ids: Vec::new(),
    }
    .with_synthesized_ids();

    let universe = FlightUniverse::build(&routes, &Default::default())?;
    println!(
        "ODBRS -- Main: built {} flight templates from {} routes",
        universe.len(),
        routes.len()
    );

    let driver = GaDriver::with_tunables(GaTunables::default());
    let mut rng = StdRng::seed_from_u64(1);

    let mut on_progress = |gen: usize, best: f64| {
        println!("generation {gen}: running best score {best:.1}");
    };

    let ga_result = driver.run(GaParams {
        universe: universe.templates(),
        fleet: &fleet,
        od: &od,
        num_airports: airports.len(),
        population: 60,
        generations: 40,
        rng: &mut rng,
        progress: Some(&mut on_progress),
    })?;

    let (summary_doc, passengers_doc, _evolution_doc) = result::assemble(&ga_result, &airports, &fleet);

    println!();
    println!("{}", summary_doc.summary);
    println!(
        "{} passenger assignments produced",
        passengers_doc.assignments.len()
    );

    Ok(())
}
