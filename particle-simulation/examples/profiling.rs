use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use particle_simulation::{MetropolisMonteCarlo, Parameters, System};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let n_steps = match std::env::args().nth(1) {
        Some(value) => value.parse()?,
        None => 100,
    };

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    // run the trial moves and cell list construction
    sample(n_steps)?;

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Move all particles of a random system `n_steps` times, rebuilding the cell
/// list after each sweep. Accepting or rejecting the moves would require
/// evaluating the energy, so all moves are accepted here.
fn sample(n_steps: usize) -> Result<(), Box<dyn std::error::Error>> {
    let parameters = Parameters::from_json(r#"{
        "temperature": 1.0,
        "box": [20.0, 20.0, 20.0],
        "es_sigma": 0.5,
        "cutoff_radius": 2.5,
        "update_radius": 0.3,
        "k_cutoff": 5
    }"#)?;

    let sampler = MetropolisMonteCarlo::new(parameters.clone())?;
    let simulation_box = parameters.simulation_box()?;

    let mut rng = StdRng::seed_from_u64(0xbad_5eed);
    let positions = (0..5000).map(|_| {
        simulation_box.lengths().iter().map(|&length| rng.gen_range(0.0..length)).collect()
    }).collect::<Vec<Vec<f64>>>();

    let mut system = System::new(positions, simulation_box, parameters.cutoff_radius)?;

    time_graph::spanned!("Full sampling", {
        for _ in 0..n_steps {
            time_graph::spanned!("trial moves", {
                for particle in 0..system.size() {
                    if rng.gen_bool(parameters.update_probability) {
                        let trial = sampler.generate_trial_position(&system.positions()[particle], &mut rng)?;
                        system.positions_mut()[particle] = trial;
                    }
                }
            });

            system.construct_neighborlist()?;
        }
    });

    Ok(())
}
