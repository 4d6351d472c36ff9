#![allow(dead_code)]

use particle_simulation::{Parameters, SimulationBox, System};

#[derive(serde::Deserialize)]
struct ParticlesInput {
    #[serde(rename = "box")]
    simulation_box: Vec<f64>,
    cutoff: f64,
    positions: Vec<Vec<f64>>,
}

pub fn load_system(path: &str) -> System {
    let json = std::fs::read_to_string(format!("tests/data/{}", path))
        .expect("failed to read input file");

    let input: ParticlesInput = serde_json::from_str(&json).expect("failed to parse JSON");
    let simulation_box = SimulationBox::new(input.simulation_box).expect("invalid box");
    return System::new(input.positions, simulation_box, input.cutoff).expect("invalid system");
}

pub fn load_parameters(path: &str) -> Parameters {
    let json = std::fs::read_to_string(format!("tests/data/{}", path))
        .expect("failed to read input file");

    return Parameters::from_json(&json).expect("invalid parameters");
}
