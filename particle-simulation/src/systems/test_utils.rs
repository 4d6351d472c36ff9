use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use super::{System, SimulationBox};

pub fn test_system(name: &str) -> System {
    match name {
        "lattice" => get_lattice(),
        "random" => get_random(),
        "outside" => get_outside(),
        "2D" => get_2d(),
        _ => panic!("unknown test system {}", name)
    }
}

/// Simple cubic lattice with one particle at the center of each cell
fn get_lattice() -> System {
    let mut positions = Vec::new();
    for x in 0..4 {
        for y in 0..4 {
            for z in 0..4 {
                positions.push(vec![
                    2.0 * x as f64 + 1.0,
                    2.0 * y as f64 + 1.0,
                    2.0 * z as f64 + 1.0,
                ]);
            }
        }
    }

    let simulation_box = SimulationBox::cubic(8.0, 3).unwrap();
    return System::new(positions, simulation_box, 2.0).unwrap();
}

/// Uniformly distributed particles, some of them up to half a box length
/// outside of the box
fn get_random() -> System {
    let lengths = [12.0, 13.0, 14.0];
    let mut rng = StdRng::seed_from_u64(0xdead_beef);

    let positions: Vec<Vec<f64>> = (0..300).map(|_| {
        lengths.iter().map(|&length| rng.gen_range(-0.5 * length..1.5 * length)).collect()
    }).collect();

    let simulation_box = SimulationBox::new(lengths.to_vec()).unwrap();
    return System::new(positions, simulation_box, 1.5).unwrap();
}

/// Particles outside the box natural boundaries
fn get_outside() -> System {
    let positions = vec![
        vec![13.5, 14.0, 15.5],
        vec![-1.5, -1.0, 5.5],
        vec![1.0, 2.0, 3.0],
        vec![12.0, 0.0, -14.0],
    ];

    let simulation_box = SimulationBox::new(vec![12.0, 13.0, 14.0]).unwrap();
    return System::new(positions, simulation_box, 0.5).unwrap();
}

/// Two-dimensional system
fn get_2d() -> System {
    let positions = vec![
        vec![0.5, 0.5],
        vec![2.5, 0.5],
        vec![0.7, 0.9],
        vec![9.9, 5.9],
        vec![-0.1, 3.0],
    ];

    let simulation_box = SimulationBox::new(vec![10.0, 6.0]).unwrap();
    return System::new(positions, simulation_box, 2.0).unwrap();
}
