use log::debug;
use rand::Rng;
use rand::distributions::Uniform;

use crate::Error;
use crate::systems::{SimulationBox, wrap_coordinate};

use super::Parameters;

/// Trial move generation for Metropolis Monte Carlo sampling of particles in a
/// periodic box.
///
/// Deciding whether to accept a trial move (by comparing the energies before
/// and after the move) is left to the code driving the simulation.
#[derive(Debug, Clone)]
pub struct MetropolisMonteCarlo {
    parameters: Parameters,
    simulation_box: SimulationBox,
    /// distribution of the displacement along each axis
    displacement: Uniform<f64>,
}

impl MetropolisMonteCarlo {
    /// Create a new sampler with the given parameters, checking that they
    /// are valid.
    pub fn new(parameters: Parameters) -> Result<MetropolisMonteCarlo, Error> {
        parameters.validate()?;

        let simulation_box = parameters.simulation_box()?;
        let displacement = Uniform::new_inclusive(-parameters.update_radius, parameters.update_radius);

        debug!(
            "Metropolis sampler at T = {} in box {:?}, maximal displacement is {}",
            parameters.temperature, simulation_box.lengths(), parameters.update_radius
        );

        return Ok(MetropolisMonteCarlo {
            parameters: parameters,
            simulation_box: simulation_box,
            displacement: displacement,
        });
    }

    /// Get the parameters used by this sampler
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Get the simulation box used by this sampler
    pub fn simulation_box(&self) -> &SimulationBox {
        &self.simulation_box
    }

    /// Wrap `position` inside a box with edge lengths `simulation_box`,
    /// moving it by at most one box length along each axis. The wrapped
    /// position is returned, and `position` is left unchanged.
    pub fn shift_position(position: &[f64], simulation_box: &[f64]) -> Result<Vec<f64>, Error> {
        if position.len() != simulation_box.len() {
            return Err(Error::DimensionMismatch {
                expected: simulation_box.len(),
                got: position.len(),
                context: "the position to shift".into(),
            });
        }

        let shifted = position.iter()
            .zip(simulation_box)
            .map(|(&value, &length)| wrap_coordinate(value, length))
            .collect();

        return Ok(shifted);
    }

    /// Generate a trial position for a particle currently at `position`.
    ///
    /// Each coordinate is displaced by a random amount, uniformly distributed
    /// in `[-update_radius, update_radius]`, and the result is wrapped back in
    /// the simulation box. All randomness comes from `rng`.
    pub fn generate_trial_position<R: Rng + ?Sized>(&self, position: &[f64], rng: &mut R) -> Result<Vec<f64>, Error> {
        if position.len() != self.simulation_box.dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.simulation_box.dimension(),
                got: position.len(),
                context: "the position for a trial move".into(),
            });
        }

        let mut trial = position.iter()
            .map(|&value| value + rng.sample(&self.displacement))
            .collect::<Vec<_>>();

        self.simulation_box.wrap(&mut trial);
        return Ok(trial);
    }
}
