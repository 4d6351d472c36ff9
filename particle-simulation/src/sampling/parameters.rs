use crate::Error;
use crate::systems::SimulationBox;

fn default_update_probability() -> f64 { 0.5 }

/// Parameters of a Metropolis Monte Carlo simulation.
///
/// The charges and Lennard-Jones parameters are carried along for the energy
/// evaluation code, and only checked for consistency here.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    /// Temperature of the simulation, in reduced units. Zero is allowed.
    pub temperature: f64,
    /// Edge lengths of the periodic simulation box, one per spatial dimension
    #[serde(rename = "box")]
    pub simulation_box: Vec<f64>,
    /// Width of the Gaussian charge distribution used to smooth the
    /// electrostatic interactions
    pub es_sigma: f64,
    /// Cutoff radius for short-range interactions
    pub cutoff_radius: f64,
    /// Maximal displacement of a particle along each axis in a trial move
    pub update_radius: f64,
    /// Cutoff for the reciprocal space sums, in number of k-vectors
    pub k_cutoff: usize,
    /// Charge of each particle type
    #[serde(default)]
    pub charges: Vec<f64>,
    /// Lennard-Jones σ of each particle type
    #[serde(default)]
    pub lj_sigmas: Vec<f64>,
    /// Lennard-Jones ε of each particle type
    #[serde(default)]
    pub lj_epsilons: Vec<f64>,
    /// Probability for each particle to be moved in a Monte Carlo step
    #[serde(default = "default_update_probability")]
    pub update_probability: f64,
}

impl Parameters {
    /// Parse and validate parameters from a JSON string
    pub fn from_json(json: &str) -> Result<Parameters, Error> {
        let parameters = serde_json::from_str::<Parameters>(json)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    /// Check that all the parameters have sensible values
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.temperature >= 0.0 && self.temperature.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "expected positive or zero temperature, got {}", self.temperature
            )));
        }

        if !(self.es_sigma > 0.0 && self.es_sigma.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "expected positive electrostatic smoothing width, got {}", self.es_sigma
            )));
        }

        if !(self.cutoff_radius > 0.0 && self.cutoff_radius.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "expected positive cutoff radius, got {}", self.cutoff_radius
            )));
        }

        if !(self.update_radius > 0.0 && self.update_radius.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "expected positive update radius, got {}", self.update_radius
            )));
        }

        let simulation_box = SimulationBox::new(self.simulation_box.clone())?;

        // trial moves are folded back by at most one box length
        let smallest_length = simulation_box.lengths().iter().copied().fold(f64::INFINITY, f64::min);
        if self.update_radius >= smallest_length {
            return Err(Error::InvalidParameter(format!(
                "expected update radius smaller than the smallest box length ({}), got {}",
                smallest_length, self.update_radius
            )));
        }

        if !(0.0..=1.0).contains(&self.update_probability) {
            return Err(Error::InvalidParameter(format!(
                "expected update probability between 0 and 1, got {}", self.update_probability
            )));
        }

        if self.lj_sigmas.len() != self.charges.len() || self.lj_epsilons.len() != self.charges.len() {
            return Err(Error::InvalidParameter(format!(
                "expected the same number of charges ({}), Lennard-Jones σ ({}) and Lennard-Jones ε ({})",
                self.charges.len(), self.lj_sigmas.len(), self.lj_epsilons.len()
            )));
        }

        return Ok(());
    }

    /// Get the simulation box corresponding to these parameters
    pub fn simulation_box(&self) -> Result<SimulationBox, Error> {
        SimulationBox::new(self.simulation_box.clone())
    }
}
