//! Metropolis Monte Carlo sampling of particle positions.

mod parameters;
pub use self::parameters::Parameters;

mod metropolis;
pub use self::metropolis::MetropolisMonteCarlo;
