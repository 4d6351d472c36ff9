use log::debug;

use crate::Error;

mod periodic;
pub use self::periodic::{SimulationBox, wrap_coordinate};

mod grid;
pub use self::grid::{CellGrid, cell_linear_index};

mod neighbors;
pub use self::neighbors::{CellList, CellParticles, EMPTY};

#[cfg(test)]
pub(crate) mod test_utils;

/// A `System` contains the positions of all particles in a periodic simulation
/// box, and sorts them in a [`CellList`] with cells at least as large as a
/// cutoff radius.
///
/// The cell list is used by pair enumeration code to only look for the
/// neighbors of a particle in the cell containing it and the cells around it.
/// Looking at neighboring cells, and applying periodic boundary conditions to
/// cell indexes, is left to this pair enumeration code.
#[derive(Debug, Clone)]
pub struct System {
    /// positions of all particles, as one vector per particle
    positions: Vec<Vec<f64>>,
    /// box containing the particles
    simulation_box: SimulationBox,
    /// cutoff radius used to define the cells
    cutoff: f64,
    /// number of spatial dimensions, taken from the first particle
    dimension: usize,
    /// grid of cells covering the box
    grid: CellGrid,
    /// particles sorted by cell
    cell_list: CellList,
    /// does `cell_list` match the current positions?
    built: bool,
}

impl System {
    /// Create a new system containing particles at the given `positions`,
    /// inside the periodic `simulation_box`. The cells used to sort particles
    /// will be at least as large as `cutoff` along every axis.
    ///
    /// The number of dimensions of the system is taken from the first
    /// position, and must match the dimensions of the box. The cell list is
    /// not built yet; call [`System::construct_neighborlist`] to fill it.
    pub fn new(positions: Vec<Vec<f64>>, simulation_box: SimulationBox, cutoff: f64) -> Result<System, Error> {
        let dimension = positions.first().map_or(simulation_box.dimension(), |position| position.len());
        if dimension != simulation_box.dimension() {
            return Err(Error::DimensionMismatch {
                expected: simulation_box.dimension(),
                got: dimension,
                context: "the first particle and the simulation box".into(),
            });
        }

        let grid = CellGrid::new(&simulation_box, cutoff)?;
        let cell_list = CellList::new(grid.cell_counts(), positions.len());

        debug!(
            "created cell grid with {:?} cells of size {:?} for {} particles",
            grid.cell_counts(), grid.cell_sizes(), positions.len()
        );

        return Ok(System {
            positions: positions,
            simulation_box: simulation_box,
            cutoff: cutoff,
            dimension: dimension,
            grid: grid,
            cell_list: cell_list,
            built: false,
        });
    }

    /// Get the number of particles in this system
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of spatial dimensions of this system
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get the simulation box of this system
    pub fn simulation_box(&self) -> &SimulationBox {
        &self.simulation_box
    }

    /// Get the cutoff radius used to create the cells
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Get the positions of all particles in this system. After a call to
    /// [`System::construct_neighborlist`], all positions are inside the box.
    pub fn positions(&self) -> &[Vec<f64>] {
        &self.positions
    }

    /// Get mutable access to the positions of the particles. This invalidates
    /// the cell list, which must be built again before being used.
    pub fn positions_mut(&mut self) -> &mut [Vec<f64>] {
        self.built = false;
        return &mut self.positions;
    }

    /// Get the grid of cells used by this system
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Get the number of cells along each axis
    pub fn cell_counts(&self) -> &[usize] {
        self.grid.cell_counts()
    }

    /// Get the size of the cells along each axis
    pub fn cell_sizes(&self) -> &[f64] {
        self.grid.cell_sizes()
    }

    /// Get the total number of cells
    pub fn total_cell_count(&self) -> usize {
        self.grid.total_cell_count()
    }

    /// Get the cell list for this system
    pub fn cell_list(&self) -> &CellList {
        &self.cell_list
    }

    /// Get the head of the particle chain for each cell, indexed by linear
    /// cell index (see [`cell_linear_index`]). Empty cells contain [`EMPTY`].
    pub fn heads(&self) -> &[isize] {
        self.cell_list.heads()
    }

    /// Get the next particle in the chain of the same cell for each particle,
    /// or [`EMPTY`] for the last particle of the chain.
    pub fn links(&self) -> &[isize] {
        self.cell_list.links()
    }

    /// Iterate over the particles in the cell with the given linear index
    pub fn cell_particles(&self, cell: usize) -> CellParticles<'_> {
        self.cell_list.particles(cell)
    }

    /// Check if the cell list is up to date with the positions, i.e. if
    /// [`System::construct_neighborlist`] was called since the last
    /// modification of the positions.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Build the cell list from scratch for the current positions.
    ///
    /// All positions are wrapped inside the box **in place**, moving them by at
    /// most one box length along each axis. Every particle is then added at the
    /// head of the chain of the cell containing it, in order.
    ///
    /// All positions are checked before anything is modified: if a position
    /// does not have the right number of dimensions or is more than one box
    /// length outside the box, this returns an error and both the positions
    /// and the cell list are left untouched.
    #[time_graph::instrument(name = "System::construct_neighborlist")]
    pub fn construct_neighborlist(&mut self) -> Result<(), Error> {
        self.check_positions()?;

        self.cell_list.clear();
        for (index, position) in self.positions.iter_mut().enumerate() {
            self.simulation_box.wrap(position);
            let cell = self.grid.cell_index(position);
            self.cell_list.add_particle(index, cell);
        }

        self.built = true;
        return Ok(());
    }

    /// Update the cell list after moving a few particles.
    ///
    /// Incremental updates are not supported, this always returns
    /// `Error::NotImplemented`. Use [`System::construct_neighborlist`] instead.
    pub fn update_neighbourlist(&mut self) -> Result<(), Error> {
        return Err(Error::NotImplemented(
            "incremental update of the cell list, use construct_neighborlist to rebuild it".into()
        ));
    }

    fn check_positions(&self) -> Result<(), Error> {
        let lengths = self.simulation_box.lengths();
        for (index, position) in self.positions.iter().enumerate() {
            if position.len() != self.dimension {
                return Err(Error::DimensionMismatch {
                    expected: self.dimension,
                    got: position.len(),
                    context: format!("particle {}", index),
                });
            }

            for (axis, (&value, &length)) in position.iter().zip(lengths).enumerate() {
                let wrapped = wrap_coordinate(value, length);
                if !(wrapped >= 0.0 && wrapped <= length) {
                    return Err(Error::InvalidParameter(format!(
                        "particle {} is more than one box length outside of the box \
                        along axis {} (coordinate is {}, box length is {})",
                        index, axis, value, length
                    )));
                }
            }
        }

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_ulps_eq;

    use super::*;
    use super::test_utils::test_system;

    /// Collect all the chains, checking that every particle appears exactly
    /// once
    fn check_chains(system: &System) {
        let mut seen = vec![false; system.size()];
        for cell in 0..system.total_cell_count() {
            for particle in system.cell_particles(cell) {
                assert!(!seen[particle], "particle {} is in more than one chain", particle);
                seen[particle] = true;

                // particles are in the right cell
                assert_eq!(system.grid().cell_index(&system.positions()[particle]), cell);
            }
        }
        assert!(seen.iter().all(|&s| s), "some particles are missing from the chains");
    }

    #[test]
    fn table_sizes() {
        for name in ["lattice", "random", "outside", "2D"] {
            let mut system = test_system(name);
            system.construct_neighborlist().unwrap();

            let total = system.cell_counts().iter().product::<usize>();
            assert_eq!(system.total_cell_count(), total);
            assert_eq!(system.heads().len(), total);
            assert_eq!(system.links().len(), system.size());

            for (&count, (&size, &length)) in system.cell_counts().iter().zip(system.cell_sizes().iter().zip(system.simulation_box().lengths())) {
                assert_ulps_eq!(count as f64 * size, length);
                assert!(size >= system.cutoff());
            }
        }
    }

    #[test]
    fn all_particles_in_one_chain() {
        for name in ["lattice", "random", "outside", "2D"] {
            let mut system = test_system(name);
            system.construct_neighborlist().unwrap();
            check_chains(&system);
        }
    }

    #[test]
    fn chains_are_in_reverse_insertion_order() {
        let mut system = test_system("random");
        system.construct_neighborlist().unwrap();

        for cell in 0..system.total_cell_count() {
            let chain = system.cell_particles(cell).collect::<Vec<_>>();
            assert!(chain.windows(2).all(|w| w[0] > w[1]));
        }
    }

    #[test]
    fn lattice() {
        let mut system = test_system("lattice");
        system.construct_neighborlist().unwrap();

        assert_eq!(system.cell_counts(), &[4, 4, 4]);
        // one particle per cell, in the same order as the cells
        for cell in 0..64 {
            assert_eq!(system.heads()[cell], cell as isize);
            assert_eq!(system.links()[cell], EMPTY);
        }
    }

    #[test]
    fn two_dimensions() {
        let mut system = test_system("2D");
        system.construct_neighborlist().unwrap();

        assert_eq!(system.dimension(), 2);
        assert_eq!(system.cell_counts(), &[5, 3]);

        let mut expected = [EMPTY; 15];
        expected[0] = 2;
        expected[3] = 1;
        expected[13] = 4;
        expected[14] = 3;
        assert_eq!(system.heads(), &expected);
        assert_eq!(system.links(), &[EMPTY, EMPTY, 0, EMPTY, EMPTY]);

        assert_eq!(system.cell_list().heads_grid()[ndarray::IxDyn(&[4, 1])], 4);
    }

    #[test]
    fn positions_are_wrapped_in_place() {
        let mut system = test_system("outside");
        assert!(!system.is_built());
        system.construct_neighborlist().unwrap();
        assert!(system.is_built());

        assert_eq!(system.positions(), &[
            vec![1.5, 1.0, 1.5],
            vec![10.5, 12.0, 5.5],
            vec![1.0, 2.0, 3.0],
            vec![0.0, 0.0, 0.0],
        ]);

        for position in system.positions() {
            assert!(system.simulation_box().contains(position));
        }

        let mut system = test_system("random");
        system.construct_neighborlist().unwrap();
        for position in system.positions() {
            assert!(system.simulation_box().contains(position));
        }
    }

    #[test]
    fn rebuild() {
        let mut system = test_system("2D");
        system.construct_neighborlist().unwrap();
        assert_eq!(system.heads()[0], 2);

        system.positions_mut()[2] = vec![5.0, 5.0];
        assert!(!system.is_built());

        system.construct_neighborlist().unwrap();
        assert!(system.is_built());
        assert_eq!(system.heads()[0], 0);
        assert_eq!(system.links()[0], EMPTY);
        assert_eq!(system.heads()[2 * 3 + 2], 2);
        check_chains(&system);

        // building twice gives the same result
        let heads = system.heads().to_vec();
        let links = system.links().to_vec();
        system.construct_neighborlist().unwrap();
        assert_eq!(system.heads(), heads);
        assert_eq!(system.links(), links);
    }

    #[test]
    fn dimension_mismatch() {
        let mut system = test_system("outside");
        system.construct_neighborlist().unwrap();

        let heads = system.heads().to_vec();
        let links = system.links().to_vec();

        system.positions_mut()[3] = vec![-3.0, 2.0];
        // this one would be wrapped if the build was going through
        system.positions_mut()[2] = vec![13.0, 2.0, 3.0];

        let error = system.construct_neighborlist().unwrap_err();
        match error {
            Error::DimensionMismatch { expected, got, ref context } => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
                assert_eq!(context, "particle 3");
            }
            _ => panic!("expected a dimension mismatch error, got {}", error),
        }

        assert!(!system.is_built());
        assert_eq!(system.heads(), heads);
        assert_eq!(system.links(), links);
        assert_eq!(system.positions()[2], [13.0, 2.0, 3.0]);
    }

    #[test]
    fn mismatched_box() {
        let simulation_box = SimulationBox::cubic(10.0, 3).unwrap();
        let error = System::new(vec![vec![1.0, 2.0]], simulation_box, 2.0).unwrap_err();
        assert!(matches!(error, Error::DimensionMismatch { expected: 3, got: 2, .. }));
    }

    #[test]
    fn degenerate_grid() {
        let simulation_box = SimulationBox::new(vec![12.0, 13.0, 0.4]).unwrap();
        let error = System::new(vec![vec![1.0, 2.0, 0.1]], simulation_box, 0.5).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));

        let simulation_box = SimulationBox::new(vec![12.0, 13.0, 14.0]).unwrap();
        let error = System::new(vec![vec![1.0, 2.0, 3.0]], simulation_box, -0.5).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));
    }

    #[test]
    fn very_large_box() {
        let simulation_box = SimulationBox::cubic(1e6, 3).unwrap();
        let positions = vec![vec![1.0, 2.0, 3.0], vec![5e5, 5e5, 5e5]];
        let mut system = System::new(positions, simulation_box, 1.0).unwrap();
        assert!(system.total_cell_count() <= 10_000_000);
        assert!(system.cell_sizes().iter().all(|&size| size >= system.cutoff()));

        system.construct_neighborlist().unwrap();
        assert_eq!(system.heads()[0], 0);
        check_chains(&system);
    }

    #[test]
    fn tiny_negative_positions() {
        let simulation_box = SimulationBox::cubic(12.0, 2).unwrap();
        let positions = vec![vec![-1e-17, 1.0], vec![5.0, -1e-16]];
        let mut system = System::new(positions, simulation_box, 3.0).unwrap();
        system.construct_neighborlist().unwrap();

        assert_eq!(system.positions(), &[vec![0.0, 1.0], vec![5.0, 0.0]]);
        for position in system.positions() {
            assert!(system.simulation_box().contains(position));
        }

        assert_eq!(system.heads()[0], 0);
        assert_eq!(system.heads()[4], 1);
        check_chains(&system);
    }

    #[test]
    fn far_outside_of_the_box() {
        let simulation_box = SimulationBox::cubic(10.0, 3).unwrap();
        let positions = vec![vec![1.0, 2.0, 3.0], vec![1.0, 25.0, 3.0]];
        let mut system = System::new(positions, simulation_box, 2.0).unwrap();

        let error = system.construct_neighborlist().unwrap_err();
        assert_eq!(error.to_string(),
            "invalid parameter: particle 1 is more than one box length outside \
            of the box along axis 1 (coordinate is 25, box length is 10)"
        );
        assert!(!system.is_built());

        system.positions_mut()[1][1] = f64::NAN;
        assert!(system.construct_neighborlist().is_err());
    }

    #[test]
    fn empty_system() {
        let simulation_box = SimulationBox::cubic(10.0, 2).unwrap();
        let mut system = System::new(Vec::new(), simulation_box, 2.0).unwrap();
        assert_eq!(system.dimension(), 2);
        assert_eq!(system.size(), 0);

        system.construct_neighborlist().unwrap();
        assert_eq!(system.heads(), &[EMPTY; 25]);
        assert!(system.links().is_empty());
    }

    #[test]
    fn incremental_update() {
        let mut system = test_system("lattice");
        let error = system.update_neighbourlist().unwrap_err();
        assert!(matches!(error, Error::NotImplemented(_)));
    }

    #[test]
    fn send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<System>();
    }
}
