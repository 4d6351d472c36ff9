use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// Marker used in the cell list tables for the end of a chain/an empty cell
pub const EMPTY: isize = -1;

/// The cell list is used to sort particles inside bins/cells.
///
/// Each cell contains a singly-linked chain of particles, stored in two flat
/// tables: `heads` contains for each cell the index of the last particle added
/// to this cell, and `links` contains for each particle the index of the
/// particle added to the same cell just before it. Both tables use [`EMPTY`]
/// to mark the end of a chain.
#[derive(Debug, Clone)]
pub struct CellList {
    /// head of the chain for each cell, with one axis per spatial dimension
    heads: ArrayD<isize>,
    /// next particle in the chain for each particle
    links: Vec<isize>,
}

impl CellList {
    /// Create a new empty `CellList` for a grid with `cell_counts` cells along
    /// each axis, able to contain `n_particles` particles.
    pub fn new(cell_counts: &[usize], n_particles: usize) -> CellList {
        CellList {
            heads: ArrayD::from_elem(IxDyn(cell_counts), EMPTY),
            links: vec![EMPTY; n_particles],
        }
    }

    /// Remove all particles from this cell list
    pub fn clear(&mut self) {
        self.heads.fill(EMPTY);
        self.links.fill(EMPTY);
    }

    /// Add the particle with the given `index` at the head of the chain for
    /// the cell with linear index `cell`.
    pub fn add_particle(&mut self, index: usize, cell: usize) {
        let heads = self.heads.as_slice_mut().expect("the head table should be contiguous");
        self.links[index] = heads[cell];
        heads[cell] = index as isize;
    }

    /// Get the head of the chain for all cells, indexed by linear cell index
    pub fn heads(&self) -> &[isize] {
        self.heads.as_slice().expect("the head table should be contiguous")
    }

    /// Get the head of the chain for all cells, indexed by cell coordinates
    pub fn heads_grid(&self) -> ArrayViewD<'_, isize> {
        self.heads.view()
    }

    /// Get the next particle in the chain for all particles
    pub fn links(&self) -> &[isize] {
        &self.links
    }

    /// Iterate over the particles in the cell with linear index `cell`, from
    /// the last added to the first added.
    pub fn particles(&self, cell: usize) -> CellParticles<'_> {
        CellParticles {
            links: &self.links,
            current: self.heads()[cell],
        }
    }
}

/// Iterator over the particles in a single cell of a [`CellList`]
#[derive(Debug, Clone)]
pub struct CellParticles<'a> {
    links: &'a [isize],
    current: isize,
}

impl<'a> Iterator for CellParticles<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.current == EMPTY {
            return None;
        }

        let particle = self.current as usize;
        self.current = self.links[particle];
        return Some(particle);
    }
}

impl<'a> std::iter::FusedIterator for CellParticles<'a> {}
