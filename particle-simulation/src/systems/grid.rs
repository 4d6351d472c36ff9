use log::warn;

use crate::Error;
use super::SimulationBox;

/// Maximal number of cells in a grid. Above this, cells are made larger than
/// the cutoff to limit the memory used by the cell list.
const MAX_NUMBER_OF_CELLS: f64 = 1e7;

/// Compute the linear index of the cell at `cell_coords` in a grid with
/// `cell_counts` cells along each axis.
///
/// Cells are numbered in row-major order, with the last axis varying fastest.
/// In 3D, this is `x * ny * nz + y * nz + z`. This is the same order as the
/// standard memory layout of an `ndarray` array with shape `cell_counts`.
///
/// Each `cell_coords[k]` must be smaller than `cell_counts[k]`, this is only
/// checked in debug mode.
#[inline]
pub fn cell_linear_index(cell_coords: &[usize], cell_counts: &[usize]) -> usize {
    debug_assert_eq!(cell_coords.len(), cell_counts.len());

    let mut index = 0;
    let mut stride = 1;
    for (&coordinate, &count) in cell_coords.iter().zip(cell_counts).rev() {
        debug_assert!(coordinate < count, "cell coordinate {} is out of bounds (count is {})", coordinate, count);
        index += coordinate * stride;
        stride *= count;
    }
    return index;
}

/// Reduce the number of cells along each axis so that the total number of
/// cells is at most `max_cells`, keeping roughly the ratio of cells between
/// axes. Axes are processed from the one with the fewest cells, which may be
/// reduced to a single cell. Products are computed in log space, since the
/// initial total can overflow.
fn limit_number_of_cells(counts: &mut [f64], max_cells: f64) {
    let mut axes = (0..counts.len()).collect::<Vec<_>>();
    axes.sort_by(|&a, &b| counts[a].total_cmp(&counts[b]));

    let mut log_budget = f64::ln(max_cells);
    let mut log_remaining = counts.iter().map(|&count| f64::ln(count)).sum::<f64>();
    for (i, &axis) in axes.iter().enumerate() {
        let log_count = f64::ln(counts[axis]);
        if log_remaining > log_budget {
            let n_remaining_axes = (axes.len() - i) as f64;
            let scaled = f64::exp(log_count + (log_budget - log_remaining) / n_remaining_axes);
            counts[axis] = f64::max(1.0, f64::trunc(scaled));
        }

        log_budget -= f64::ln(counts[axis]);
        log_remaining -= log_count;
    }
}

/// Regular grid of cells covering a `SimulationBox`, with cells at least as
/// large as a cutoff radius.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    /// Number of cells along each axis
    cell_counts: Vec<usize>,
    /// Size of the cells along each axis
    cell_sizes: Vec<f64>,
    /// Product of all `cell_counts`
    total_cell_count: usize,
}

impl CellGrid {
    /// Create the grid for the given box and cutoff. Along each axis, the box
    /// is divided in `floor(length / cutoff)` cells of equal size. If this
    /// would create more than 10 million cells in total, fewer and larger
    /// cells are used instead.
    ///
    /// This fails if the box is smaller than the cutoff along any axis, since
    /// the grid would then contain no cell at all.
    pub fn new(simulation_box: &SimulationBox, cutoff: f64) -> Result<CellGrid, Error> {
        if !(cutoff > 0.0 && cutoff.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "expected positive cutoff radius, got {}", cutoff
            )));
        }

        let mut counts = Vec::with_capacity(simulation_box.dimension());
        for (axis, &length) in simulation_box.lengths().iter().enumerate() {
            let count = f64::floor(length / cutoff);
            if count < 1.0 {
                return Err(Error::InvalidParameter(format!(
                    "the box length along axis {} ({}) is smaller than the cutoff radius ({})",
                    axis, length, cutoff
                )));
            }

            if !count.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "too many cells along axis {} for box length {} and cutoff radius {}",
                    axis, length, cutoff
                )));
            }

            counts.push(count);
        }

        let n_cells_total = counts.iter().product::<f64>();
        if n_cells_total > MAX_NUMBER_OF_CELLS {
            limit_number_of_cells(&mut counts, MAX_NUMBER_OF_CELLS);
            warn!(
                "the cell grid would contain {} cells, using {:?} larger cells instead",
                n_cells_total, counts
            );
        }

        let cell_counts = counts.iter().map(|&count| count as usize).collect::<Vec<_>>();
        let cell_sizes = simulation_box.lengths().iter()
            .zip(&counts)
            .map(|(&length, &count)| length / count)
            .collect();
        let total_cell_count = cell_counts.iter().product();

        if cell_counts.iter().any(|&count| count < 3) {
            warn!(
                "the cell grid has fewer than 3 cells along some axis ({:?}), \
                searching neighboring cells will visit the same cell multiple times",
                cell_counts
            );
        }

        return Ok(CellGrid {
            cell_counts: cell_counts,
            cell_sizes: cell_sizes,
            total_cell_count: total_cell_count,
        });
    }

    /// Get the number of dimensions of this grid
    pub fn dimension(&self) -> usize {
        self.cell_counts.len()
    }

    /// Get the number of cells along each axis
    pub fn cell_counts(&self) -> &[usize] {
        &self.cell_counts
    }

    /// Get the size of the cells along each axis
    pub fn cell_sizes(&self) -> &[f64] {
        &self.cell_sizes
    }

    /// Get the total number of cells in this grid
    pub fn total_cell_count(&self) -> usize {
        self.total_cell_count
    }

    /// Get the integer coordinates of the cell containing `position`, which
    /// should already be inside the box.
    ///
    /// Positions exactly on the upper face of the box are assigned to the last
    /// cell along this axis.
    pub fn cell_coordinates(&self, position: &[f64]) -> Vec<usize> {
        debug_assert_eq!(position.len(), self.dimension());

        position.iter()
            .zip(&self.cell_sizes)
            .zip(&self.cell_counts)
            .map(|((&value, &size), &count)| {
                let coordinate = f64::floor(value / size) as usize;
                usize::min(coordinate, count - 1)
            })
            .collect()
    }

    /// Get the linear index of the cell containing `position`
    pub fn cell_index(&self, position: &[f64]) -> usize {
        let coordinates = self.cell_coordinates(position);
        return cell_linear_index(&coordinates, &self.cell_counts);
    }
}
