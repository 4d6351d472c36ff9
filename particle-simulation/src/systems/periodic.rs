//! The `SimulationBox` type represents the enclosing rectangular box of a
//! simulated system, with periodic boundary conditions along every axis.
use crate::Error;

/// Fold a single coordinate back inside the primary box `[0, length)`.
///
/// This moves the coordinate by at most one box length: values which are more
/// than one box length away from the primary image are left outside of it.
/// Callers needing a full modulo must ensure their displacements are smaller
/// than the box.
#[inline]
pub fn wrap_coordinate(value: f64, length: f64) -> f64 {
    if value >= length {
        return value - length;
    } else if value < 0.0 {
        let wrapped = value + length;
        // tiny negative values are rounded to `length`
        if wrapped >= length {
            return 0.0;
        }
        return wrapped;
    }
    return value;
}

/// A `SimulationBox` defines the system physical boundaries, as one edge
/// length per spatial dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationBox {
    lengths: Vec<f64>,
}

impl SimulationBox {
    /// Create a new box with the given edge `lengths`. All the lengths must be
    /// positive and finite.
    pub fn new(lengths: Vec<f64>) -> Result<SimulationBox, Error> {
        if lengths.is_empty() {
            return Err(Error::InvalidParameter(
                "the simulation box must have at least one dimension".into()
            ));
        }

        for (axis, &length) in lengths.iter().enumerate() {
            if !(length > 0.0 && length.is_finite()) {
                return Err(Error::InvalidParameter(format!(
                    "expected positive box length along axis {}, got {}",
                    axis, length
                )));
            }
        }

        return Ok(SimulationBox { lengths: lengths });
    }

    /// Create a cubic box in `dimension` dimensions, with all edges of
    /// the given `length`.
    pub fn cubic(length: f64, dimension: usize) -> Result<SimulationBox, Error> {
        SimulationBox::new(vec![length; dimension])
    }

    /// Get the edge lengths of this box
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Get the number of spatial dimensions of this box
    pub fn dimension(&self) -> usize {
        self.lengths.len()
    }

    /// Get the volume (or area, in 2D) of this box
    pub fn volume(&self) -> f64 {
        self.lengths.iter().product()
    }

    /// Wrap a position inside the box, applying [`wrap_coordinate`] along
    /// every axis.
    pub fn wrap(&self, position: &mut [f64]) {
        debug_assert_eq!(position.len(), self.dimension());
        for (value, &length) in position.iter_mut().zip(&self.lengths) {
            *value = wrap_coordinate(*value, length);
        }
    }

    /// Check if a position is inside the primary box, i.e. if `0 <= x < L`
    /// along every axis.
    pub fn contains(&self, position: &[f64]) -> bool {
        if position.len() != self.dimension() {
            return false;
        }

        position.iter()
            .zip(&self.lengths)
            .all(|(&value, &length)| value >= 0.0 && value < length)
    }
}
