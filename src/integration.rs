//! Quadrature-weighted integration of per-cell DG data.

use crate::{
    error::{DgError, Result},
    num::BFloat,
    store::QuadratureWeights,
};
use ndarray::prelude::*;

/// Largest number of spatial dimensions the integration is wired for.
pub const MAX_INTEGRATION_DIM: usize = 3;

/// Integrates nodal data over the whole grid.
///
/// Each cell contributes `prod(0.5*spacing) * sum(weights*data)`, the factors
/// of one half mapping the reference cell [-1, 1]^dim onto the physical cell.
///
/// # Parameters
///
/// - `weights`: Quadrature weight for each node of the reference cell.
/// - `data`: Array of shape `(num_cells[0], ..., num_cells[dim - 1], num_nodes)`.
/// - `spacing`: Extent of a cell along each dimension.
pub fn integrate<F: BFloat>(
    weights: &QuadratureWeights,
    data: ArrayViewD<F>,
    spacing: &[f64],
) -> Result<f64> {
    let dim = data.ndim().saturating_sub(1);
    if !(1..=MAX_INTEGRATION_DIM).contains(&dim) {
        return Err(DgError::UnsupportedDimension {
            dim,
            supported: "1 to 3",
        });
    }
    let num_nodes = data.shape()[dim];
    if weights.len() != num_nodes {
        return Err(DgError::ShapeMismatch(format!(
            "Got {} quadrature weights for {} nodes per cell",
            weights.len(),
            num_nodes
        )));
    }
    if spacing.len() != dim {
        return Err(DgError::ShapeMismatch(format!(
            "Got cell spacing for {} dimensions, but the data has {}",
            spacing.len(),
            dim
        )));
    }

    let jacobian: f64 = spacing.iter().map(|&dx| 0.5 * dx).product();
    let weighted_sum: f64 = data
        .lanes(Axis(dim))
        .into_iter()
        .map(|nodes| {
            nodes
                .iter()
                .zip(weights.iter())
                .map(|(&value, &weight)| weight * value.to_accum())
                .sum::<f64>()
        })
        .sum();
    Ok(jacobian * weighted_sum)
}
