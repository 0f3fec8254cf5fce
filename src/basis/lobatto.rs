//! Generated tables for the tensor-product Gauss-Lobatto nodal basis.

use super::MAX_LOBATTO_DIM;
use crate::interpolation::decompose_offset;
use ndarray::prelude::*;

const ONE_OVER_SQRT_5: f64 = 0.447_213_595_499_957_9; // 1/sqrt(5)
const SQRT_3_OVER_7: f64 = 0.654_653_670_707_977_1; // sqrt(3/7)

const NODES_1: [f64; 2] = [-1.0, 1.0];
const NODES_2: [f64; 3] = [-1.0, 0.0, 1.0];
const NODES_3: [f64; 4] = [-1.0, -ONE_OVER_SQRT_5, ONE_OVER_SQRT_5, 1.0];
const NODES_4: [f64; 5] = [-1.0, -SQRT_3_OVER_7, 0.0, SQRT_3_OVER_7, 1.0];

const WEIGHTS_1: [f64; 2] = [1.0, 1.0];
const WEIGHTS_2: [f64; 3] = [1.0 / 3.0, 4.0 / 3.0, 1.0 / 3.0];
const WEIGHTS_3: [f64; 4] = [1.0 / 6.0, 5.0 / 6.0, 5.0 / 6.0, 1.0 / 6.0];
const WEIGHTS_4: [f64; 5] = [0.1, 49.0 / 90.0, 32.0 / 45.0, 49.0 / 90.0, 0.1];

/// Returns the Gauss-Lobatto nodes on [-1, 1] for the given polynomial order.
pub fn nodes(poly_order: usize) -> Option<&'static [f64]> {
    match poly_order {
        1 => Some(&NODES_1),
        2 => Some(&NODES_2),
        3 => Some(&NODES_3),
        4 => Some(&NODES_4),
        _ => None,
    }
}

/// Returns the Gauss-Lobatto quadrature weights on [-1, 1] for the given polynomial order.
pub fn weights_1d(poly_order: usize) -> Option<&'static [f64]> {
    match poly_order {
        1 => Some(&WEIGHTS_1),
        2 => Some(&WEIGHTS_2),
        3 => Some(&WEIGHTS_3),
        4 => Some(&WEIGHTS_4),
        _ => None,
    }
}

/// Returns the reference coordinates of the centers of the `num_interp` equal
/// sub-intervals of [-1, 1].
pub fn sample_points(num_interp: usize) -> Array1<f64> {
    Array::from_iter(
        (0..num_interp).map(|k| -1.0 + (2 * k + 1) as f64 / num_interp as f64),
    )
}

/// Evaluates the Lagrange polynomial that is one at `nodes[node_idx]` and zero
/// at the other nodes.
pub fn lagrange_polynomial(nodes: &[f64], node_idx: usize, x: f64) -> f64 {
    nodes
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != node_idx)
        .fold(1.0, |product, (_, &node)| {
            product * (x - node) / (nodes[node_idx] - node)
        })
}

/// Computes the transform matrix evaluating the nodal basis at `poly_order + 1`
/// sample points per dimension.
///
/// Row `n` corresponds to the sample point with per-dimension offsets given by
/// the mixed-radix decomposition of `n`, and column `m` to the node obtained the
/// same way, so the first dimension varies fastest in both.
pub fn transform_matrix(dim: usize, poly_order: usize) -> Option<Array2<f64>> {
    if !(1..=MAX_LOBATTO_DIM).contains(&dim) {
        return None;
    }
    let nodes = nodes(poly_order)?;
    let num_interp = poly_order + 1;
    let points = sample_points(num_interp);

    let num_rows = num_interp.pow(dim as u32);
    let num_cols = nodes.len().pow(dim as u32);

    let mut matrix = Array2::zeros((num_rows, num_cols));
    for ((row, col), entry) in matrix.indexed_iter_mut() {
        let point_offsets = decompose_offset(row, num_interp, dim);
        let node_offsets = decompose_offset(col, nodes.len(), dim);
        *entry = point_offsets
            .iter()
            .zip(node_offsets.iter())
            .map(|(&i, &m)| lagrange_polynomial(nodes, m, points[i]))
            .product();
    }
    Some(matrix)
}

/// Computes the tensor-product quadrature weights for the nodes, ordered like
/// the columns of [`transform_matrix`].
pub fn weights(dim: usize, poly_order: usize) -> Option<Array1<f64>> {
    if !(1..=MAX_LOBATTO_DIM).contains(&dim) {
        return None;
    }
    let weights = weights_1d(poly_order)?;
    let num_nodes = weights.len().pow(dim as u32);
    Some(Array::from_iter((0..num_nodes).map(|node| {
        decompose_offset(node, weights.len(), dim)
            .into_iter()
            .map(|m| weights[m])
            .product::<f64>()
    })))
}
