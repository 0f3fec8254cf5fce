//! Reconstruction of pointwise field values from per-cell DG coefficients.

use crate::{
    error::{DgError, Result},
    fixing::{self, AxisFix},
    num::{exact_integer_root, BFloat},
    store::TransformMatrix,
};
use ndarray::{prelude::*, Slice};

#[cfg(feature = "pickle")]
use serde::Serialize;

#[cfg(feature = "pickle")]
use std::path::Path;

/// Largest number of spatial dimensions the interpolation is wired for.
pub const MAX_INTERP_DIM: usize = 5;

/// A field sampled on a uniform mesh refined from the simulation grid.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconstructedField<F> {
    coords: Vec<Array1<f64>>,
    values: ArrayD<F>,
}

#[cfg(feature = "pickle")]
#[derive(Serialize)]
struct ReconstructedFieldSerializeData<F: Serialize> {
    coords: Vec<Vec<f64>>,
    values: ArrayD<F>,
}

impl<F: BFloat> ReconstructedField<F> {
    /// Creates a new reconstructed field from the mesh coordinates and values.
    ///
    /// Fails if there is not one coordinate vector per axis of the values with
    /// the same length as that axis.
    pub fn new(coords: Vec<Array1<f64>>, values: ArrayD<F>) -> Result<Self> {
        fixing::check_coords_match_shape(&coords, values.shape())?;
        Ok(Self { coords, values })
    }

    /// Returns a slice with the mesh coordinates along each axis.
    pub fn coords(&self) -> &[Array1<f64>] {
        &self.coords
    }

    /// Returns a reference to the array of reconstructed values.
    pub fn values(&self) -> &ArrayD<F> {
        &self.values
    }

    /// Returns the shape of the array of reconstructed values.
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Returns the number of axes of the field.
    pub fn num_dims(&self) -> usize {
        self.values.ndim()
    }

    /// Consumes the field and returns the coordinates and values.
    pub fn into_parts(self) -> (Vec<Array1<f64>>, ArrayD<F>) {
        (self.coords, self.values)
    }

    /// Returns a lower-dimensional version of the field where the given axes are fixed.
    ///
    /// See [`fixing::fix_axes`] for how the specifications are applied.
    pub fn fix_axes(&self, fixes: &[Option<AxisFix>]) -> Result<Self> {
        let (coords, values) = fixing::fix_axes(&self.coords, self.values.view(), fixes)?;
        Ok(Self { coords, values })
    }

    /// Serializes the field data into pickle format and save at the given path.
    #[cfg(feature = "pickle")]
    pub fn save_as_pickle(&self, output_file_path: &Path) -> Result<()>
    where
        F: Serialize,
    {
        let data = ReconstructedFieldSerializeData {
            coords: self.coords.iter().map(Array1::to_vec).collect(),
            values: self.values.clone(),
        };
        let file = std::fs::File::create(output_file_path)?;
        serde_pickle::to_writer(
            &mut std::io::BufWriter::new(file),
            &data,
            serde_pickle::SerOptions::new(),
        )?;
        Ok(())
    }
}

/// Decomposes a flat sub-cell offset into per-dimension offsets, with the first
/// dimension being the least significant.
pub fn decompose_offset(offset: usize, radix: usize, dim: usize) -> Vec<usize> {
    let mut remainder = offset;
    (0..dim)
        .map(|_| {
            let digit = remainder % radix;
            remainder /= radix;
            digit
        })
        .collect()
}

/// Composes per-dimension offsets into a flat sub-cell offset, inverting [`decompose_offset`].
pub fn compose_offset(offsets: &[usize], radix: usize) -> usize {
    offsets
        .iter()
        .rev()
        .fold(0, |offset, &digit| offset * radix + digit)
}

/// Determines how many sample points per dimension the transform matrix evaluates
/// the basis at, for data with the given number of spatial dimensions.
pub fn num_interp_points(matrix: &TransformMatrix, dim: usize) -> Result<usize> {
    exact_integer_root(matrix.nrows(), dim).ok_or_else(|| {
        DgError::ShapeMismatch(format!(
            "Transform matrix with {} rows does not sample a {}D cell uniformly",
            matrix.nrows(),
            dim
        ))
    })
}

/// Computes the coordinates of `num_interp` equally spaced samples in each cell,
/// spanning the grid from the lower edge of the first cell to the upper edge of
/// the last.
pub fn refined_coords(
    cell_centers: &Array1<f64>,
    cell_extent: f64,
    num_interp: usize,
) -> Array1<f64> {
    let num_cells = cell_centers.len();
    if num_cells == 0 {
        return Array1::zeros(0);
    }
    let num_samples = num_cells * num_interp;
    let edge_low = cell_centers[0] - 0.5 * cell_extent;
    let edge_high = cell_centers[num_cells - 1] + 0.5 * cell_extent;
    let sample_extent = (edge_high - edge_low) / num_samples as f64;
    Array::linspace(
        edge_low + 0.5 * sample_extent,
        edge_high - 0.5 * sample_extent,
        num_samples,
    )
}

/// Interpolates per-cell coefficients onto a mesh refined by the number of sample
/// points per dimension implied by the transform matrix.
///
/// # Parameters
///
/// - `matrix`: Transform matrix of shape `(num_interp^dim, num_nodes)`.
/// - `coefficients`: Array of shape `(num_cells[0], ..., num_cells[dim - 1], num_nodes)`.
///
/// # Returns
///
/// An array of shape `(num_cells[0]*num_interp, ..., num_cells[dim - 1]*num_interp)`.
pub fn interpolate<F: BFloat>(
    matrix: &TransformMatrix,
    coefficients: ArrayViewD<F>,
) -> Result<ArrayD<F>> {
    let dim = coefficients.ndim().saturating_sub(1);
    if !(1..=MAX_INTERP_DIM).contains(&dim) {
        return Err(DgError::UnsupportedDimension {
            dim,
            supported: "1 to 5",
        });
    }
    let num_nodes = coefficients.shape()[dim];
    if matrix.ncols() != num_nodes {
        return Err(DgError::ShapeMismatch(format!(
            "Transform matrix has {} columns but the coefficients have {} nodes per cell",
            matrix.ncols(),
            num_nodes
        )));
    }
    let num_interp = num_interp_points(matrix, dim)?;

    let cell_shape = coefficients.shape()[..dim].to_vec();
    let num_cells: usize = cell_shape.iter().product();
    let fine_shape: Vec<usize> = cell_shape.iter().map(|&n| n * num_interp).collect();
    if num_cells == 0 {
        return Ok(ArrayD::zeros(IxDyn(&fine_shape)));
    }

    // Flatten to (cells, nodes) in logical order so that each contraction can be
    // reshaped back to the cell layout.
    let flat_coefficients = Array::from_shape_vec(
        (num_cells, num_nodes),
        coefficients.iter().map(|&value| value.to_accum()).collect(),
    )?;
    let sampled = flat_coefficients.dot(&matrix.t());

    let mut values = ArrayD::<F>::zeros(IxDyn(&fine_shape));

    for offset in 0..matrix.nrows() {
        let offsets = decompose_offset(offset, num_interp, dim);
        let contribution = Array::from_shape_vec(
            IxDyn(&cell_shape),
            sampled.column(offset).iter().map(|&v| F::from_accum(v)).collect(),
        )?;
        values
            .slice_each_axis_mut(|axis| {
                Slice::new(offsets[axis.axis.index()] as isize, None, num_interp as isize)
            })
            .assign(&contribution);
    }
    Ok(values)
}

/// Interpolates per-cell coefficients and pairs the result with the refined mesh.
///
/// # Parameters
///
/// - `matrix`: Transform matrix of shape `(num_interp^dim, num_nodes)`.
/// - `coefficients`: Array of shape `(num_cells[0], ..., num_cells[dim - 1], num_nodes)`.
/// - `cell_centers`: Coordinates of the cell centers along each dimension.
/// - `cell_extents`: Extent of a cell along each dimension.
pub fn interpolate_on_mesh<F: BFloat>(
    matrix: &TransformMatrix,
    coefficients: ArrayViewD<F>,
    cell_centers: &[Array1<f64>],
    cell_extents: &[f64],
) -> Result<ReconstructedField<F>> {
    let dim = coefficients.ndim().saturating_sub(1);
    if cell_centers.len() != dim || cell_extents.len() != dim {
        return Err(DgError::ShapeMismatch(format!(
            "Got coordinates for {} and extents for {} dimensions, but the coefficients have {}",
            cell_centers.len(),
            cell_extents.len(),
            dim
        )));
    }
    let values = interpolate(matrix, coefficients)?;
    let num_interp = num_interp_points(matrix, dim)?;
    let coords = cell_centers
        .iter()
        .zip(cell_extents)
        .map(|(centers, &extent)| refined_coords(centers, extent, num_interp))
        .collect();
    ReconstructedField::new(coords, values)
}
