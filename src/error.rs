//! Error handling.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors that can occur while loading or reconstructing DG data.
#[derive(Error, Debug)]
pub enum DgError {
    #[error("File {} does not exist", .0.to_string_lossy())]
    NotFound(PathBuf),

    #[error("Invalid data format: {0}")]
    Format(String),

    #[error("Unsupported basis: {family} in {dim}D with polynomial order {poly_order}")]
    UnsupportedBasis {
        family: String,
        dim: usize,
        poly_order: usize,
    },

    #[error("Unsupported basis: unknown basis family {0:?}")]
    UnknownFamily(String),

    #[error("Unsupported number of dimensions {dim} (supported: {supported})")]
    UnsupportedDimension { dim: usize, supported: &'static str },

    #[error("Component {component} out of range for {num_equations} equations")]
    ComponentRange {
        component: usize,
        num_equations: usize,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Index {index} out of range for axis {axis} of length {len}")]
    AxisIndex {
        axis: usize,
        index: usize,
        len: usize,
    },

    #[error("Invalid axis fix specification {0:?}")]
    InvalidAxisFix(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Could not read NPZ container: {0}")]
    Npz(String),

    #[cfg(feature = "hdf5")]
    #[error(transparent)]
    Hdf5(#[from] hdf5_rs::Error),

    #[cfg(feature = "pickle")]
    #[error(transparent)]
    Pickle(#[from] serde_pickle::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, DgError>;

impl DgError {
    /// Whether the error reports a basis that has no support table entry or data.
    pub fn is_unsupported_basis(&self) -> bool {
        matches!(self, Self::UnsupportedBasis { .. } | Self::UnknownFamily(_))
    }
}

impl From<ndarray_npy::ReadNpzError> for DgError {
    fn from(err: ndarray_npy::ReadNpzError) -> Self {
        Self::Npz(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DgError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ShapeMismatch(err.to_string())
    }
}
