//! Precomputed transform matrices and quadrature weights for the basis families.

pub mod npz;

#[cfg(feature = "hdf5")]
pub mod hdf5;

use crate::{
    basis::{lobatto, BasisFamily, BasisSpec},
    error::{DgError, Result},
};
use ndarray::prelude::*;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Dense matrix mapping the nodes (or modes) of a cell to values at its sample points.
pub type TransformMatrix = Array2<f64>;

/// Weights for integrating nodal data over the reference cell.
pub type QuadratureWeights = Array1<f64>;

/// Storage format of the per-family matrix containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerFormat {
    /// NumPy `.npz` archive with one named array per matrix.
    Npz,
    /// HDF5 file with one named dataset per matrix in the root group.
    #[cfg(feature = "hdf5")]
    Hdf5,
    /// No files; Lobatto tables are generated on request.
    Generated,
}

impl ContainerFormat {
    /// Returns the file extension used for containers of this format, if any.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Npz => Some("npz"),
            #[cfg(feature = "hdf5")]
            Self::Hdf5 => Some("h5"),
            Self::Generated => None,
        }
    }
}

/// Defines the properties of an open container holding the tables of one basis family.
pub trait MatrixContainer {
    /// Reads the named 2D array, or returns `None` if the container has no such entry.
    fn read_matrix(&mut self, name: &str) -> Result<Option<Array2<f64>>>;

    /// Reads the named array flattened to 1D, or returns `None` if the container has no such entry.
    fn read_vector(&mut self, name: &str) -> Result<Option<Array1<f64>>>;
}

/// Configuration parameters for the transform matrix store.
#[derive(Clone, Debug)]
pub struct TransformMatrixStoreConfig {
    /// Directory holding one container per basis family.
    resource_root: PathBuf,
    /// Format of the containers.
    container_format: ContainerFormat,
}

impl TransformMatrixStoreConfig {
    /// Creates a new set of store configuration parameters.
    pub fn new<P: AsRef<Path>>(resource_root: P, container_format: ContainerFormat) -> Self {
        Self {
            resource_root: resource_root.as_ref().to_path_buf(),
            container_format,
        }
    }

    /// Creates a configuration for a store generating its tables instead of reading files.
    pub fn generated() -> Self {
        Self::new(PathBuf::new(), ContainerFormat::Generated)
    }

    pub fn resource_root(&self) -> &Path {
        self.resource_root.as_path()
    }

    pub fn container_format(&self) -> ContainerFormat {
        self.container_format
    }
}

/// Store resolving transform matrices and quadrature weights for a basis.
///
/// The container of the relevant family is opened for each lookup and released
/// before the lookup returns. Use [`CachedTransformMatrixStore`] for repeated lookups.
#[derive(Clone, Debug)]
pub struct TransformMatrixStore {
    config: TransformMatrixStoreConfig,
}

impl TransformMatrixStore {
    /// Creates a new store with the given configuration.
    pub fn new(config: TransformMatrixStoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformMatrixStoreConfig {
        &self.config
    }

    /// Returns the path of the container holding the tables of the given family,
    /// or `None` if the store does not use files.
    pub fn container_path(&self, family: BasisFamily) -> Option<PathBuf> {
        self.config.container_format.extension().map(|extension| {
            self.config
                .resource_root
                .join(format!("xform_{}.{}", family.label(), extension))
        })
    }

    /// Loads the transform matrix for the given basis.
    pub fn load_matrix(&self, basis: &BasisSpec) -> Result<TransformMatrix> {
        let matrix = match self.open_container(basis.family())? {
            Some(mut container) => container.read_matrix(&basis.matrix_key())?,
            None => match basis.family() {
                BasisFamily::Lobatto => lobatto::transform_matrix(basis.dim(), basis.poly_order()),
                _ => None,
            },
        }
        .ok_or_else(|| basis.unsupported())?;

        if matrix.ncols() != basis.num_nodes() {
            return Err(DgError::ShapeMismatch(format!(
                "Transform matrix {} for {} has {} columns, expected {}",
                basis.matrix_key(),
                basis,
                matrix.ncols(),
                basis.num_nodes()
            )));
        }
        Ok(matrix)
    }

    /// Loads the transform matrix for the basis given by a family label, dimensionality
    /// and polynomial order.
    pub fn load_by_label(
        &self,
        dim: usize,
        poly_order: usize,
        family_label: &str,
    ) -> Result<TransformMatrix> {
        self.load_matrix(&BasisSpec::from_label(family_label, dim, poly_order)?)
    }

    /// Loads the quadrature weights for the given basis.
    ///
    /// Weights are only tabulated for the Lobatto family.
    pub fn load_weights(&self, basis: &BasisSpec) -> Result<QuadratureWeights> {
        if basis.family() != BasisFamily::Lobatto {
            return Err(basis.unsupported());
        }
        let weights = match self.open_container(basis.family())? {
            Some(mut container) => container.read_vector(&basis.weights_key())?,
            None => lobatto::weights(basis.dim(), basis.poly_order()),
        }
        .ok_or_else(|| basis.unsupported())?;

        if weights.len() != basis.num_nodes() {
            return Err(DgError::ShapeMismatch(format!(
                "Quadrature weights {} for {} have length {}, expected {}",
                basis.weights_key(),
                basis,
                weights.len(),
                basis.num_nodes()
            )));
        }
        Ok(weights)
    }

    fn open_container(&self, family: BasisFamily) -> Result<Option<Box<dyn MatrixContainer>>> {
        let path = match self.container_path(family) {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Err(DgError::NotFound(path));
        }
        debug!("Opening {} matrix container {}", family, path.display());

        let container: Box<dyn MatrixContainer> = match self.config.container_format {
            ContainerFormat::Npz => Box::new(npz::NpzContainer::open(&path)?),
            #[cfg(feature = "hdf5")]
            ContainerFormat::Hdf5 => Box::new(hdf5::Hdf5Container::open(&path)?),
            ContainerFormat::Generated => return Ok(None),
        };
        Ok(Some(container))
    }
}

/// Wrapper around a [`TransformMatrixStore`] that keeps every loaded table in memory.
#[derive(Debug)]
pub struct CachedTransformMatrixStore {
    store: TransformMatrixStore,
    matrices: HashMap<BasisSpec, TransformMatrix>,
    weights: HashMap<BasisSpec, QuadratureWeights>,
}

impl CachedTransformMatrixStore {
    /// Creates a new cache around the given store.
    pub fn new(store: TransformMatrixStore) -> Self {
        Self {
            store,
            matrices: HashMap::new(),
            weights: HashMap::new(),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &TransformMatrixStore {
        &self.store
    }

    /// Returns the transform matrix for the given basis, loading it if not cached.
    pub fn matrix(&mut self, basis: &BasisSpec) -> Result<&TransformMatrix> {
        if self.matrices.contains_key(basis) {
            debug!("Using cached transform matrix for {}", basis);
        } else {
            let matrix = self.store.load_matrix(basis)?;
            self.matrices.insert(*basis, matrix);
        }
        Ok(&self.matrices[basis])
    }

    /// Returns the quadrature weights for the given basis, loading them if not cached.
    pub fn weights(&mut self, basis: &BasisSpec) -> Result<&QuadratureWeights> {
        if self.weights.contains_key(basis) {
            debug!("Using cached quadrature weights for {}", basis);
        } else {
            let weights = self.store.load_weights(basis)?;
            self.weights.insert(*basis, weights);
        }
        Ok(&self.weights[basis])
    }

    /// Returns the number of cached matrices and weight vectors.
    pub fn num_cached(&self) -> usize {
        self.matrices.len() + self.weights.len()
    }

    /// Drops all cached tables.
    pub fn clear(&mut self) {
        self.matrices.clear();
        self.weights.clear();
    }
}

impl From<TransformMatrixStore> for CachedTransformMatrixStore {
    fn from(store: TransformMatrixStore) -> Self {
        Self::new(store)
    }
}
