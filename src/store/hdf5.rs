//! Matrix containers in HDF5 format.

use super::MatrixContainer;
use crate::error::Result;
use hdf5_rs::File;
use ndarray::prelude::*;
use std::path::Path;

/// Open HDF5 file holding the tables of one basis family as root-level datasets.
pub struct Hdf5Container {
    file: File,
}

impl Hdf5Container {
    /// Opens the HDF5 file at the given path for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }
}

impl MatrixContainer for Hdf5Container {
    fn read_matrix(&mut self, name: &str) -> Result<Option<Array2<f64>>> {
        if !self.file.link_exists(name) {
            return Ok(None);
        }
        Ok(Some(self.file.dataset(name)?.read_2d::<f64>()?))
    }

    fn read_vector(&mut self, name: &str) -> Result<Option<Array1<f64>>> {
        if !self.file.link_exists(name) {
            return Ok(None);
        }
        let values = self.file.dataset(name)?.read_dyn::<f64>()?;
        Ok(Some(values.iter().cloned().collect()))
    }
}
