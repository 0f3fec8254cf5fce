//! Matrix containers in NumPy `.npz` format.

use super::MatrixContainer;
use crate::error::Result;
use ndarray::prelude::*;
use ndarray_npy::NpzReader;
use std::{fs::File, path::Path};

/// Open `.npz` archive holding the tables of one basis family.
pub struct NpzContainer {
    reader: NpzReader<File>,
    names: Vec<String>,
}

impl NpzContainer {
    /// Opens the archive at the given path and reads its table of contents.
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = NpzReader::new(File::open(path)?)?;
        let names = reader.names()?;
        Ok(Self { reader, names })
    }

    /// Returns the names of the arrays in the archive, without any `.npy` extension.
    pub fn array_names(&self) -> Vec<&str> {
        self.names
            .iter()
            .map(|name| name.strip_suffix(".npy").unwrap_or(name))
            .collect()
    }

    fn entry_name(&self, name: &str) -> Option<String> {
        self.names
            .iter()
            .find(|entry| entry.as_str() == name || entry.strip_suffix(".npy") == Some(name))
            .cloned()
    }
}

impl MatrixContainer for NpzContainer {
    fn read_matrix(&mut self, name: &str) -> Result<Option<Array2<f64>>> {
        match self.entry_name(name) {
            Some(entry) => Ok(Some(self.reader.by_name(&entry)?)),
            None => Ok(None),
        }
    }

    fn read_vector(&mut self, name: &str) -> Result<Option<Array1<f64>>> {
        match self.entry_name(name) {
            Some(entry) => {
                let values: ArrayD<f64> = self.reader.by_name(&entry)?;
                Ok(Some(values.iter().cloned().collect()))
            }
            None => Ok(None),
        }
    }
}
