//! Simulation frames holding the grid and the raw DG coefficients.

#[cfg(feature = "hdf5")]
pub mod g1;

use crate::{
    error::{DgError, Result},
    interpolation::ReconstructedField,
    num::BFloat,
};
use ndarray::prelude::*;
use std::{
    mem,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Largest number of spatial dimensions a frame can have.
pub const MAX_FRAME_DIM: usize = 6;

/// Field data that was already projected onto a refined mesh when the frame was written.
pub type ProjectedData<F> = ReconstructedField<F>;

/// One simulation snapshot: a uniform grid and the per-cell coefficients of all components.
#[derive(Clone, Debug)]
pub struct Frame<F> {
    lower_bounds: Vec<f64>,
    upper_bounds: Vec<f64>,
    num_cells: Vec<usize>,
    time: f64,
    values: ArrayD<F>,
    projection: Option<ProjectedData<F>>,
}

impl<F: BFloat> Frame<F> {
    /// Creates a new frame from the grid bounds, cell counts and coefficient array.
    ///
    /// The coefficient array must have one axis per dimension, with lengths
    /// matching the cell counts, followed by the axis of per-cell coefficients.
    /// If the per-cell axis is missing, a single coefficient per cell is assumed.
    pub fn new(
        lower_bounds: Vec<f64>,
        upper_bounds: Vec<f64>,
        num_cells: Vec<usize>,
        values: ArrayD<F>,
    ) -> Result<Self> {
        let num_dims = num_cells.len();
        if num_dims == 0 || num_dims > MAX_FRAME_DIM {
            return Err(DgError::Format(format!(
                "Frames must have between 1 and {} dimensions, got {}",
                MAX_FRAME_DIM, num_dims
            )));
        }
        if lower_bounds.len() != num_dims || upper_bounds.len() != num_dims {
            return Err(DgError::Format(format!(
                "Got {} lower and {} upper bounds for {} dimensions",
                lower_bounds.len(),
                upper_bounds.len(),
                num_dims
            )));
        }
        if num_cells.iter().any(|&n| n == 0) {
            return Err(DgError::Format(format!(
                "Cell counts {:?} contain zero",
                num_cells
            )));
        }
        if lower_bounds
            .iter()
            .zip(&upper_bounds)
            .any(|(lower, upper)| !(upper > lower))
        {
            return Err(DgError::Format(format!(
                "Upper bounds {:?} are not above lower bounds {:?}",
                upper_bounds, lower_bounds
            )));
        }

        let values = if values.ndim() == num_dims {
            values.insert_axis(Axis(num_dims))
        } else {
            values
        };
        if values.ndim() != num_dims + 1 || values.shape()[..num_dims] != num_cells[..] {
            return Err(DgError::Format(format!(
                "Field shape {:?} does not match cell counts {:?}",
                values.shape(),
                num_cells
            )));
        }

        Ok(Self {
            lower_bounds,
            upper_bounds,
            num_cells,
            time: 0.0,
            values,
            projection: None,
        })
    }

    /// Consumes the frame and returns a version with the given simulation time.
    pub fn with_time(self, time: f64) -> Self {
        Self { time, ..self }
    }

    /// Consumes the frame and returns a version carrying the given projected data.
    pub fn with_projection(self, projection: ProjectedData<F>) -> Result<Self> {
        if projection.num_dims() != self.num_dims() {
            return Err(DgError::Format(format!(
                "Projected data has {} dimensions but the frame has {}",
                projection.num_dims(),
                self.num_dims()
            )));
        }
        Ok(Self {
            projection: Some(projection),
            ..self
        })
    }

    /// Returns the number of spatial dimensions.
    pub fn num_dims(&self) -> usize {
        self.num_cells.len()
    }

    pub fn lower_bounds(&self) -> &[f64] {
        &self.lower_bounds
    }

    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper_bounds
    }

    pub fn num_cells(&self) -> &[usize] {
        &self.num_cells
    }

    /// Returns the simulation time of the frame.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns a reference to the raw coefficient array.
    pub fn values(&self) -> &ArrayD<F> {
        &self.values
    }

    /// Returns the number of coefficients stored per cell, over all components.
    pub fn num_coefficients_per_cell(&self) -> usize {
        self.values.shape()[self.num_dims()]
    }

    /// Returns the projected data stored with the frame, if any.
    pub fn projection(&self) -> Option<&ProjectedData<F>> {
        self.projection.as_ref()
    }

    /// Returns the extent of a grid cell in each dimension.
    pub fn cell_extents(&self) -> Vec<f64> {
        self.lower_bounds
            .iter()
            .zip(&self.upper_bounds)
            .zip(&self.num_cells)
            .map(|((&lower, &upper), &n)| (upper - lower) / n as f64)
            .collect()
    }

    /// Returns the coordinates of the cell centers along the given dimension.
    ///
    /// # Panics
    ///
    /// If the dimension is out of range.
    pub fn cell_centers(&self, dim: usize) -> Array1<f64> {
        let dx = (self.upper_bounds[dim] - self.lower_bounds[dim]) / self.num_cells[dim] as f64;
        Array::linspace(
            self.lower_bounds[dim] + 0.5 * dx,
            self.upper_bounds[dim] - 0.5 * dx,
            self.num_cells[dim],
        )
    }

    /// Returns the coordinates of the cell centers along every dimension.
    pub fn all_cell_centers(&self) -> Vec<Array1<f64>> {
        (0..self.num_dims()).map(|dim| self.cell_centers(dim)).collect()
    }
}

/// Container formats frames can be read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    /// HDF5 container with `StructGrid` and `StructGridField` structures.
    G1,
}

impl FrameFormat {
    /// Determines the format from the extension of the given path.
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref();
        match file_path
            .extension()
            .map(|extension| extension.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("h5") | Some("hdf5") => Ok(Self::G1),
            _ => Err(DgError::Format(format!(
                "Unrecognized frame container {}",
                file_path.display()
            ))),
        }
    }
}

/// Configuration parameters for frame readers.
#[derive(Clone, Debug)]
pub struct FrameReaderConfig {
    /// Path to the file.
    file_path: PathBuf,
}

impl FrameReaderConfig {
    /// Creates a new set of frame reader configuration parameters.
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        self.file_path.as_path()
    }
}

enum FrameSource {
    #[cfg(feature = "hdf5")]
    G1(g1::G1FrameFile),
    Closed,
}

/// Reader keeping a frame file open until it is closed or dropped.
pub struct FrameReader {
    config: FrameReaderConfig,
    source: FrameSource,
}

impl FrameReader {
    /// Opens the frame file given by the configuration.
    pub fn open(config: FrameReaderConfig) -> Result<Self> {
        let file_path = config.file_path();
        if !file_path.exists() {
            return Err(DgError::NotFound(file_path.to_path_buf()));
        }
        let source = match FrameFormat::from_path(file_path)? {
            #[cfg(feature = "hdf5")]
            FrameFormat::G1 => FrameSource::G1(g1::G1FrameFile::open(file_path)?),
            #[cfg(not(feature = "hdf5"))]
            FrameFormat::G1 => {
                return Err(DgError::Format(format!(
                    "Reading {} requires the hdf5 feature",
                    file_path.display()
                )))
            }
        };
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &FrameReaderConfig {
        &self.config
    }

    /// Reads the grid, field and (if present) projected data of the frame.
    pub fn read_frame(&self) -> Result<Frame<f64>> {
        info!("Reading frame from {}", self.config.file_path().display());
        match &self.source {
            #[cfg(feature = "hdf5")]
            FrameSource::G1(file) => file.read_frame(),
            FrameSource::Closed => Err(DgError::Format(format!(
                "Frame file {} is closed",
                self.config.file_path().display()
            ))),
        }
    }

    /// Closes the frame file.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        match mem::replace(&mut self.source, FrameSource::Closed) {
            #[cfg(feature = "hdf5")]
            FrameSource::G1(file) => file.close(),
            FrameSource::Closed => Ok(()),
        }
    }
}

impl Drop for FrameReader {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(
                "Could not close {}: {}",
                self.config.file_path().display(),
                err
            );
        }
    }
}

/// Reads the frame at the given path, releasing the file before returning.
pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Frame<f64>> {
    let reader = FrameReader::open(FrameReaderConfig::new(file_path))?;
    let frame = reader.read_frame()?;
    reader.close()?;
    Ok(frame)
}
