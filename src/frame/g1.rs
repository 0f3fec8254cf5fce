//! Reading of frames stored in the HDF5-based G1 format.

use super::{Frame, ProjectedData};
use crate::{
    error::{DgError, Result},
    interpolation::ReconstructedField,
};
use hdf5_rs::{File, Group};
use ndarray::prelude::*;
use std::path::Path;

/// Name of the group holding the grid attributes.
pub const GRID_GROUP_NAME: &str = "StructGrid";
/// Name of the dataset holding the coefficients.
pub const FIELD_DATASET_NAME: &str = "StructGridField";
/// Name of the optional group holding the simulation time.
pub const TIME_GROUP_NAME: &str = "timeData";
/// Name of the optional group holding projected data.
pub const PROJECTION_GROUP_NAME: &str = "projection";

/// Open G1 frame file.
pub struct G1FrameFile {
    file: File,
}

impl G1FrameFile {
    /// Opens the G1 file at the given path for reading.
    pub fn open(file_path: &Path) -> Result<Self> {
        Ok(Self {
            file: File::open(file_path)?,
        })
    }

    /// Reads the grid, coefficients, time and optional projected data.
    pub fn read_frame(&self) -> Result<Frame<f64>> {
        let grid = self.require_group(GRID_GROUP_NAME)?;
        let lower_bounds = read_attribute_values::<f64>(&grid, "vsLowerBounds")?;
        let upper_bounds = read_attribute_values::<f64>(&grid, "vsUpperBounds")?;
        let num_cells = read_attribute_values::<i64>(&grid, "vsNumCells")?
            .into_iter()
            .map(|n| {
                usize::try_from(n)
                    .map_err(|_| DgError::Format(format!("Negative cell count {}", n)))
            })
            .collect::<Result<Vec<_>>>()?;

        if !self.file.link_exists(FIELD_DATASET_NAME) {
            return Err(self.missing(FIELD_DATASET_NAME));
        }
        let values = self.file.dataset(FIELD_DATASET_NAME)?.read_dyn::<f64>()?;

        let mut frame = Frame::new(lower_bounds, upper_bounds, num_cells, values)?
            .with_time(self.read_time()?.unwrap_or(0.0));

        if let Some(projection) = self.read_projection()? {
            frame = frame.with_projection(projection)?;
        }
        Ok(frame)
    }

    /// Reads the simulation time, if the file has it.
    pub fn read_time(&self) -> Result<Option<f64>> {
        if !self.file.link_exists(TIME_GROUP_NAME) {
            return Ok(None);
        }
        let group = self.file.group(TIME_GROUP_NAME)?;
        if !group.attr_names()?.iter().any(|name| name == "vsTime") {
            return Ok(None);
        }
        Ok(read_attribute_values::<f64>(&group, "vsTime")?
            .first()
            .copied())
    }

    /// Reads the projected data, if the file has it.
    pub fn read_projection(&self) -> Result<Option<ProjectedData<f64>>> {
        if !self.file.link_exists(PROJECTION_GROUP_NAME) {
            return Ok(None);
        }
        let group = self.file.group(PROJECTION_GROUP_NAME)?;
        if !group.link_exists("values") {
            return Err(DgError::Format(format!(
                "Group {} has no values dataset",
                PROJECTION_GROUP_NAME
            )));
        }
        let values = group.dataset("values")?.read_dyn::<f64>()?;
        let coords = (0..values.ndim())
            .map(|dim| {
                let name = format!("coords{}", dim);
                if !group.link_exists(&name) {
                    return Err(DgError::Format(format!(
                        "Group {} has no {} dataset",
                        PROJECTION_GROUP_NAME, name
                    )));
                }
                Ok(group.dataset(&name)?.read_1d::<f64>()?)
            })
            .collect::<Result<Vec<Array1<f64>>>>()?;
        ReconstructedField::new(coords, values)
            .map(Some)
            .map_err(|err| DgError::Format(format!("Invalid projected data: {}", err)))
    }

    /// Closes the file.
    pub fn close(self) -> Result<()> {
        self.file.close()?;
        Ok(())
    }

    fn require_group(&self, name: &str) -> Result<Group> {
        if !self.file.link_exists(name) {
            return Err(self.missing(name));
        }
        Ok(self.file.group(name)?)
    }

    fn missing(&self, name: &str) -> DgError {
        DgError::Format(format!(
            "G1 file {} has no {}",
            self.file.filename(),
            name
        ))
    }
}

fn read_attribute_values<T: hdf5_rs::H5Type>(group: &Group, name: &str) -> Result<Vec<T>> {
    if !group.attr_names()?.iter().any(|attr_name| attr_name == name) {
        return Err(DgError::Format(format!(
            "Group {} has no attribute {}",
            group.name(),
            name
        )));
    }
    Ok(group.attr(name)?.read_raw::<T>()?)
}
