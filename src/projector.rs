//! Projection of DG frames onto refined uniform meshes.

use crate::{
    basis::BasisSpec,
    error::{DgError, Result},
    extract,
    fixing::AxisFix,
    frame::{self, Frame},
    integration,
    interpolation::{self, ReconstructedField},
    num::BFloat,
    store::{CachedTransformMatrixStore, TransformMatrixStore},
};
use std::path::Path;
use tracing::debug;

/// Reconstructs and integrates the components of a single frame.
#[derive(Debug)]
pub struct DgProjector<F> {
    frame: Frame<F>,
    basis: BasisSpec,
    num_equations: usize,
    store: CachedTransformMatrixStore,
}

impl<F: BFloat> DgProjector<F> {
    /// Creates a new projector for the given frame, expanded in the given basis.
    ///
    /// Fails if the frame and basis have different dimensionality, or if the
    /// number of coefficients per cell is not a multiple of the number of
    /// nodes of the basis.
    pub fn new(frame: Frame<F>, basis: BasisSpec, store: TransformMatrixStore) -> Result<Self> {
        if frame.num_dims() != basis.dim() {
            return Err(DgError::ShapeMismatch(format!(
                "Frame has {} dimensions but the basis {} has {}",
                frame.num_dims(),
                basis,
                basis.dim()
            )));
        }
        let num_equations = extract::num_equations(&frame, basis.num_nodes())?;
        Ok(Self {
            frame,
            basis,
            num_equations,
            store: store.into(),
        })
    }

    /// Returns a reference to the frame.
    pub fn frame(&self) -> &Frame<F> {
        &self.frame
    }

    /// Returns the basis the frame is expanded in.
    pub fn basis(&self) -> &BasisSpec {
        &self.basis
    }

    /// Returns the number of components stored in the frame.
    pub fn num_equations(&self) -> usize {
        self.num_equations
    }

    /// Reconstructs the given component on the refined mesh.
    ///
    /// Frames that carry projected data return that for component 0.
    pub fn project(&mut self, component: usize) -> Result<ReconstructedField<F>> {
        if component == 0 {
            if let Some(projection) = self.frame.projection() {
                debug!("Using projected data stored in frame");
                return Ok(projection.clone());
            }
        }
        let coefficients = extract::extract_component(
            &self.frame,
            component,
            self.basis.num_nodes(),
            self.num_equations,
            self.basis.layout(),
        )?;
        let matrix = self.store.matrix(&self.basis)?;
        interpolation::interpolate_on_mesh(
            matrix,
            coefficients,
            &self.frame.all_cell_centers(),
            &self.frame.cell_extents(),
        )
    }

    /// Integrates the given component over the whole grid.
    pub fn integrate(&mut self, component: usize) -> Result<f64> {
        let coefficients = extract::extract_component(
            &self.frame,
            component,
            self.basis.num_nodes(),
            self.num_equations,
            self.basis.layout(),
        )?;
        let weights = self.store.weights(&self.basis)?;
        integration::integrate(weights, coefficients, &self.frame.cell_extents())
    }

    /// Returns a lower-dimensional version of a reconstructed field.
    pub fn fix_axes(
        &self,
        field: &ReconstructedField<F>,
        fixes: &[Option<AxisFix>],
    ) -> Result<ReconstructedField<F>> {
        field.fix_axes(fixes)
    }

    /// Consumes the projector and returns the frame.
    pub fn into_frame(self) -> Frame<F> {
        self.frame
    }
}

impl DgProjector<f64> {
    /// Loads the frame at the given path and creates a projector for it.
    pub fn open<P: AsRef<Path>>(
        frame_path: P,
        basis: BasisSpec,
        store: TransformMatrixStore,
    ) -> Result<Self> {
        Self::new(frame::load(frame_path)?, basis, store)
    }
}
