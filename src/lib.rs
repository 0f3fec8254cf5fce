//! The `dgpost` crate reconstructs and integrates discontinuous Galerkin simulation output.
pub mod basis;
pub mod error;
pub mod extract;
pub mod fixing;
pub mod frame;
pub mod integration;
pub mod interpolation;
pub mod num;
pub mod projector;
pub mod store;

pub use error::{DgError, Result};
pub use projector::DgProjector;
