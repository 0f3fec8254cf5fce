#![allow(dead_code)]

use dgpost::{
    basis::{lobatto, BasisFamily, BasisSpec},
    frame::Frame,
    store::{ContainerFormat, TransformMatrixStore, TransformMatrixStoreConfig},
};
use ndarray::prelude::*;
use ndarray_npy::NpzWriter;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

#[macro_export]
macro_rules! assert_all_close {
    ($actual:expr, $expected:expr) => {
        for (&actual, &expected) in $actual.iter().zip($expected.iter()) {
            approx::assert_abs_diff_eq!(actual, expected, epsilon = 1e-12);
        }
    };
}

pub fn assert_file_exists<P: AsRef<Path>>(file_path: P) {
    let file_path = file_path.as_ref();
    assert!(
        file_path.exists(),
        "File {} does not exist",
        file_path.to_string_lossy()
    );
}

/// Routes log events to the test output. Safe to call from every test.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Scratch resource root for a single test, removed when dropped.
#[derive(Debug)]
pub struct Test {
    dir: TempDir,
}

impl Test {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        init_logging();
        let dir = tempfile::Builder::new()
            .prefix(name.as_ref())
            .tempdir()
            .unwrap_or_else(|err| {
                panic!(
                    "Error: Could not create directory for test {}: {}",
                    name.as_ref(),
                    err
                )
            });
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.root().join(file_name.as_ref())
    }

    /// Writes an `.npz` container for the given family with the given named arrays.
    pub fn write_npz_container(
        &self,
        family: BasisFamily,
        matrices: &[(String, Array2<f64>)],
        vectors: &[(String, Array1<f64>)],
    ) -> PathBuf {
        let path = self.output_path(format!("xform_{}.npz", family.label()));
        let mut writer = NpzWriter::new(File::create(&path).unwrap());
        for (name, matrix) in matrices {
            writer.add_array(name.as_str(), matrix).unwrap();
        }
        for (name, vector) in vectors {
            writer.add_array(name.as_str(), vector).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    /// Writes a Lobatto container with the generated tables for the given bases.
    pub fn write_lobatto_container(&self, bases: &[(usize, usize)]) -> PathBuf {
        let mut matrices = Vec::new();
        let mut vectors = Vec::new();
        for &(dim, poly_order) in bases {
            let basis = BasisSpec::new(BasisFamily::Lobatto, dim, poly_order).unwrap();
            matrices.push((
                basis.matrix_key(),
                lobatto::transform_matrix(dim, poly_order).unwrap(),
            ));
            vectors.push((
                basis.weights_key(),
                lobatto::weights(dim, poly_order).unwrap(),
            ));
        }
        self.write_npz_container(BasisFamily::Lobatto, &matrices, &vectors)
    }

    pub fn npz_store(&self) -> TransformMatrixStore {
        TransformMatrixStore::new(TransformMatrixStoreConfig::new(
            self.root(),
            ContainerFormat::Npz,
        ))
    }
}

/// Frame on the unit interval whose nodal values at the cell edges sample `f`.
pub fn lobatto_order_1_frame<Func>(num_cells: usize, f: Func) -> Frame<f64>
where
    Func: Fn(f64) -> f64,
{
    let dx = 1.0 / num_cells as f64;
    let values = Array2::from_shape_fn((num_cells, 2), |(cell, node)| {
        f(dx * (cell + node) as f64)
    })
    .into_dyn();
    Frame::new(vec![0.0], vec![1.0], vec![num_cells], values).unwrap()
}

/// Frame on the unit square whose nodal values at the cell corners sample `f`.
pub fn lobatto_order_1_frame_2d<Func>(num_cells: [usize; 2], f: Func) -> Frame<f64>
where
    Func: Fn(f64, f64) -> f64,
{
    let dx = 1.0 / num_cells[0] as f64;
    let dy = 1.0 / num_cells[1] as f64;
    let values = Array3::from_shape_fn((num_cells[0], num_cells[1], 4), |(i, j, node)| {
        let (nx, ny) = (node % 2, node / 2);
        f(dx * (i + nx) as f64, dy * (j + ny) as f64)
    })
    .into_dyn();
    Frame::new(vec![0.0, 0.0], vec![1.0, 1.0], num_cells.to_vec(), values).unwrap()
}
