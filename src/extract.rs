//! Extraction of the coefficients of a single field component.

use crate::{
    basis::CoefficientLayout,
    error::{DgError, Result},
    frame::Frame,
    num::BFloat,
};
use ndarray::{prelude::*, Slice};

/// Infers the number of equations stored in the frame from the number of nodes per cell.
pub fn num_equations<F: BFloat>(frame: &Frame<F>, num_nodes: usize) -> Result<usize> {
    let num_coefficients = frame.num_coefficients_per_cell();
    if num_nodes == 0 || num_coefficients % num_nodes != 0 {
        return Err(DgError::ShapeMismatch(format!(
            "{} coefficients per cell is not a multiple of {} nodes",
            num_coefficients, num_nodes
        )));
    }
    Ok(num_coefficients / num_nodes)
}

/// Returns a view of the coefficients of one component, with shape
/// `(num_cells[0], ..., num_cells[dim - 1], num_nodes)`.
///
/// # Parameters
///
/// - `frame`: Frame holding the coefficients of all components.
/// - `component`: Index of the component to extract.
/// - `num_nodes`: Number of nodes (or modes) per cell of the basis.
/// - `num_equations`: Number of components stored in the frame.
/// - `layout`: How the components are arranged along the last axis.
pub fn extract_component<F: BFloat>(
    frame: &Frame<F>,
    component: usize,
    num_nodes: usize,
    num_equations: usize,
    layout: CoefficientLayout,
) -> Result<ArrayViewD<F>> {
    if component >= num_equations {
        return Err(DgError::ComponentRange {
            component,
            num_equations,
        });
    }
    let num_coefficients = frame.num_coefficients_per_cell();
    if num_nodes * num_equations != num_coefficients {
        return Err(DgError::ShapeMismatch(format!(
            "{} nodes for {} equations does not match {} coefficients per cell",
            num_nodes, num_equations, num_coefficients
        )));
    }

    let slice = match layout {
        CoefficientLayout::Nodal => Slice::new(component as isize, None, num_equations as isize),
        CoefficientLayout::Modal => {
            Slice::from(component * num_nodes..(component + 1) * num_nodes)
        }
    };
    Ok(frame.values().slice_axis(Axis(frame.num_dims()), slice))
}

#[cfg(test)]
mod tests {

    use super::*;

    fn frame_with_coefficients(values: ArrayD<f64>) -> Frame<f64> {
        let num_cells = values.shape()[..values.ndim() - 1].to_vec();
        let num_dims = num_cells.len();
        Frame::new(vec![0.0; num_dims], vec![1.0; num_dims], num_cells, values).unwrap()
    }

    #[test]
    fn single_equation_is_passed_through() {
        let values = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0], [7.0, 8.0]].into_dyn();
        let frame = frame_with_coefficients(values.clone());
        let extracted = extract_component(&frame, 0, 2, 1, CoefficientLayout::Nodal).unwrap();
        assert_eq!(extracted, values.view());
    }

    #[test]
    fn nodal_components_are_interleaved() {
        // Two cells, two nodes, three equations: q[c + 3n] = 10*cell + c + 0.1*n
        let values = Array::from_shape_fn((2, 6), |(cell, k)| {
            let (c, n) = (k % 3, k / 3);
            10.0 * cell as f64 + c as f64 + 0.1 * n as f64
        })
        .into_dyn();
        let frame = frame_with_coefficients(values);
        assert_eq!(num_equations(&frame, 2).unwrap(), 3);
        let extracted = extract_component(&frame, 2, 2, 3, CoefficientLayout::Nodal).unwrap();
        assert_eq!(extracted, array![[2.0, 2.1], [12.0, 12.1]].into_dyn());
    }

    #[test]
    fn modal_components_are_contiguous() {
        let values = Array::from_shape_fn((2, 3, 8), |(i, j, k)| (100 * i + 10 * j + k) as f64)
            .into_dyn();
        let frame = frame_with_coefficients(values);
        let extracted = extract_component(&frame, 1, 4, 2, CoefficientLayout::Modal).unwrap();
        assert_eq!(extracted.shape(), &[2, 3, 4]);
        assert_eq!(extracted[[1, 2, 0]], 124.0);
        assert_eq!(extracted[[0, 1, 3]], 17.0);
    }

    #[test]
    fn out_of_range_components_are_rejected() {
        let frame = frame_with_coefficients(ArrayD::zeros(IxDyn(&[3, 4])));
        assert!(matches!(
            extract_component(&frame, 2, 2, 2, CoefficientLayout::Modal),
            Err(DgError::ComponentRange {
                component: 2,
                num_equations: 2
            })
        ));
    }

    #[test]
    fn inconsistent_node_counts_are_rejected() {
        let frame = frame_with_coefficients(ArrayD::zeros(IxDyn(&[3, 5])));
        assert!(matches!(num_equations(&frame, 2), Err(DgError::ShapeMismatch(_))));
        assert!(matches!(
            extract_component(&frame, 0, 2, 2, CoefficientLayout::Nodal),
            Err(DgError::ShapeMismatch(_))
        ));
    }
}
