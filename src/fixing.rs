//! Reduction of the dimensionality of sampled fields by fixing coordinate axes.

use crate::{
    error::{DgError, Result},
    num::BFloat,
};
use lazy_static::lazy_static;
use ndarray::{prelude::*, Slice};
use regex::Regex;
use std::str::FromStr;

/// Largest number of axes that can be given a fix.
pub const MAX_FIXED_AXES: usize = 6;

/// How to select along a single coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisFix {
    /// Select the plane with the given index and drop the axis.
    Index(usize),
    /// Select the plane whose coordinate is closest to the given value and drop the axis.
    Value(f64),
    /// Keep the half-open index range `[start, end)`, along with the axis.
    Range {
        start: Option<usize>,
        end: Option<usize>,
    },
}

lazy_static! {
    static ref INDEX_REGEX: Regex = Regex::new(r"^\s*([0-9]+)\s*$").unwrap();
    static ref RANGE_REGEX: Regex = Regex::new(r"^\s*([0-9]*)\s*:\s*([0-9]*)\s*$").unwrap();
    static ref VALUE_REGEX: Regex =
        Regex::new(r"^\s*([-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?)\s*$").unwrap();
}

impl FromStr for AxisFix {
    type Err = DgError;

    /// Parses `"3"` as an index, `"0.25"` or `"-1e-3"` as a coordinate value
    /// and `"a:b"`, `":b"` or `"a:"` as an index range.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DgError::InvalidAxisFix(s.to_string());
        if let Some(caps) = INDEX_REGEX.captures(s) {
            return caps[1].parse().map(AxisFix::Index).map_err(|_| invalid());
        }
        if let Some(caps) = RANGE_REGEX.captures(s) {
            let parse_bound = |bound: &str| -> Result<Option<usize>> {
                if bound.is_empty() {
                    Ok(None)
                } else {
                    bound.parse().map(Some).map_err(|_| invalid())
                }
            };
            return Ok(AxisFix::Range {
                start: parse_bound(&caps[1])?,
                end: parse_bound(&caps[2])?,
            });
        }
        if let Some(caps) = VALUE_REGEX.captures(s) {
            return caps[1].parse().map(AxisFix::Value).map_err(|_| invalid());
        }
        Err(invalid())
    }
}

impl AxisFix {
    /// Whether applying this fix removes the axis.
    pub fn drops_axis(&self) -> bool {
        !matches!(self, Self::Range { .. })
    }
}

/// Fixes the given axes of a sampled field and returns the remaining
/// coordinates and values.
///
/// Entry `i` of `fixes` applies to axis `i`. The axes are processed from the
/// highest index to the lowest, so that dropping an axis never shifts an axis
/// that is yet to be fixed. Entries beyond the rank of the data have no effect.
pub fn fix_axes<F: BFloat>(
    coords: &[Array1<f64>],
    values: ArrayViewD<F>,
    fixes: &[Option<AxisFix>],
) -> Result<(Vec<Array1<f64>>, ArrayD<F>)> {
    if fixes.len() > MAX_FIXED_AXES {
        return Err(DgError::ShapeMismatch(format!(
            "Got fixes for {} axes, at most {} are supported",
            fixes.len(),
            MAX_FIXED_AXES
        )));
    }
    check_coords_match_shape(coords, values.shape())?;
    let rank = values.ndim();
    let mut coords = coords.to_vec();
    let mut values = values;

    for (axis, fix) in fixes.iter().enumerate().take(rank).rev() {
        let fix = match fix {
            Some(fix) => fix,
            None => continue,
        };
        let len = values.len_of(Axis(axis));
        match *fix {
            AxisFix::Index(index) => {
                check_index(axis, index, len)?;
                values = values.index_axis_move(Axis(axis), index);
                coords.remove(axis);
            }
            AxisFix::Value(value) => {
                let index = nearest_index(&coords[axis], value).ok_or(DgError::AxisIndex {
                    axis,
                    index: 0,
                    len,
                })?;
                values = values.index_axis_move(Axis(axis), index);
                coords.remove(axis);
            }
            AxisFix::Range { start, end } => {
                let start = start.unwrap_or(0);
                let end = end.unwrap_or(len);
                check_index(axis, end.saturating_sub(1), len)?;
                if start >= end {
                    return Err(DgError::AxisIndex {
                        axis,
                        index: start,
                        len,
                    });
                }
                values = values.slice_axis_move(Axis(axis), Slice::from(start..end));
                coords[axis] = coords[axis].slice(s![start..end]).to_owned();
            }
        }
    }
    Ok((coords, values.to_owned()))
}

/// Fails unless there is one coordinate array per axis, with the length of that axis.
pub(crate) fn check_coords_match_shape(coords: &[Array1<f64>], shape: &[usize]) -> Result<()> {
    if coords.len() != shape.len()
        || coords
            .iter()
            .zip(shape)
            .any(|(coord, &len)| coord.len() != len)
    {
        return Err(DgError::ShapeMismatch(format!(
            "Coordinate lengths {:?} do not match value shape {:?}",
            coords.iter().map(Array1::len).collect::<Vec<_>>(),
            shape
        )));
    }
    Ok(())
}

fn check_index(axis: usize, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(DgError::AxisIndex { axis, index, len })
    }
}

/// Finds the index of the coordinate closest to the given value.
fn nearest_index(coords: &Array1<f64>, value: f64) -> Option<usize> {
    coords
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {

    use super::*;

    fn grid_5x5() -> (Vec<Array1<f64>>, ArrayD<f64>) {
        let x = Array::linspace(0.1, 0.9, 5);
        let y = Array::linspace(-2.0, 2.0, 5);
        let values = Array::from_shape_fn((5, 5), |(i, j)| (10 * i + j) as f64).into_dyn();
        (vec![x, y], values)
    }

    #[test]
    fn fixing_first_axis_leaves_second_axis() {
        let (coords, values) = grid_5x5();
        let (fixed_coords, fixed_values) =
            fix_axes(&coords, values.view(), &[Some(AxisFix::Index(2)), None]).unwrap();
        assert_eq!(fixed_values.shape(), &[5]);
        assert_eq!(fixed_coords, vec![coords[1].clone()]);
        assert_eq!(
            fixed_values,
            array![20.0, 21.0, 22.0, 23.0, 24.0].into_dyn()
        );
    }

    #[test]
    fn fixing_both_axes_gives_a_scalar() {
        let (coords, values) = grid_5x5();
        let (fixed_coords, fixed_values) = fix_axes(
            &coords,
            values.view(),
            &[Some(AxisFix::Index(1)), Some(AxisFix::Index(4))],
        )
        .unwrap();
        assert!(fixed_coords.is_empty());
        assert_eq!(fixed_values.ndim(), 0);
        assert_eq!(fixed_values.iter().copied().collect::<Vec<_>>(), vec![14.0]);
    }

    #[test]
    fn nearest_coordinate_is_selected_for_values() {
        let (coords, values) = grid_5x5();
        let (fixed_coords, fixed_values) =
            fix_axes(&coords, values.view(), &[None, Some(AxisFix::Value(0.8))]).unwrap();
        assert_eq!(fixed_coords, vec![coords[0].clone()]);
        assert_eq!(fixed_values, array![3.0, 13.0, 23.0, 33.0, 43.0].into_dyn());
    }

    #[test]
    fn ranges_keep_the_axis() {
        let (coords, values) = grid_5x5();
        let (fixed_coords, fixed_values) = fix_axes(
            &coords,
            values.view(),
            &[
                Some(AxisFix::Range {
                    start: Some(1),
                    end: Some(3),
                }),
                Some(AxisFix::Range {
                    start: None,
                    end: Some(2),
                }),
            ],
        )
        .unwrap();
        assert_eq!(fixed_values, array![[10.0, 11.0], [20.0, 21.0]].into_dyn());
        assert_eq!(fixed_coords[0], coords[0].slice(s![1..3]).to_owned());
        assert_eq!(fixed_coords[1], array![-2.0, -1.0]);
    }

    #[test]
    fn fixes_beyond_rank_are_ignored() {
        let (coords, values) = grid_5x5();
        let (fixed_coords, fixed_values) = fix_axes(
            &coords,
            values.view(),
            &[None, None, Some(AxisFix::Index(7)), None, None, Some(AxisFix::Index(0))],
        )
        .unwrap();
        assert_eq!(fixed_coords, coords);
        assert_eq!(fixed_values, values);
    }

    #[test]
    fn out_of_bounds_indices_are_rejected() {
        let (coords, values) = grid_5x5();
        assert!(matches!(
            fix_axes(&coords, values.view(), &[None, Some(AxisFix::Index(5))]),
            Err(DgError::AxisIndex {
                axis: 1,
                index: 5,
                len: 5
            })
        ));
        assert!(matches!(
            fix_axes(
                &coords,
                values.view(),
                &[Some(AxisFix::Range {
                    start: Some(3),
                    end: Some(3)
                })]
            ),
            Err(DgError::AxisIndex { axis: 0, .. })
        ));
    }

    #[test]
    fn coordinates_must_match_axis_lengths() {
        let coords = [Array::linspace(0.0, 1.0, 10)];
        let values = ArrayD::<f64>::zeros(IxDyn(&[5]));
        assert!(matches!(
            fix_axes(&coords, values.view(), &[Some(AxisFix::Value(0.95))]),
            Err(DgError::ShapeMismatch(_))
        ));
        let (coords, values) = grid_5x5();
        assert!(matches!(
            fix_axes(&coords[..1], values.view(), &[None]),
            Err(DgError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn axis_fixes_are_parsed() {
        assert_eq!("3".parse::<AxisFix>().unwrap(), AxisFix::Index(3));
        assert_eq!("0.25".parse::<AxisFix>().unwrap(), AxisFix::Value(0.25));
        assert_eq!("-1e-3".parse::<AxisFix>().unwrap(), AxisFix::Value(-1e-3));
        assert_eq!(
            "2:4".parse::<AxisFix>().unwrap(),
            AxisFix::Range {
                start: Some(2),
                end: Some(4)
            }
        );
        assert_eq!(
            ":4".parse::<AxisFix>().unwrap(),
            AxisFix::Range {
                start: None,
                end: Some(4)
            }
        );
        assert_eq!(
            "2:".parse::<AxisFix>().unwrap(),
            AxisFix::Range {
                start: Some(2),
                end: None
            }
        );
        assert!(!AxisFix::Range {
            start: None,
            end: None
        }
        .drops_axis());
        for invalid in ["", "x", "1:2:3", "nan", "1.2.3"] {
            assert!(matches!(
                invalid.parse::<AxisFix>(),
                Err(DgError::InvalidAxisFix(_))
            ));
        }
    }
}
