//! Utilities related to numbers.

use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat:
    num::Float + num::cast::FromPrimitive + ieee754::Ieee754 + fmt::Debug + Default + 'static
{
    /// Converts a double precision accumulator value into the element type.
    fn from_accum(value: f64) -> Self {
        Self::from_f64(value).expect("Conversion failed")
    }

    /// Widens the value to double precision for accumulation.
    fn to_accum(self) -> f64 {
        self.to_f64().expect("Conversion failed")
    }
}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Returns the integer `k` with `k^dim == value`, if one exists.
pub fn exact_integer_root(value: usize, dim: usize) -> Option<usize> {
    if dim == 0 {
        return None;
    }
    let guess = (value as f64).powf(1.0 / dim as f64).round() as usize;
    [guess.saturating_sub(1), guess, guess + 1]
        .into_iter()
        .find(|&root| root.checked_pow(dim as u32) == Some(value))
}
