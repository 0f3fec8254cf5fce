//! Descriptors for the DG basis families and the table of supported bases.

pub mod lobatto;

use crate::error::{DgError, Result};
use std::{fmt, str::FromStr};

/// Largest number of spatial dimensions any basis is tabulated for.
pub const MAX_BASIS_DIM: usize = 5;

/// Largest polynomial order any basis is tabulated for.
pub const MAX_POLY_ORDER: usize = 4;

/// Number of modes of the serendipity basis, indexed by `[dim - 1][poly_order - 1]`.
const SERENDIPITY_NUM_NODES: [[usize; MAX_POLY_ORDER]; MAX_BASIS_DIM] = [
    [2, 3, 4, 5],
    [4, 8, 12, 17],
    [8, 20, 32, 50],
    [16, 48, 80, 136],
    [32, 112, 192, 352],
];

/// Number of modes of the maximal-order basis, indexed by `[dim - 1][poly_order - 1]`.
const MAXIMAL_ORDER_NUM_NODES: [[usize; MAX_POLY_ORDER]; MAX_BASIS_DIM] = [
    [2, 3, 4, 5],
    [3, 6, 10, 15],
    [4, 10, 20, 35],
    [5, 15, 35, 70],
    [6, 21, 56, 126],
];

/// Largest dimensionality with tabulated Lobatto transform matrices.
pub const MAX_LOBATTO_DIM: usize = 2;

/// Family of polynomial basis used to expand the field in each cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasisFamily {
    Lobatto,
    SerendipityNodal,
    SerendipityModal,
    MaximalOrderModal,
}

/// How the coefficients of the different equations are arranged along the last axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoefficientLayout {
    /// Node `n` of component `c` is found at `c + n*num_equations`.
    Nodal,
    /// The modes of component `c` occupy `c*num_nodes..(c + 1)*num_nodes`.
    Modal,
}

impl BasisFamily {
    /// Creates an array for iterating over all the basis families.
    pub fn all() -> [Self; 4] {
        [
            Self::Lobatto,
            Self::SerendipityNodal,
            Self::SerendipityModal,
            Self::MaximalOrderModal,
        ]
    }

    /// Resolves a (case-insensitive) family label.
    pub fn from_label(label: &str) -> Result<Self> {
        match label.trim().to_lowercase().as_str() {
            "lobatto" => Ok(Self::Lobatto),
            "serendipity-nodal" | "nodal-serendipity" | "ns" => Ok(Self::SerendipityNodal),
            "serendipity" | "serendipity-modal" | "ms" => Ok(Self::SerendipityModal),
            "maximal-order" | "maximal-order-modal" | "mo" => Ok(Self::MaximalOrderModal),
            _ => Err(DgError::UnknownFamily(label.to_string())),
        }
    }

    /// Returns the canonical label of the family, also used to name its matrix container.
    pub fn label(self) -> &'static str {
        match self {
            Self::Lobatto => "lobatto",
            Self::SerendipityNodal => "serendipity-nodal",
            Self::SerendipityModal => "serendipity",
            Self::MaximalOrderModal => "maximal-order",
        }
    }

    /// Returns the layout of the coefficients stored for this family.
    pub fn layout(self) -> CoefficientLayout {
        match self {
            Self::Lobatto | Self::SerendipityNodal => CoefficientLayout::Nodal,
            Self::SerendipityModal | Self::MaximalOrderModal => CoefficientLayout::Modal,
        }
    }

    /// Looks up the number of nodes (or modes) per cell, if the combination is supported.
    pub fn num_nodes(self, dim: usize, poly_order: usize) -> Option<usize> {
        if !(1..=MAX_BASIS_DIM).contains(&dim) || !(1..=MAX_POLY_ORDER).contains(&poly_order) {
            return None;
        }
        match self {
            Self::Lobatto => {
                if dim <= MAX_LOBATTO_DIM {
                    Some((poly_order + 1).pow(dim as u32))
                } else {
                    None
                }
            }
            Self::SerendipityNodal | Self::SerendipityModal => {
                Some(SERENDIPITY_NUM_NODES[dim - 1][poly_order - 1])
            }
            Self::MaximalOrderModal => Some(MAXIMAL_ORDER_NUM_NODES[dim - 1][poly_order - 1]),
        }
    }
}

impl fmt::Display for BasisFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BasisFamily {
    type Err = DgError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

/// A validated combination of basis family, dimensionality and polynomial order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BasisSpec {
    family: BasisFamily,
    dim: usize,
    poly_order: usize,
    num_nodes: usize,
}

impl BasisSpec {
    /// Creates a new basis specification, failing if the combination is not in the support table.
    pub fn new(family: BasisFamily, dim: usize, poly_order: usize) -> Result<Self> {
        let num_nodes =
            family
                .num_nodes(dim, poly_order)
                .ok_or_else(|| DgError::UnsupportedBasis {
                    family: family.label().to_string(),
                    dim,
                    poly_order,
                })?;
        Ok(Self {
            family,
            dim,
            poly_order,
            num_nodes,
        })
    }

    /// Creates a new basis specification from a family label.
    pub fn from_label(label: &str, dim: usize, poly_order: usize) -> Result<Self> {
        Self::new(BasisFamily::from_label(label)?, dim, poly_order)
    }

    pub fn family(&self) -> BasisFamily {
        self.family
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    /// Returns the number of nodes (or modes) per cell.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn layout(&self) -> CoefficientLayout {
        self.family.layout()
    }

    /// Returns the name of the transform matrix for this basis in the family's container.
    pub fn matrix_key(&self) -> String {
        format!("xformMatrix{}{}", self.dim, self.poly_order)
    }

    /// Returns the name of the quadrature weight vector for this basis in the family's container.
    pub fn weights_key(&self) -> String {
        format!("cWeight_i{}", self.num_nodes)
    }

    /// Returns the error describing this basis as unsupported for some operation.
    pub fn unsupported(&self) -> DgError {
        DgError::UnsupportedBasis {
            family: self.family.label().to_string(),
            dim: self.dim,
            poly_order: self.poly_order,
        }
    }
}

impl fmt::Display for BasisSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}D, order {})",
            self.family, self.dim, self.poly_order
        )
    }
}
