//! Random splitting hyperplanes.
//!
//! A hyperplane is defined by a point it passes through and a normal vector.
//! The extension level controls how many coordinates of the normal vector are
//! allowed to be non-zero: `0` gives axis-aligned cuts, `dim - 1` gives fully
//! oblique ones.

use std::fmt;

use rand::Rng;

use crate::FeatureVector;
use crate::sampling::{sample_without_replacement, standard_normal, uniform};

/// Side of a hyperplane a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("L"),
            Direction::Right => f.write_str("R"),
        }
    }
}

/// Per-dimension `(min, max)` over a set of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub mins: Vec<f64>,
    pub maxs: Vec<f64>,
}

impl BoundingBox {
    /// Bounds of `rows`. Returns `None` for an empty set.
    pub fn of_rows(rows: &[&FeatureVector]) -> Option<Self> {
        let (first, rest) = rows.split_first()?;
        let mut mins = first.to_vec();
        let mut maxs = first.to_vec();
        for row in rest {
            for (i, &v) in row.iter().enumerate() {
                if v < mins[i] {
                    mins[i] = v;
                }
                if v > maxs[i] {
                    maxs[i] = v;
                }
            }
        }
        Some(Self { mins, maxs })
    }

    pub fn dim(&self) -> usize {
        self.mins.len()
    }
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hyperplane {
    point: Vec<f64>,
    normal: Vec<f64>,
    // point . normal, fixed once the plane is drawn
    offset: f64,
}

impl Hyperplane {
    pub fn new(point: Vec<f64>, normal: Vec<f64>) -> Self {
        assert_eq!(point.len(), normal.len());
        let offset = dot(&point, &normal);
        Self {
            point,
            normal,
            offset,
        }
    }

    /// Draw a random hyperplane inside `bounds`.
    ///
    /// The split point is uniform inside the box. The normal vector has
    /// standard-normal coordinates, then `dim - extension_level - 1` of them
    /// (chosen without replacement) are zeroed. Draw order is split point
    /// first, normal vector second, zeroed indices last.
    pub fn random<R: Rng + ?Sized>(bounds: &BoundingBox, extension_level: usize, rng: &mut R) -> Self {
        let dim = bounds.dim();
        assert!(
            extension_level < dim,
            "extension level {extension_level} out of range for {dim} dimensions"
        );

        let point: Vec<f64> = bounds
            .mins
            .iter()
            .zip(&bounds.maxs)
            .map(|(&lo, &hi)| uniform(lo, hi, rng))
            .collect();

        let mut normal: Vec<f64> = (0..dim).map(|_| standard_normal(rng)).collect();
        let n_zero = dim - extension_level - 1;
        if n_zero > 0 {
            for idx in sample_without_replacement(n_zero, dim, rng) {
                normal[idx - 1] = 0.0;
            }
        }

        Self::new(point, normal)
    }

    /// Strictly below the plane goes left; on or above goes right.
    #[inline]
    pub fn side(&self, x: &FeatureVector) -> Direction {
        if dot(x, &self.normal) < self.offset {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn normal(&self) -> &[f64] {
        &self.normal
    }

    pub fn dim(&self) -> usize {
        self.normal.len()
    }
}
