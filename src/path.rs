//! Path lengths and the average-path-length correction `c(n)`.

use crate::FeatureVector;
use crate::hyperplane::Direction;
use crate::node::Node;

/// Euler–Mascheroni constant, to the precision the scoring formula has always used.
pub const EULER_CONSTANT: f64 = 0.5772156649;

/// Average path length of an unsuccessful search in a binary search tree of
/// `n` points: `2 (ln(n - 1) + γ) - 2 (n - 1) / n`.
///
/// Defined as `0.0` for `n <= 1`, where no further split is possible.
pub fn c_factor(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER_CONSTANT) - 2.0 * (n - 1.0) / n
}

/// Route taken by one point through one tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Internal nodes crossed plus the `c(count)` correction of the leaf reached.
    pub length: f64,
    pub directions: Vec<Direction>,
}

/// Walk from `root` to a leaf, reporting each turn to `on_step`.
///
/// Returns the corrected path length. Both the allocation-free scorer and
/// [`Path`] recording go through here so they cannot disagree.
pub(crate) fn walk<F>(root: &Node, x: &FeatureVector, mut on_step: F) -> f64
where
    F: FnMut(Direction),
{
    let mut e = 0.0;
    let mut node = root;
    loop {
        match node {
            Node::Leaf { count, .. } => {
                return if *count <= 1 { e } else { e + c_factor(*count) };
            }
            Node::Internal {
                split, left, right, ..
            } => {
                e += 1.0;
                let direction = split.side(x);
                on_step(direction);
                node = match direction {
                    Direction::Left => &**left,
                    Direction::Right => &**right,
                };
            }
        }
    }
}
