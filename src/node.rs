//! Partition tree nodes.

use crate::hyperplane::{Direction, Hyperplane};

/// One partition of a point subset.
///
/// A node is a `Leaf` when construction stopped at it, either because the
/// depth limit was reached or because at most one point arrived. Internal nodes
/// exclusively own both children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf {
        depth: usize,
        count: usize,
    },
    Internal {
        depth: usize,
        count: usize,
        split: Hyperplane,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { depth, .. } | Node::Internal { depth, .. } => *depth,
        }
    }

    /// Number of training points that reached this node.
    pub fn count(&self) -> usize {
        match self {
            Node::Leaf { count, .. } | Node::Internal { count, .. } => *count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn split(&self) -> Option<&Hyperplane> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { split, .. } => Some(split),
        }
    }

    pub fn child(&self, direction: Direction) -> Option<&Node> {
        match (self, direction) {
            (Node::Leaf { .. }, _) => None,
            (Node::Internal { left, .. }, Direction::Left) => Some(left.as_ref()),
            (Node::Internal { right, .. }, Direction::Right) => Some(right.as_ref()),
        }
    }

    pub fn kind(&self) -> &'static str {
        if self.is_leaf() { "leaf" } else { "internal" }
    }
}
