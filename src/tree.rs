//! Randomized partition trees.
//!
//! A tree is built once from a subsample by recursively cutting the current
//! point set with random hyperplanes until each part holds at most one point or
//! the depth limit is reached. Whatever split a hyperplane produces is kept,
//! including one with an empty side.

use std::fmt;

use rand::Rng;

use crate::FeatureVector;
use crate::hyperplane::{BoundingBox, Direction, Hyperplane};
use crate::node::Node;
use crate::path::{Path, walk};

/// Fixed construction settings shared by every node of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub dim: usize,
    pub extension_level: usize,
    pub depth_limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
    params: TreeParams,
    leaf_count: usize,
}

impl Tree {
    /// Build a tree over `rows`, each of length `params.dim`.
    pub fn build<R: Rng + ?Sized>(rows: &[&FeatureVector], params: TreeParams, rng: &mut R) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == params.dim));
        let mut builder = Builder {
            params,
            leaf_count: 0,
        };
        let root = builder.build_node(rows, 0, rng);
        Self {
            root,
            params,
            leaf_count: builder.leaf_count,
        }
    }

    /// Wrap a hand-built root.
    #[cfg(test)]
    pub(crate) fn from_root(root: Node, params: TreeParams) -> Self {
        fn leaves(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal { left, right, .. } => leaves(left) + leaves(right),
            }
        }
        let leaf_count = leaves(&root);
        Self {
            root,
            params,
            leaf_count,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn params(&self) -> TreeParams {
        self.params
    }

    pub fn dim(&self) -> usize {
        self.params.dim
    }

    pub fn extension_level(&self) -> usize {
        self.params.extension_level
    }

    pub fn depth_limit(&self) -> usize {
        self.params.depth_limit
    }

    /// Number of leaves produced during construction.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node_count(&self) -> usize {
        // strict binary tree
        2 * self.leaf_count - 1
    }

    /// Depth of the deepest leaf.
    pub fn max_depth(&self) -> usize {
        fn deepest(node: &Node) -> usize {
            match node {
                Node::Leaf { depth, .. } => *depth,
                Node::Internal { left, right, .. } => deepest(left).max(deepest(right)),
            }
        }
        deepest(&self.root)
    }

    /// Corrected path length of `x`.
    #[inline]
    pub fn path_length(&self, x: &FeatureVector) -> f64 {
        walk(&self.root, x, |_| {})
    }

    /// Path length of `x` along with the turns taken to reach its leaf.
    pub fn path(&self, x: &FeatureVector) -> Path {
        let mut directions = Vec::with_capacity(self.params.depth_limit);
        let length = walk(&self.root, x, |d| directions.push(d));
        Path { length, directions }
    }

    /// Turn sequence from the root to every leaf, left subtree first.
    pub fn branches(&self) -> Vec<Vec<Direction>> {
        fn collect(node: &Node, current: &mut Vec<Direction>, out: &mut Vec<Vec<Direction>>) {
            match node {
                Node::Leaf { .. } => out.push(current.clone()),
                Node::Internal { left, right, .. } => {
                    current.push(Direction::Left);
                    collect(left, current, out);
                    current.pop();
                    current.push(Direction::Right);
                    collect(right, current, out);
                    current.pop();
                }
            }
        }
        let mut out = Vec::with_capacity(self.leaf_count);
        collect(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Printable pre-order listing of every node, for debugging.
    pub fn dump(&self) -> TreeDump<'_> {
        TreeDump { tree: self }
    }
}

struct Builder {
    params: TreeParams,
    leaf_count: usize,
}

impl Builder {
    fn build_node<R: Rng + ?Sized>(&mut self, rows: &[&FeatureVector], depth: usize, rng: &mut R) -> Node {
        let count = rows.len();
        if depth >= self.params.depth_limit || count <= 1 {
            return self.leaf(depth, count);
        }
        let Some(bounds) = BoundingBox::of_rows(rows) else {
            return self.leaf(depth, count);
        };
        let split = Hyperplane::random(&bounds, self.params.extension_level, rng);

        let (left_rows, right_rows): (Vec<&FeatureVector>, Vec<&FeatureVector>) = rows
            .iter()
            .copied()
            .partition(|x| split.side(x) == Direction::Left);

        let left = Box::new(self.build_node(&left_rows, depth + 1, rng));
        let right = Box::new(self.build_node(&right_rows, depth + 1, rng));

        Node::Internal {
            depth,
            count,
            split,
            left,
            right,
        }
    }

    fn leaf(&mut self, depth: usize, count: usize) -> Node {
        self.leaf_count += 1;
        Node::Leaf { depth, count }
    }
}

/// Display adapter returned by [`Tree::dump`].
pub struct TreeDump<'a> {
    tree: &'a Tree,
}

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path = String::from("root");
        write_node(f, &self.tree.root, &mut path)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, path: &mut String) -> fmt::Result {
    writeln!(f, "==== Node ====")?;
    writeln!(f, "path : {path}")?;
    writeln!(f, "depth: {}", node.depth())?;
    writeln!(f, "count: {}", node.count())?;
    if let Some(split) = node.split() {
        writeln!(f, "n    : {:?}", split.normal())?;
        writeln!(f, "p    : {:?}", split.point())?;
    }
    writeln!(f, "kind : {}", node.kind())?;

    if let Node::Internal { left, right, .. } = node {
        let len = path.len();
        path.push(' ');
        path.push('L');
        write_node(f, left, path)?;
        path.truncate(len);
        path.push(' ');
        path.push('R');
        write_node(f, right, path)?;
        path.truncate(len);
    }
    Ok(())
}
