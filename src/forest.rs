//! The tree ensemble: fitting, scoring and per-tree diagnostics.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::FeatureVector;
use crate::config::{ForestConfig, ResolvedConfig};
use crate::error::{ForestError, Result};
use crate::sampling::sample_without_replacement;
use crate::tree::{Tree, TreeDump, TreeParams};

/// Extended isolation forest.
///
/// Data is exchanged as row-major `f64` buffers: `nobjs` rows of `dim` values
/// for training, any whole number of `dim`-value rows for scoring.
#[derive(Debug, Clone)]
pub struct Forest {
    config: ForestConfig,
    fitted: Option<Fitted>,
}

#[derive(Debug, Clone)]
struct Fitted {
    resolved: ResolvedConfig,
    trees: Vec<Tree>,
}

impl Fitted {
    fn average_path_length(&self, x: &FeatureVector) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.path_length(x)).sum();
        total / self.trees.len() as f64
    }

    fn score_row(&self, x: &FeatureVector) -> f64 {
        let c = self.resolved.normalization_constant;
        if c <= 0.0 {
            // single-row subsamples never split, every path length is zero
            return 1.0;
        }
        2.0_f64.powf(-self.average_path_length(x) / c)
    }

    fn rows_in(&self, queries: &[f64]) -> Result<usize> {
        let dim = self.resolved.dim;
        if queries.len() % dim != 0 {
            return Err(ForestError::QueryShape {
                len: queries.len(),
                dim,
            });
        }
        Ok(queries.len() / dim)
    }
}

impl Forest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Build the ensemble from `nobjs` rows of `dim` values in `data`.
    ///
    /// Everything is validated before the first tree is built. On error the
    /// forest keeps whatever ensemble it held before the call; on success the
    /// previous ensemble, if any, is replaced as a whole.
    pub fn fit(&mut self, data: &[f64], nobjs: usize, dim: usize) -> Result<()> {
        if nobjs.checked_mul(dim) != Some(data.len()) {
            return Err(ForestError::DataShape {
                len: data.len(),
                nobjs,
                dim,
            });
        }
        let resolved = self.config.validate(nobjs, dim).inspect_err(|err| {
            debug!(%err, nobjs, dim, "rejected forest configuration");
        })?;
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(ForestError::NonFiniteInput { index });
        }

        debug!(
            ntrees = resolved.ntrees,
            sample_size = resolved.sample_size,
            depth_limit = resolved.depth_limit,
            extension_level = resolved.extension_level,
            seed = resolved.seed,
            nobjs,
            dim,
            "fitting forest"
        );

        let params = TreeParams {
            dim,
            extension_level: resolved.extension_level,
            depth_limit: resolved.depth_limit,
        };
        let build = |i: usize| -> Tree {
            let seed = resolved.tree_seed(i);
            let mut rng = StdRng::seed_from_u64(seed);
            let rows: Vec<&FeatureVector> =
                sample_without_replacement(resolved.sample_size, nobjs, &mut rng)
                    .into_iter()
                    .map(|j| &data[(j - 1) * dim..j * dim])
                    .collect();
            let tree = Tree::build(&rows, params, &mut rng);
            trace!(tree = i, seed, leaves = tree.leaf_count(), "built tree");
            tree
        };

        let trees: Vec<Tree> = if resolved.parallelism.allows_parallel() {
            (0..resolved.ntrees).into_par_iter().map(build).collect()
        } else {
            (0..resolved.ntrees).map(build).collect()
        };

        debug!(
            leaves = trees.iter().map(Tree::leaf_count).sum::<usize>(),
            "forest fitted"
        );
        self.fitted = Some(Fitted { resolved, trees });
        Ok(())
    }

    /// Fit on `data`, then score the same rows.
    pub fn fit_predict(&mut self, data: &[f64], nobjs: usize, dim: usize) -> Result<Vec<f64>> {
        self.fit(data, nobjs, dim)?;
        self.predict(data)
    }

    /// Anomaly score in `(0, 1]` for every row of `queries`.
    pub fn predict(&self, queries: &[f64]) -> Result<Vec<f64>> {
        let fitted = self.fitted()?;
        let mut scores = vec![0.0; fitted.rows_in(queries)?];
        self.predict_into(queries, &mut scores)?;
        Ok(scores)
    }

    /// Like [`predict`](Self::predict), writing into `out`, which must hold one
    /// slot per query row.
    pub fn predict_into(&self, queries: &[f64], out: &mut [f64]) -> Result<()> {
        let fitted = self.fitted()?;
        let size = fitted.rows_in(queries)?;
        if out.len() != size {
            return Err(ForestError::OutputShape {
                got: out.len(),
                expected: size,
            });
        }
        let dim = fitted.resolved.dim;
        if fitted.resolved.parallelism.allows_parallel() {
            queries
                .par_chunks_exact(dim)
                .zip(out.par_iter_mut())
                .for_each(|(x, s)| *s = fitted.score_row(x));
        } else {
            for (x, s) in queries.chunks_exact(dim).zip(out.iter_mut()) {
                *s = fitted.score_row(x);
            }
        }
        Ok(())
    }

    /// Anomaly score of a single row.
    pub fn score(&self, x: &FeatureVector) -> Result<f64> {
        let fitted = self.fitted()?;
        if x.len() != fitted.resolved.dim {
            return Err(ForestError::QueryShape {
                len: x.len(),
                dim: fitted.resolved.dim,
            });
        }
        Ok(fitted.score_row(x))
    }

    /// Raw path length of every row of `queries` in tree `tree_index`, with no
    /// averaging and no score transform.
    pub fn predict_single_tree(&self, queries: &[f64], tree_index: usize) -> Result<Vec<f64>> {
        let fitted = self.fitted()?;
        fitted.rows_in(queries)?;
        let tree = self.tree(tree_index)?;
        Ok(queries
            .chunks_exact(fitted.resolved.dim)
            .map(|x| tree.path_length(x))
            .collect())
    }

    pub fn tree(&self, index: usize) -> Result<&Tree> {
        let trees = self.trees()?;
        trees.get(index).ok_or(ForestError::TreeIndexOutOfRange {
            index,
            ntrees: trees.len(),
        })
    }

    pub fn trees(&self) -> Result<&[Tree]> {
        Ok(&self.fitted()?.trees)
    }

    /// Node-by-node listing of tree `index`.
    pub fn dump_tree(&self, index: usize) -> Result<TreeDump<'_>> {
        Ok(self.tree(index)?.dump())
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Settings the current ensemble was built with.
    pub fn resolved(&self) -> Option<&ResolvedConfig> {
        self.fitted.as_ref().map(|f| &f.resolved)
    }

    pub fn ntrees(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.trees.len())
    }

    pub fn dim(&self) -> Option<usize> {
        self.resolved().map(|r| r.dim)
    }

    pub fn depth_limit(&self) -> Option<usize> {
        self.resolved().map(|r| r.depth_limit)
    }

    pub fn extension_level(&self) -> Option<usize> {
        self.resolved().map(|r| r.extension_level)
    }

    /// Base seed of the current ensemble, useful when it was drawn at random.
    pub fn seed(&self) -> Option<u64> {
        self.resolved().map(|r| r.seed)
    }

    pub fn normalization_constant(&self) -> Option<f64> {
        self.resolved().map(|r| r.normalization_constant)
    }

    fn fitted(&self) -> Result<&Fitted> {
        self.fitted.as_ref().ok_or(ForestError::NotFitted)
    }
}
