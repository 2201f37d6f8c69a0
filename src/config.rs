//! Forest configuration and its eager validation.
//!
//! [`ForestConfig`] is what callers fill in. [`ForestConfig::validate`] checks it
//! against the shape of the training data and resolves every optional value
//! (depth limit, seed, normalization constant) exactly once, producing a
//! [`ResolvedConfig`] that tree construction reads without further checks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ForestError, Result};
use crate::path::c_factor;

/// Whether trees are built and points scored on rayon's pool.
///
/// Results are bit-identical either way; each tree draws from its own stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parallelism {
    Sequential,
    #[default]
    Parallel,
}

impl Parallelism {
    #[inline]
    pub fn allows_parallel(self) -> bool {
        matches!(self, Self::Parallel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ForestConfig {
    /// Number of trees in the ensemble.
    pub ntrees: usize,
    /// Rows drawn (without replacement) to build each tree.
    pub sample_size: usize,
    /// Maximum tree depth. `None` or `Some(0)` uses `ceil(log2(sample_size))`.
    pub depth_limit: Option<usize>,
    /// Number of normal-vector coordinates allowed to be non-zero, minus one.
    pub extension_level: usize,
    /// Base seed; tree `i` draws from a stream seeded with `seed + i`.
    /// `None` picks a fresh seed from the OS-seeded thread generator on every fit.
    pub seed: Option<u64>,
    pub parallelism: Parallelism,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            ntrees: 100,
            sample_size: 256,
            depth_limit: None,
            extension_level: 0,
            seed: None,
            parallelism: Parallelism::default(),
        }
    }
}

impl ForestConfig {
    pub fn new(ntrees: usize, sample_size: usize) -> Self {
        Self {
            ntrees,
            sample_size,
            ..Self::default()
        }
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = Some(depth_limit);
        self
    }

    pub fn with_extension_level(mut self, extension_level: usize) -> Self {
        self.extension_level = extension_level;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Depth limit used when none is given: `ceil(log2(sample_size))`.
    pub fn default_depth_limit(sample_size: usize) -> usize {
        if sample_size <= 1 {
            0
        } else {
            (sample_size as f64).log2().ceil() as usize
        }
    }

    /// Check this configuration against `nobjs` rows of `dim` values and
    /// resolve the optional settings.
    pub fn validate(&self, nobjs: usize, dim: usize) -> Result<ResolvedConfig> {
        if self.ntrees == 0 {
            return Err(ForestError::InvalidTreeCount);
        }
        if dim == 0 {
            return Err(ForestError::ZeroDimensions);
        }
        if self.sample_size < 1 || self.sample_size > nobjs {
            return Err(ForestError::InvalidSampleSize {
                sample_size: self.sample_size,
                nobjs,
            });
        }
        if self.extension_level > dim - 1 {
            return Err(ForestError::InvalidExtensionLevel {
                extension_level: self.extension_level,
                dim,
            });
        }

        let depth_limit = match self.depth_limit {
            Some(limit) if limit > 0 => limit,
            _ => Self::default_depth_limit(self.sample_size),
        };
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(ResolvedConfig {
            ntrees: self.ntrees,
            sample_size: self.sample_size,
            depth_limit,
            extension_level: self.extension_level,
            seed,
            parallelism: self.parallelism,
            dim,
            nobjs,
            normalization_constant: c_factor(self.sample_size),
        })
    }
}

/// A [`ForestConfig`] checked against concrete data, with nothing left optional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    pub ntrees: usize,
    pub sample_size: usize,
    pub depth_limit: usize,
    pub extension_level: usize,
    pub seed: u64,
    pub parallelism: Parallelism,
    pub dim: usize,
    pub nobjs: usize,
    /// `c(sample_size)`.
    pub normalization_constant: f64,
}

impl ResolvedConfig {
    /// Seed of the stream tree `index` is built from.
    #[inline]
    pub fn tree_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_depth_limit_is_ceil_log2() {
        assert_eq!(ForestConfig::default_depth_limit(1), 0);
        assert_eq!(ForestConfig::default_depth_limit(2), 1);
        assert_eq!(ForestConfig::default_depth_limit(50), 6);
        assert_eq!(ForestConfig::default_depth_limit(64), 6);
        assert_eq!(ForestConfig::default_depth_limit(100), 7);
        assert_eq!(ForestConfig::default_depth_limit(256), 8);
    }

    #[test]
    fn resolves_optional_settings() {
        let cfg = ForestConfig::new(10, 64).with_seed(7);
        let resolved = cfg.validate(100, 3).unwrap();
        assert_eq!(resolved.depth_limit, 6);
        assert_eq!(resolved.seed, 7);
        assert_eq!(resolved.tree_seed(3), 10);
        assert_abs_diff_eq!(resolved.normalization_constant, c_factor(64));

        let resolved = cfg.clone().with_depth_limit(0).validate(100, 3).unwrap();
        assert_eq!(resolved.depth_limit, 6);
        let resolved = cfg.with_depth_limit(3).validate(100, 3).unwrap();
        assert_eq!(resolved.depth_limit, 3);
    }

    #[test]
    fn tree_seed_wraps() {
        let resolved = ForestConfig::new(2, 1)
            .with_seed(u64::MAX)
            .validate(1, 1)
            .unwrap();
        assert_eq!(resolved.tree_seed(1), 0);
    }

    #[test]
    fn rejects_bad_sample_size() {
        let err = ForestConfig::new(10, 0).validate(5, 2).unwrap_err();
        assert_eq!(
            err,
            ForestError::InvalidSampleSize {
                sample_size: 0,
                nobjs: 5
            }
        );
        let err = ForestConfig::new(10, 6).validate(5, 2).unwrap_err();
        assert!(matches!(err, ForestError::InvalidSampleSize { sample_size: 6, .. }));
    }

    #[test]
    fn rejects_bad_extension_level() {
        let err = ForestConfig::new(10, 5)
            .with_extension_level(2)
            .validate(5, 2)
            .unwrap_err();
        assert_eq!(
            err,
            ForestError::InvalidExtensionLevel {
                extension_level: 2,
                dim: 2
            }
        );
        assert!(
            ForestConfig::new(10, 5)
                .with_extension_level(1)
                .validate(5, 2)
                .is_ok()
        );
    }

    #[test]
    fn rejects_degenerate_shapes() {
        assert_eq!(
            ForestConfig::new(0, 5).validate(5, 2).unwrap_err(),
            ForestError::InvalidTreeCount
        );
        assert_eq!(
            ForestConfig::new(3, 5).validate(5, 0).unwrap_err(),
            ForestError::ZeroDimensions
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_partial_json() {
        let cfg: ForestConfig =
            serde_json::from_str(r#"{"ntrees": 12, "extension_level": 1, "seed": 3}"#).unwrap();
        assert_eq!(cfg.ntrees, 12);
        assert_eq!(cfg.sample_size, 256);
        assert_eq!(cfg.extension_level, 1);
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.parallelism, Parallelism::Parallel);
    }
}
