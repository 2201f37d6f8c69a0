//! Extended Isolation Forest (EIF) for batch anomaly detection in Rust
//! ----------------------------------------------------------------------------
//! Points are scored by how quickly random hyperplanes separate them from the
//! rest of the data. It implements:
//!   * Randomized partition trees built over independent subsamples
//!   * Hyperplane splits whose obliqueness is set by the *extension level*
//!     (`0` = axis-aligned cuts as in classic isolation forest, `dim - 1` = fully oblique)
//!   * Path-length scoring with the `c(n)` correction for leaves cut short by the depth limit
//!   * A forest wrapper that averages path lengths and maps them into `(0, 1]`
//!
//! # Design notes
//! Tree `i` draws every random number from its own stream seeded with
//! `seed + i`, so a fixed seed reproduces the ensemble bit for bit whether the
//! trees are built one after another or on rayon's pool.
//!
//! Scores near `1` mark points that are isolated quickly (likely anomalies);
//! scores around `0.5` or below mark points that need a typical or longer
//! path to isolate.
//!
//! # Example
//! ```
//! use extended_isolation_forest::{Forest, ForestConfig};
//! use rand::{Rng, SeedableRng};
//! use rand::rngs::StdRng;
//!
//! // 500 points in a tight 2-D cluster, stored row-major
//! let mut rng = StdRng::seed_from_u64(42);
//! let data: Vec<f64> = (0..500 * 2).map(|_| rng.random_range(-1.0..1.0)).collect();
//!
//! let config = ForestConfig::new(100, 256)
//!     .with_extension_level(1)
//!     .with_seed(7);
//! let mut forest = Forest::new(config);
//! forest.fit(&data, 500, 2).unwrap();
//!
//! let scores = forest.predict(&[0.0, 0.0, 8.0, -9.0]).unwrap();
//! println!("center = {:.4}, far = {:.4}", scores[0], scores[1]);
//! assert!(scores[1] > scores[0]);
//! ```

pub mod config;
pub mod error;
pub mod forest;
pub mod hyperplane;
pub mod node;
pub mod path;
pub mod sampling;
pub mod tree;

pub use config::{ForestConfig, Parallelism, ResolvedConfig};
pub use error::{ForestError, Result};
pub use forest::Forest;
pub use hyperplane::{BoundingBox, Direction, Hyperplane};
pub use node::Node;
pub use path::{EULER_CONSTANT, Path, c_factor};
pub use tree::{Tree, TreeDump, TreeParams};

/// One data row.
pub type FeatureVector = [f64];
