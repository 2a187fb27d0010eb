//! Random forest regressor.
//!
//! Averages [`RegressionTree`]s, each grown on its own bootstrap resample.
//! Tree `t` draws its resample from a ChaCha8 stream keyed by `(seed, t)`,
//! so a forest is identical whether its trees are grown sequentially or on
//! the rayon pool.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PriceModel;
use crate::error::{ModelError, Result};
use crate::linear::check_shape;
use crate::tree::{Presorted, RegressionTree, TreeParams};

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub tree: TreeParams,
    /// Resample rows with replacement per tree.
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            tree: TreeParams::default(),
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestParams {
    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.tree.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Fitted forest.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn from_trees(trees: Vec<RegressionTree>, n_features: usize) -> Result<Self> {
        if trees.is_empty() {
            return Err(ModelError::InvalidArtifact("random forest has no trees".into()));
        }
        Ok(Self { trees, n_features })
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Fit on rows `x` and targets `y`.
    ///
    /// # Errors
    /// Empty, ragged or non-finite input, or zero trees.
    pub fn fit<R: AsRef<[f64]> + Sync>(
        x: &[R],
        y: &[f64],
        params: &ForestParams,
        force_sequential: bool,
    ) -> Result<Self> {
        let n_features = check_shape(x, y)?;
        if params.n_trees == 0 {
            return Err(ModelError::config("n_trees", "must be at least 1"));
        }
        if let Some(i) = x
            .iter()
            .zip(y)
            .position(|(row, t)| !t.is_finite() || row.as_ref().iter().any(|v| !v.is_finite()))
        {
            return Err(ModelError::Shape(format!("row {i} has a non-finite value")));
        }

        let data = Presorted::new(x, y, n_features);
        let trees = parallel::map_indices(
            params.n_trees,
            |t| {
                let weights = resample(x.len(), t, params);
                RegressionTree::grow(&data, &weights, &params.tree)
            },
            force_sequential,
        );

        debug!(
            trees = trees.len(),
            rows = x.len(),
            leaves = trees.iter().map(RegressionTree::n_leaves).sum::<usize>(),
            "random forest grown"
        );
        Ok(Self { trees, n_features })
    }
}

/// Per-row draw counts for tree `t`.
fn resample(n: usize, t: usize, params: &ForestParams) -> Vec<u32> {
    if !params.bootstrap {
        return vec![1; n];
    }
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    rng.set_stream(t as u64);
    let mut weights = vec![0u32; n];
    for _ in 0..n {
        weights[rng.random_range(0..n)] += 1;
    }
    weights
}

impl PriceModel for RandomForestRegressor {
    /// Mean of the tree predictions.
    fn predict(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        total / self.trees.len() as f64
    }

    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
