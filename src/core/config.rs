#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BrainError, Result};

/// Execution tier for connectome updates.
///
/// - `Scalar`: single-threaded (default, works everywhere)
/// - `Parallel`: row-parallel plasticity and column sums via rayon
///
/// Parallelism never spans two targets: one projection still owns its
/// target's connectomes for the whole step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutionTier {
    /// Single-threaded scalar execution.
    #[default]
    Scalar,
    /// Multi-threaded execution (requires `parallel` feature, otherwise scalar).
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrainConfig {
    /// Probability that a synapse between two regular populations exists.
    pub p: f64,

    // If set, makes connectome initialization reproducible.
    pub seed: Option<u64>,

    /// Rounds performed by one `Brain::project` call.
    pub project_cycles: usize,

    // Shape and plasticity of areas created by `add_output_area`.
    pub output_area_n: usize,
    pub output_area_k: usize,
    pub output_area_beta: f32,

    pub execution_tier: ExecutionTier,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            p: 0.1,
            seed: None,
            project_cycles: 1,
            output_area_n: 2,
            output_area_k: 1,
            output_area_beta: 0.1,
            execution_tier: ExecutionTier::Scalar,
        }
    }
}

impl BrainConfig {
    pub fn with_p(p: f64) -> Self {
        Self {
            p,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_output_area(mut self, n: usize, k: usize, beta: f32) -> Self {
        self.output_area_n = n;
        self.output_area_k = k;
        self.output_area_beta = beta;
        self
    }

    pub fn with_project_cycles(mut self, cycles: usize) -> Self {
        self.project_cycles = cycles;
        self
    }

    pub fn with_execution_tier(mut self, tier: ExecutionTier) -> Self {
        self.execution_tier = tier;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.p) {
            return Err(BrainError::InvalidProbability(self.p));
        }
        if self.project_cycles == 0 {
            return Err(BrainError::InvalidConfig(
                "project_cycles must be at least 1".to_string(),
            ));
        }
        if !self.output_area_beta.is_finite() || self.output_area_beta < 0.0 {
            return Err(BrainError::InvalidBeta(self.output_area_beta));
        }
        let (n, k) = (self.output_area_n, self.output_area_k);
        if n == 0 || k == 0 || k > n {
            return Err(BrainError::InvalidConfig(format!(
                "output area shape n = {n}, k = {k} is not valid"
            )));
        }
        Ok(())
    }
}

/// Cycle counts used by [`crate::learning::LearningModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LearningConfig {
    pub unsupervised_cycles: usize,
    pub supervised_cycles: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            unsupervised_cycles: 5,
            supervised_cycles: 3,
        }
    }
}
