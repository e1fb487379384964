//! Error taxonomy for brain construction and projection.

/// Result type for brain operations.
pub type Result<T> = core::result::Result<T, BrainError>;

/// Errors reported synchronously by [`crate::brain::Brain`].
///
/// Every failing call leaves the brain exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BrainError {
    #[error("population name `{0}` is already in use")]
    NameConflict(String),

    #[error("unknown population `{0}`")]
    UnknownPopulation(String),

    #[error("`{0}` is a stimulus, expected an area")]
    NotAnArea(String),

    #[error("`{0}` is not a stimulus")]
    NotAStimulus(String),

    #[error("output area `{0}` cannot be used as a projection source")]
    OutputAreaAsSource(String),

    #[error("`{0}` is not an output area")]
    NotAnOutputArea(String),

    #[error("invalid shape for `{name}`: n = {n}, k = {k}")]
    InvalidShape { name: String, n: usize, k: usize },

    #[error("sparsity probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("plasticity coefficient must be finite and non-negative, got {0}")]
    InvalidBeta(f32),

    #[error("invalid desired output for `{area}`: {reason}")]
    InvalidDesiredOutput { area: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
