use crate::error::BrainError;

pub type LearningResult<T> = core::result::Result<T, LearningError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LearningError {
    #[error("domain size mismatch: {expected_from} expects {expected}, {actual_from} has {actual}")]
    DomainSizeMismatch {
        expected_from: String,
        actual_from: String,
        expected: usize,
        actual: usize,
    },

    #[error("expected {expected} stimuli (two per input bit), brain has {actual}")]
    StimuliMismatch { expected: usize, actual: usize },

    #[error("model accuracy requested before test_model was run")]
    ModelNotTested,

    #[error("data set function returned {value} for input {input}, expected 0 or 1")]
    DataSetValue { input: u32, value: u32 },

    #[error("invalid input `{0}`: expected binary digits")]
    InvalidInput(String),

    #[error("domain size {0} is not supported (1..=31)")]
    InvalidDomainSize(usize),

    #[error("architecture references no projections")]
    EmptyArchitecture,

    #[error(transparent)]
    Brain(#[from] BrainError),
}
