//! Binary-function learning on top of the projection engine.
//!
//! The model here only sequences `Brain` operations: unsupervised
//! projections driven by the input bits, then supervised projections into
//! the output area with the label clamped.

mod architecture;
mod data_set;
mod error;
mod model;

pub use architecture::{LearningArchitecture, Source};
pub use data_set::{CallableDataSet, DataPoint, DataPoints, DataSet};
pub use error::{LearningError, LearningResult};
pub use model::{LearningModel, OUTPUT_AREA};
