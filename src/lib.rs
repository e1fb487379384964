//! # assemblies
//!
//! Simulation of sparse, randomly wired neuron populations that interact
//! through dense connectomes. Each projection step picks the `k` neurons
//! with the largest synaptic input in a target area and strengthens the
//! synapses that fired into them (Hebbian plasticity).
//!
//! ## Quick Start
//!
//! ```
//! use assemblies::prelude::*;
//!
//! let mut brain = Brain::new(BrainConfig::with_p(0.1).with_seed(42)).unwrap();
//! brain.add_stimulus("stim", 10).unwrap();
//! brain.add_area("A", 1000, 30, 0.05).unwrap();
//!
//! // Stimulus plus recurrent self-projection, repeated.
//! for _ in 0..20 {
//!     brain
//!         .project(&[("stim", &["A"][..])], &[("A", &["A"][..])])
//!         .unwrap();
//! }
//! assert_eq!(brain.winners("A").unwrap().len(), 30);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support
//! - `serde` (default): Serialization of configs and observer snapshots
//! - `parallel`: Row-parallel plasticity updates via rayon
//!
//! ## Modules
//!
//! - [`brain`]: Population registry and projection engine
//! - [`store`]: Connectome storage and initialization
//! - [`learning`]: Binary-function approximator built on projections
//! - [`observer`]: Read-only snapshots

#[path = "core/brain.rs"]
pub mod brain;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/connectome.rs"]
pub mod connectome;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/population.rs"]
pub mod population;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/store.rs"]
pub mod store;

pub mod learning;

pub mod observer;

/// Prelude module for convenient imports.
///
/// ```
/// use assemblies::prelude::*;
/// ```
pub mod prelude {
    pub use crate::brain::{top_k, Brain};
    pub use crate::config::{BrainConfig, ExecutionTier, LearningConfig};
    pub use crate::connectome::{Connectome, Weight};
    pub use crate::error::{BrainError, Result};
    pub use crate::population::{
        Area, AreaId, AreaKind, LearningMode, NeuronId, PopulationRef, Stimulus, StimulusId,
    };
}
