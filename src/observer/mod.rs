#[cfg(feature = "serde")]
use serde::Serialize;

use crate::brain::Brain;
use crate::population::{Area, LearningMode, NeuronId};

/// A read-only snapshot of a brain's populations.
///
/// Design intent:
/// - Observers cannot mutate or steer the brain.
/// - Snapshotting is *on-demand* and allocates; projection stays unchanged.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BrainSnapshot {
    pub rounds: u64,
    pub learning_mode: LearningMode,
    pub connectome_count: usize,

    pub stimuli: Vec<StimulusSnapshot>,
    pub areas: Vec<AreaSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StimulusSnapshot {
    pub name: String,
    pub k: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AreaSnapshot {
    pub name: String,
    pub output: bool,
    pub n: usize,
    pub k: usize,
    pub beta: f32,
    pub winners: Vec<NeuronId>,
    pub support_size: usize,
}

impl From<&Area> for AreaSnapshot {
    fn from(area: &Area) -> Self {
        Self {
            name: area.name.clone(),
            output: area.is_output(),
            n: area.n,
            k: area.k,
            beta: area.beta,
            winners: area.winners().to_vec(),
            support_size: area.support_size(),
        }
    }
}

pub struct BrainAdapter<'a> {
    brain: &'a Brain,
}

impl<'a> BrainAdapter<'a> {
    pub fn new(brain: &'a Brain) -> Self {
        Self { brain }
    }

    pub fn snapshot(&self) -> BrainSnapshot {
        BrainSnapshot {
            rounds: self.brain.rounds(),
            learning_mode: self.brain.learning_mode(),
            connectome_count: self.brain.connectomes().len(),
            stimuli: self
                .brain
                .stimuli()
                .iter()
                .map(|s| StimulusSnapshot {
                    name: s.name.clone(),
                    k: s.k,
                })
                .collect(),
            areas: self.brain.areas().iter().map(AreaSnapshot::from).collect(),
        }
    }

    /// Snapshot of a single area, if `name` is one.
    pub fn area(&self, name: &str) -> Option<AreaSnapshot> {
        self.brain.area(name).map(AreaSnapshot::from)
    }
}
