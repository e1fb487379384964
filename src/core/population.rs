use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a stimulus in creation order.
pub type StimulusId = usize;

/// Index of an area (regular or output) in creation order.
pub type AreaId = usize;

/// Neuron index within one population.
pub type NeuronId = usize;

/// A population name resolved against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationRef {
    Stimulus(StimulusId),
    Area(AreaId),
}

/// Fixed input population: all `k` neurons fire whenever it is active.
#[derive(Debug, Clone)]
pub struct Stimulus {
    pub name: String,
    pub k: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaKind {
    Regular,
    /// Projection-only sink. `desired_output` replaces computed winners
    /// while the brain is in [`LearningMode::Training`].
    Output { desired_output: Vec<NeuronId> },
}

/// Global switch consulted by the projection engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LearningMode {
    /// Top-k winners everywhere, plasticity on.
    #[default]
    Inference,
    /// Output areas are clamped to their desired output.
    Training,
    /// Plasticity is suppressed.
    Testing,
}

#[derive(Debug, Clone)]
pub struct Area {
    pub name: String,
    pub n: usize,
    pub k: usize,

    /// Default plasticity of connectomes coming INTO this area.
    pub beta: f32,

    // Plasticity recorded on the target side governs the connectome's updates.
    pub(crate) stimulus_beta: Vec<f32>,
    pub(crate) area_beta: HashMap<AreaId, f32>,

    pub(crate) support: Vec<bool>,
    pub(crate) support_size: usize,
    pub(crate) winners: Vec<NeuronId>,

    // Scratch state of an in-progress projection round.
    pub(crate) new_winners: Vec<NeuronId>,
    pub(crate) new_support_size: usize,

    pub(crate) kind: AreaKind,
}

impl Area {
    pub(crate) fn new(name: &str, n: usize, k: usize, beta: f32, kind: AreaKind) -> Self {
        Self {
            name: name.to_string(),
            n,
            k,
            beta,
            stimulus_beta: Vec::new(),
            area_beta: HashMap::new(),
            support: vec![false; n],
            support_size: 0,
            winners: Vec::new(),
            new_winners: Vec::new(),
            new_support_size: 0,
            kind,
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, AreaKind::Output { .. })
    }

    pub fn kind(&self) -> &AreaKind {
        &self.kind
    }

    pub fn winners(&self) -> &[NeuronId] {
        &self.winners
    }

    pub fn support(&self) -> &[bool] {
        &self.support
    }

    pub fn support_size(&self) -> usize {
        self.support_size
    }

    pub fn desired_output(&self) -> Option<&[NeuronId]> {
        match &self.kind {
            AreaKind::Output { desired_output } => Some(desired_output),
            AreaKind::Regular => None,
        }
    }

    pub fn stimulus_beta(&self, stimulus: StimulusId) -> Option<f32> {
        self.stimulus_beta.get(stimulus).copied()
    }

    pub fn area_beta(&self, source: AreaId) -> Option<f32> {
        self.area_beta.get(&source).copied()
    }

    /// Mark `new_winners` in the support bitmap; returns how many were
    /// winning for the first time.
    pub(crate) fn record_support(&mut self) -> usize {
        let mut first_time = 0;
        for &w in &self.new_winners {
            if !self.support[w] {
                self.support[w] = true;
                first_time += 1;
            }
        }
        self.new_support_size = self.support_size + first_time;
        debug_assert!(self.new_support_size <= self.n);
        first_time
    }

    /// Publish the staged winners so later projections read them.
    pub(crate) fn commit(&mut self) {
        core::mem::swap(&mut self.winners, &mut self.new_winners);
        self.new_winners.clear();
        self.support_size = self.new_support_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_counts_first_time_winners_only() {
        let mut area = Area::new("a", 5, 2, 0.1, AreaKind::Regular);

        area.new_winners = vec![1, 3];
        assert_eq!(area.record_support(), 2);
        area.commit();
        assert_eq!(area.winners(), &[1, 3]);
        assert_eq!(area.support_size(), 2);

        area.new_winners = vec![3, 4];
        assert_eq!(area.record_support(), 1);
        area.commit();
        assert_eq!(area.winners(), &[3, 4]);
        assert_eq!(area.support_size(), 3);
        assert_eq!(area.support(), &[false, true, false, true, true]);
    }

    #[test]
    fn desired_output_only_on_output_areas() {
        let regular = Area::new("a", 4, 1, 0.0, AreaKind::Regular);
        assert!(regular.desired_output().is_none());

        let out = Area::new(
            "o",
            4,
            1,
            0.0,
            AreaKind::Output {
                desired_output: vec![2],
            },
        );
        assert!(out.is_output());
        assert_eq!(out.desired_output(), Some(&[2][..]));
    }
}
