use crate::connectome::Connectome;
use crate::population::{Area, AreaId, Stimulus, StimulusId};
use crate::prng::Prng;

/// Owner of every connectome in a brain, indexed by population ids.
///
/// Matrices are materialized eagerly when a population is created and are
/// never resized afterwards. Output areas are sinks: they have incoming
/// connectomes only.
#[derive(Debug, Clone, Default)]
pub struct ConnectomeStore {
    // [stimulus][target area]
    from_stimuli: Vec<Vec<Connectome>>,
    // [source area][target area]; every entry of an output area's row is None.
    from_areas: Vec<Vec<Option<Connectome>>>,
}

impl ConnectomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stimulus(&self, stimulus: StimulusId, target: AreaId) -> &Connectome {
        &self.from_stimuli[stimulus][target]
    }

    pub(crate) fn stimulus_mut(&mut self, stimulus: StimulusId, target: AreaId) -> &mut Connectome {
        &mut self.from_stimuli[stimulus][target]
    }

    pub fn area(&self, source: AreaId, target: AreaId) -> Option<&Connectome> {
        self.from_areas[source][target].as_ref()
    }

    pub(crate) fn area_mut(&mut self, source: AreaId, target: AreaId) -> Option<&mut Connectome> {
        self.from_areas[source][target].as_mut()
    }

    /// Number of materialized matrices.
    pub fn len(&self) -> usize {
        let stim: usize = self.from_stimuli.iter().map(Vec::len).sum();
        let area: usize = self
            .from_areas
            .iter()
            .map(|row| row.iter().filter(|c| c.is_some()).count())
            .sum();
        stim + area
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Outgoing connectomes of a new stimulus into every existing area.
    pub(crate) fn init_stimulus(&mut self, stimulus: &Stimulus, areas: &[Area], p: f64, rng: &mut Prng) {
        let row = areas
            .iter()
            .map(|area| {
                if area.is_output() {
                    Connectome::zeros(stimulus.k, area.n)
                } else {
                    Connectome::bernoulli(stimulus.k, area.n, p, rng)
                }
            })
            .collect();
        self.from_stimuli.push(row);
    }

    /// Connectomes linking the regular area `new` (already the last entry of
    /// `areas`) with every existing population, in both directions.
    pub(crate) fn init_area(
        &mut self,
        new: AreaId,
        areas: &[Area],
        stimuli: &[Stimulus],
        p: f64,
        rng: &mut Prng,
    ) {
        debug_assert_eq!(new + 1, areas.len());
        debug_assert_eq!(self.from_areas.len(), new);
        let area = &areas[new];

        for (row, stimulus) in self.from_stimuli.iter_mut().zip(stimuli) {
            row.push(Connectome::bernoulli(stimulus.k, area.n, p, rng));
        }

        let mut new_row = Vec::with_capacity(areas.len());
        for (other_id, other) in areas.iter().enumerate() {
            if other.is_output() {
                new_row.push(Some(Connectome::ones(area.n, other.n)));
                self.from_areas[other_id].push(None);
                continue;
            }
            new_row.push(Some(Connectome::bernoulli(area.n, other.n, p, rng)));
            if other_id != new {
                self.from_areas[other_id].push(Some(Connectome::bernoulli(other.n, area.n, p, rng)));
            }
        }
        self.from_areas.push(new_row);
    }

    /// Incoming connectomes of the output area `new` (already the last entry
    /// of `areas`): all-zero from stimuli, all-one from regular areas.
    pub(crate) fn init_output_area(&mut self, new: AreaId, areas: &[Area], stimuli: &[Stimulus]) {
        debug_assert_eq!(new + 1, areas.len());
        debug_assert_eq!(self.from_areas.len(), new);
        let area = &areas[new];

        for (row, stimulus) in self.from_stimuli.iter_mut().zip(stimuli) {
            row.push(Connectome::zeros(stimulus.k, area.n));
        }

        for (other_id, row) in self.from_areas.iter_mut().enumerate() {
            let other = &areas[other_id];
            if other.is_output() {
                row.push(None);
            } else {
                row.push(Some(Connectome::ones(other.n, area.n)));
            }
        }
        self.from_areas.push(vec![None; areas.len()]);
    }
}
