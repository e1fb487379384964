use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::config::{BrainConfig, ExecutionTier};
use crate::connectome::Connectome;
use crate::error::{BrainError, Result};
use crate::population::{
    Area, AreaId, AreaKind, LearningMode, NeuronId, PopulationRef, Stimulus, StimulusId,
};
use crate::prng::Prng;
use crate::store::ConnectomeStore;

/// Sources and target of one projection, resolved to ids.
///
/// Source lists are sorted and deduplicated: a population named twice
/// still contributes (and is strengthened) once.
#[derive(Debug, Clone)]
struct ProjectionPlan {
    target: AreaId,
    stimuli: Vec<StimulusId>,
    sources: Vec<AreaId>,
}

/// A simulated brain: populations, connectomes and the projection engine.
///
/// Populations are added one at a time; every addition eagerly wires the
/// new population to everything that already exists. Names are unique
/// across stimuli, areas and output areas.
pub struct Brain {
    cfg: BrainConfig,
    rng: Prng,

    stimuli: Vec<Stimulus>,
    areas: Vec<Area>,
    names: HashMap<String, PopulationRef>,

    store: ConnectomeStore,

    mode: LearningMode,
    rounds: u64,
}

impl Brain {
    pub fn new(cfg: BrainConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            rng: Prng::new(cfg.seed.unwrap_or(1)),
            stimuli: Vec::new(),
            areas: Vec::new(),
            names: HashMap::new(),
            store: ConnectomeStore::new(),
            mode: LearningMode::default(),
            rounds: 0,
        })
    }

    pub fn config(&self) -> &BrainConfig {
        &self.cfg
    }

    pub fn learning_mode(&self) -> LearningMode {
        self.mode
    }

    /// Set by the training pipeline before a batch of projections.
    pub fn set_learning_mode(&mut self, mode: LearningMode) {
        self.mode = mode;
    }

    pub fn set_execution_tier(&mut self, tier: ExecutionTier) {
        self.cfg.execution_tier = tier;
    }

    /// Number of completed projection rounds.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    // ---------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------

    /// Add a stimulus with `k` always-firing neurons, wired to every
    /// existing area (Bernoulli(p)) and output area (all zero).
    pub fn add_stimulus(&mut self, name: &str, k: usize) -> Result<StimulusId> {
        self.check_name_free(name)?;
        if k == 0 {
            return Err(BrainError::InvalidShape {
                name: name.to_string(),
                n: k,
                k,
            });
        }

        let id = self.stimuli.len();
        let stimulus = Stimulus {
            name: name.to_string(),
            k,
        };
        self.store
            .init_stimulus(&stimulus, &self.areas, self.cfg.p, &mut self.rng);
        for area in &mut self.areas {
            area.stimulus_beta.push(area.beta);
        }
        self.stimuli.push(stimulus);
        self.names.insert(name.to_string(), PopulationRef::Stimulus(id));

        debug!(stimulus = name, k, "added stimulus");
        Ok(id)
    }

    /// Add a regular area with `n` neurons and `k` winners per step.
    ///
    /// `beta` is the plasticity of connectomes coming INTO this area; the
    /// connectomes leaving it are governed by their targets' betas.
    pub fn add_area(&mut self, name: &str, n: usize, k: usize, beta: f32) -> Result<AreaId> {
        self.check_name_free(name)?;
        check_shape(name, n, k)?;
        check_beta(beta)?;

        let id = self.areas.len();
        let mut area = Area::new(name, n, k, beta, AreaKind::Regular);
        area.stimulus_beta = vec![beta; self.stimuli.len()];
        for (other_id, other) in self.areas.iter_mut().enumerate() {
            other.area_beta.insert(id, other.beta);
            if !other.is_output() {
                area.area_beta.insert(other_id, beta);
            }
        }
        area.area_beta.insert(id, beta);
        self.areas.push(area);

        self.store
            .init_area(id, &self.areas, &self.stimuli, self.cfg.p, &mut self.rng);
        self.names.insert(name.to_string(), PopulationRef::Area(id));

        debug!(area = name, n, k, beta, "added area");
        Ok(id)
    }

    /// Add an output area shaped by the config's `output_area_*` fields.
    /// Every existing area starts fully connected to it; stimuli start
    /// with no affinity.
    pub fn add_output_area(&mut self, name: &str) -> Result<AreaId> {
        self.check_name_free(name)?;
        let (n, k, beta) = (
            self.cfg.output_area_n,
            self.cfg.output_area_k,
            self.cfg.output_area_beta,
        );

        let id = self.areas.len();
        let mut area = Area::new(
            name,
            n,
            k,
            beta,
            AreaKind::Output {
                desired_output: Vec::new(),
            },
        );
        area.stimulus_beta = vec![beta; self.stimuli.len()];
        for (other_id, other) in self.areas.iter().enumerate() {
            if !other.is_output() {
                area.area_beta.insert(other_id, beta);
            }
        }
        self.areas.push(area);

        self.store.init_output_area(id, &self.areas, &self.stimuli);
        self.names.insert(name.to_string(), PopulationRef::Area(id));

        debug!(output_area = name, n, k, "added output area");
        Ok(id)
    }

    /// Label the output area clamps to while in [`LearningMode::Training`].
    pub fn set_desired_output(&mut self, name: &str, labels: &[NeuronId]) -> Result<()> {
        let id = self.area_id(name)?;
        let area = &mut self.areas[id];
        if !area.is_output() {
            return Err(BrainError::NotAnOutputArea(name.to_string()));
        }
        let invalid = |reason: String| BrainError::InvalidDesiredOutput {
            area: name.to_string(),
            reason,
        };

        if labels.len() > area.k {
            return Err(invalid(format!(
                "{} labels exceed k = {}",
                labels.len(),
                area.k
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= area.n) {
            return Err(invalid(format!("label {bad} out of range (n = {})", area.n)));
        }
        let mut sorted = labels.to_vec();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(invalid("labels must be distinct".to_string()));
        }

        area.kind = AreaKind::Output {
            desired_output: labels.to_vec(),
        };
        Ok(())
    }

    /// Override the plasticity of `stimulus -> target`.
    pub fn set_stimulus_beta(&mut self, target: &str, stimulus: &str, beta: f32) -> Result<()> {
        check_beta(beta)?;
        let target = self.area_id(target)?;
        let stimulus = self.stimulus_id(stimulus)?;
        self.areas[target].stimulus_beta[stimulus] = beta;
        Ok(())
    }

    /// Override the plasticity of `source -> target`.
    pub fn set_area_beta(&mut self, target: &str, source: &str, beta: f32) -> Result<()> {
        check_beta(beta)?;
        let target = self.area_id(target)?;
        let source = self.source_area_id(source)?;
        self.areas[target].area_beta.insert(source, beta);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<PopulationRef> {
        self.names.get(name).copied()
    }

    pub fn stimulus(&self, name: &str) -> Option<&Stimulus> {
        match self.lookup(name)? {
            PopulationRef::Stimulus(id) => Some(&self.stimuli[id]),
            PopulationRef::Area(_) => None,
        }
    }

    pub fn area(&self, name: &str) -> Option<&Area> {
        match self.lookup(name)? {
            PopulationRef::Area(id) => Some(&self.areas[id]),
            PopulationRef::Stimulus(_) => None,
        }
    }

    /// Stimuli in creation order.
    pub fn stimuli(&self) -> &[Stimulus] {
        &self.stimuli
    }

    /// Regular and output areas in creation order.
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn stimulus_names(&self) -> Vec<&str> {
        self.stimuli.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn winners(&self, area: &str) -> Result<&[NeuronId]> {
        Ok(self.areas[self.area_id(area)?].winners())
    }

    pub fn support(&self, area: &str) -> Result<&[bool]> {
        Ok(self.areas[self.area_id(area)?].support())
    }

    pub fn support_size(&self, area: &str) -> Result<usize> {
        Ok(self.areas[self.area_id(area)?].support_size())
    }

    pub fn connectomes(&self) -> &ConnectomeStore {
        &self.store
    }

    pub fn stimulus_connectome(&self, stimulus: &str, target: &str) -> Result<&Connectome> {
        let stimulus = self.stimulus_id(stimulus)?;
        let target = self.area_id(target)?;
        Ok(self.store.stimulus(stimulus, target))
    }

    pub fn area_connectome(&self, source: &str, target: &str) -> Result<&Connectome> {
        let source_id = self.source_area_id(source)?;
        let target = self.area_id(target)?;
        self.store
            .area(source_id, target)
            .ok_or_else(|| BrainError::OutputAreaAsSource(source.to_string()))
    }

    /// Direct write access, for seeding weights by hand.
    pub fn stimulus_connectome_mut(&mut self, stimulus: &str, target: &str) -> Result<&mut Connectome> {
        let stimulus = self.stimulus_id(stimulus)?;
        let target = self.area_id(target)?;
        Ok(self.store.stimulus_mut(stimulus, target))
    }

    pub fn area_connectome_mut(&mut self, source: &str, target: &str) -> Result<&mut Connectome> {
        let source_id = self.source_area_id(source)?;
        let target = self.area_id(target)?;
        self.store
            .area_mut(source_id, target)
            .ok_or_else(|| BrainError::OutputAreaAsSource(source.to_string()))
    }

    // ---------------------------------------------------------------------
    // Projection engine
    // ---------------------------------------------------------------------

    /// Project stimuli and area assemblies into `target` in one step.
    ///
    /// Returns the number of target neurons that won for the first time.
    /// Names are validated before anything is mutated.
    pub fn project_into(
        &mut self,
        target: &str,
        from_stimuli: &[&str],
        from_areas: &[&str],
    ) -> Result<usize> {
        let plan = self.resolve(target, from_stimuli, from_areas)?;
        let first_time = self.stage(&plan);
        self.areas[plan.target].commit();
        self.rounds += 1;
        Ok(first_time)
    }

    /// Batch entry point.
    ///
    /// Every target named on either side receives the union of the stimuli
    /// and areas that name it, in order of first appearance. Each of the
    /// configured `project_cycles` rounds reads the winners committed by
    /// the previous round; new winners are published only once every
    /// target of the round has been projected.
    ///
    /// Returns the total number of first-time winners over all rounds.
    pub fn project(
        &mut self,
        stim_to_area: &[(&str, &[&str])],
        area_to_area: &[(&str, &[&str])],
    ) -> Result<usize> {
        let mut requests: Vec<(&str, Vec<&str>, Vec<&str>)> = Vec::new();
        for &(stim, targets) in stim_to_area {
            for &t in targets {
                let i = request_index(&mut requests, t);
                requests[i].1.push(stim);
            }
        }
        for &(source, targets) in area_to_area {
            for &t in targets {
                let i = request_index(&mut requests, t);
                requests[i].2.push(source);
            }
        }

        let plans = requests
            .iter()
            .map(|(target, stims, sources)| self.resolve(target, stims, sources))
            .collect::<Result<Vec<_>>>()?;

        let mut first_time = 0;
        for _ in 0..self.cfg.project_cycles {
            for plan in &plans {
                first_time += self.stage(plan);
            }
            for plan in &plans {
                self.areas[plan.target].commit();
            }
            self.rounds += 1;
        }
        Ok(first_time)
    }

    fn resolve(&self, target: &str, from_stimuli: &[&str], from_areas: &[&str]) -> Result<ProjectionPlan> {
        let target_id = self.area_id(target)?;

        let mut stimuli = from_stimuli
            .iter()
            .map(|name| self.stimulus_id(name))
            .collect::<Result<Vec<_>>>()?;
        stimuli.sort_unstable();
        stimuli.dedup();

        let mut sources = from_areas
            .iter()
            .map(|name| self.source_area_id(name))
            .collect::<Result<Vec<_>>>()?;
        sources.sort_unstable();
        sources.dedup();

        let area = &self.areas[target_id];
        let unlabeled = matches!(area.desired_output(), Some(labels) if labels.is_empty());
        if self.mode == LearningMode::Training && unlabeled {
            return Err(BrainError::InvalidDesiredOutput {
                area: target.to_string(),
                reason: "no desired output set for training".to_string(),
            });
        }

        Ok(ProjectionPlan {
            target: target_id,
            stimuli,
            sources,
        })
    }

    /// Steps 1-4 for one target. New winners stay staged in
    /// `new_winners` until the caller commits them.
    fn stage(&mut self, plan: &ProjectionPlan) -> usize {
        let inputs = self.compute_inputs(plan);

        let mode = self.mode;
        let area = &mut self.areas[plan.target];
        area.new_winners = match &area.kind {
            AreaKind::Output { desired_output } if mode == LearningMode::Training => {
                desired_output.clone()
            }
            _ => top_k(&inputs, area.k),
        };
        let first_time = area.record_support();

        debug!(
            area = %area.name,
            first_time,
            support = area.new_support_size,
            winners = ?area.new_winners,
            "projected"
        );

        if mode != LearningMode::Testing {
            update_connectomes(
                &mut self.store,
                &self.areas,
                plan,
                self.cfg.execution_tier,
            );
        }
        first_time
    }

    /// Total synaptic input of every target neuron: firing rows of each
    /// source area plus the column sums of each stimulus connectome.
    fn compute_inputs(&self, plan: &ProjectionPlan) -> Vec<f32> {
        let target = &self.areas[plan.target];
        let mut inputs = vec![0.0f32; target.n];

        for &source in &plan.sources {
            if let Some(conn) = self.store.area(source, plan.target) {
                conn.accumulate_rows(self.areas[source].winners(), &mut inputs);
            }
        }
        for &stimulus in &plan.stimuli {
            self.store
                .stimulus(stimulus, plan.target)
                .accumulate_column_sums(&mut inputs);
        }
        inputs
    }

    // ---------------------------------------------------------------------
    // Name resolution
    // ---------------------------------------------------------------------

    fn check_name_free(&self, name: &str) -> Result<()> {
        if self.names.contains_key(name) {
            return Err(BrainError::NameConflict(name.to_string()));
        }
        Ok(())
    }

    fn stimulus_id(&self, name: &str) -> Result<StimulusId> {
        match self.lookup(name) {
            Some(PopulationRef::Stimulus(id)) => Ok(id),
            Some(PopulationRef::Area(_)) => Err(BrainError::NotAStimulus(name.to_string())),
            None => Err(BrainError::UnknownPopulation(name.to_string())),
        }
    }

    fn area_id(&self, name: &str) -> Result<AreaId> {
        match self.lookup(name) {
            Some(PopulationRef::Area(id)) => Ok(id),
            Some(PopulationRef::Stimulus(_)) => Err(BrainError::NotAnArea(name.to_string())),
            None => Err(BrainError::UnknownPopulation(name.to_string())),
        }
    }

    fn source_area_id(&self, name: &str) -> Result<AreaId> {
        let id = self.area_id(name)?;
        if self.areas[id].is_output() {
            return Err(BrainError::OutputAreaAsSource(name.to_string()));
        }
        Ok(id)
    }
}

/// Hebbian update of every connectome ending at the plan's target.
///
/// Stimulus sources strengthen all of their rows; area sources strengthen
/// the rows of their previously committed winners. Only the new winners'
/// columns change.
fn update_connectomes(
    store: &mut ConnectomeStore,
    areas: &[Area],
    plan: &ProjectionPlan,
    tier: ExecutionTier,
) {
    let target = &areas[plan.target];
    let winners = &target.new_winners;

    for &stimulus in &plan.stimuli {
        let beta = target.stimulus_beta[stimulus];
        store
            .stimulus_mut(stimulus, plan.target)
            .strengthen_all_rows(winners, 1.0 + beta, tier);
        trace!(area = %target.name, stimulus, beta, "strengthened stimulus connectome");
    }

    for &source in &plan.sources {
        let Some(beta) = target.area_beta(source) else {
            continue;
        };
        if let Some(conn) = store.area_mut(source, plan.target) {
            conn.strengthen(areas[source].winners(), winners, 1.0 + beta);
            trace!(area = %target.name, source = %areas[source].name, beta, "strengthened area connectome");
        }
    }
}

fn request_index<'a>(
    requests: &mut Vec<(&'a str, Vec<&'a str>, Vec<&'a str>)>,
    target: &'a str,
) -> usize {
    match requests.iter().position(|(t, _, _)| *t == target) {
        Some(i) => i,
        None => {
            requests.push((target, Vec::new(), Vec::new()));
            requests.len() - 1
        }
    }
}

/// Indices of the `k` largest inputs, largest first. Ties go to the
/// lower index. Returns exactly `min(k, inputs.len())` indices.
pub fn top_k(inputs: &[f32], k: usize) -> Vec<NeuronId> {
    let k = k.min(inputs.len());
    if k == 0 {
        return Vec::new();
    }
    let by_rank = |a: &NeuronId, b: &NeuronId| inputs[*b].total_cmp(&inputs[*a]).then(a.cmp(b));

    let mut idx: Vec<NeuronId> = (0..inputs.len()).collect();
    if k < idx.len() {
        idx.select_nth_unstable_by(k - 1, by_rank);
        idx.truncate(k);
    }
    idx.sort_unstable_by(by_rank);
    idx
}

fn check_shape(name: &str, n: usize, k: usize) -> Result<()> {
    if n == 0 || k == 0 || k > n {
        return Err(BrainError::InvalidShape {
            name: name.to_string(),
            n,
            k,
        });
    }
    Ok(())
}

fn check_beta(beta: f32) -> Result<()> {
    if !beta.is_finite() || beta < 0.0 {
        return Err(BrainError::InvalidBeta(beta));
    }
    Ok(())
}
