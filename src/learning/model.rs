use tracing::{debug, info};

use crate::brain::Brain;
use crate::config::LearningConfig;
use crate::error::BrainError;
use crate::learning::architecture::{LearningArchitecture, Source};
use crate::learning::data_set::DataSet;
use crate::learning::error::{LearningError, LearningResult};
use crate::population::{LearningMode, NeuronId};

/// Name of the output area the model reads its answer from.
pub const OUTPUT_AREA: &str = "Output";

/// Binary-function approximator built from projections.
///
/// Input bit `i` activates stimulus `2i + bit`, so the brain must hold
/// exactly two stimuli per input bit (in creation order).
pub struct LearningModel {
    brain: Brain,
    stimuli: Vec<String>,
    domain_size: usize,
    architecture: LearningArchitecture,
    cfg: LearningConfig,
    accuracy: Option<f64>,
}

impl LearningModel {
    pub fn new(
        mut brain: Brain,
        domain_size: usize,
        architecture: LearningArchitecture,
        cfg: LearningConfig,
    ) -> LearningResult<Self> {
        let stimuli: Vec<String> = brain
            .stimulus_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        if stimuli.len() != domain_size * 2 {
            return Err(LearningError::StimuliMismatch {
                expected: domain_size * 2,
                actual: stimuli.len(),
            });
        }
        if architecture.edges().is_empty() {
            return Err(LearningError::EmptyArchitecture);
        }
        match brain.area(OUTPUT_AREA) {
            Some(area) if !area.is_output() => {
                return Err(BrainError::NotAnOutputArea(OUTPUT_AREA.to_string()).into());
            }
            Some(_) => {}
            None => {
                brain.add_output_area(OUTPUT_AREA)?;
            }
        }

        Ok(Self {
            brain,
            stimuli,
            domain_size,
            architecture,
            cfg,
            accuracy: None,
        })
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn into_brain(self) -> Brain {
        self.brain
    }

    /// Fraction of correct answers in the last `test_model` run.
    pub fn accuracy(&self) -> LearningResult<f64> {
        self.accuracy.ok_or(LearningError::ModelNotTested)
    }

    /// One unsupervised pass followed by a label-clamped supervised pass
    /// per data point.
    pub fn train_model(&mut self, training_set: &impl DataSet) -> LearningResult<()> {
        self.check_domain("training set", training_set.domain_size())?;

        let points = training_set.data_points()?;
        for point in &points {
            self.brain.set_learning_mode(LearningMode::Inference);
            self.run_unsupervised_projection(&point.input)?;
            self.run_supervised_projection(NeuronId::from(point.output))?;
        }
        self.brain.set_learning_mode(LearningMode::Inference);

        info!(points = points.len(), "training finished");
        Ok(())
    }

    /// Run every data point with plasticity disabled and record accuracy.
    pub fn test_model(&mut self, test_set: &impl DataSet) -> LearningResult<f64> {
        self.check_domain("test set", test_set.domain_size())?;

        let points = test_set.data_points()?;
        self.brain.set_learning_mode(LearningMode::Testing);
        let mut successful = 0usize;
        for point in &points {
            if self.run_model(&point.input)? == NeuronId::from(point.output) {
                successful += 1;
            }
        }
        self.brain.set_learning_mode(LearningMode::Inference);

        let accuracy = if points.is_empty() {
            0.0
        } else {
            (successful as f64 / points.len() as f64 * 100.0).round() / 100.0
        };
        self.accuracy = Some(accuracy);
        info!(successful, total = points.len(), accuracy, "test finished");
        Ok(accuracy)
    }

    /// Predicted label for `input` (a string of `domain_size` binary digits).
    pub fn run_model(&mut self, input: &str) -> LearningResult<NeuronId> {
        self.run_unsupervised_projection(input)?;
        let intermediate = self.architecture.intermediate_area();
        self.brain
            .project(&[], &[(intermediate, &[OUTPUT_AREA][..])])?;
        let winners = self.brain.winners(OUTPUT_AREA)?;
        // Output areas have k >= 1, so a completed projection always has a winner.
        Ok(winners.first().copied().unwrap_or_default())
    }

    fn run_unsupervised_projection(&mut self, input: &str) -> LearningResult<()> {
        let active = self.active_stimuli(input)?;
        for (source, target) in self.architecture.run(self.cfg.unsupervised_cycles) {
            match source {
                Source::Stimulus(name) => {
                    if !active.contains(name) {
                        continue;
                    }
                    self.brain
                        .project(&[(name.as_str(), &[target.as_str()][..])], &[])?;
                }
                Source::Area(name) => {
                    self.brain
                        .project(&[], &[(name.as_str(), &[target.as_str()][..])])?;
                }
            }
        }
        debug!(input, "unsupervised projection done");
        Ok(())
    }

    fn run_supervised_projection(&mut self, label: NeuronId) -> LearningResult<()> {
        self.brain.set_desired_output(OUTPUT_AREA, &[label])?;
        self.brain.set_learning_mode(LearningMode::Training);
        let intermediate = self.architecture.intermediate_area();
        for _ in 0..self.cfg.supervised_cycles {
            self.brain
                .project(&[], &[(intermediate, &[OUTPUT_AREA][..])])?;
        }
        Ok(())
    }

    /// Names of the stimuli activated by a binary input string.
    ///
    /// With stimuli `[s0, s1, s2, s3]`: "00" -> `[s0, s2]`, "01" -> `[s0, s3]`,
    /// "10" -> `[s1, s2]`, "11" -> `[s1, s3]`.
    fn active_stimuli(&self, input: &str) -> LearningResult<Vec<String>> {
        self.check_domain(input, input.len())?;
        let bits = input
            .bytes()
            .map(|b| match b {
                b'0' => Ok(0),
                b'1' => Ok(1),
                _ => Err(LearningError::InvalidInput(input.to_string())),
            })
            .collect::<LearningResult<Vec<usize>>>()?;

        Ok(self
            .stimuli
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == bits[i / 2])
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn check_domain(&self, from: &str, actual: usize) -> LearningResult<()> {
        if actual != self.domain_size {
            return Err(LearningError::DomainSizeMismatch {
                expected_from: "learning model".to_string(),
                actual_from: from.to_string(),
                expected: self.domain_size,
                actual,
            });
        }
        Ok(())
    }
}
