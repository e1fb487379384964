use crate::brain::Brain;

/// Source side of a projection edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stimulus(String),
    Area(String),
}

impl Source {
    pub fn name(&self) -> &str {
        match self {
            Source::Stimulus(name) | Source::Area(name) => name,
        }
    }
}

/// Which populations project into which during unsupervised learning,
/// plus the area whose assembly is read out into the output area.
#[derive(Debug, Clone)]
pub struct LearningArchitecture {
    intermediate_area: String,
    edges: Vec<(Source, String)>,
}

impl LearningArchitecture {
    pub fn new(intermediate_area: &str) -> Self {
        Self {
            intermediate_area: intermediate_area.to_string(),
            edges: Vec::new(),
        }
    }

    /// Every stimulus of `brain` projects into the intermediate area, and
    /// the intermediate area projects into itself.
    pub fn fan_in(brain: &Brain, intermediate_area: &str) -> Self {
        let mut arch = Self::new(intermediate_area);
        for name in brain.stimulus_names() {
            arch = arch.stimulus_edge(name, intermediate_area);
        }
        arch.area_edge(intermediate_area, intermediate_area)
    }

    pub fn stimulus_edge(mut self, stimulus: &str, target: &str) -> Self {
        self.edges
            .push((Source::Stimulus(stimulus.to_string()), target.to_string()));
        self
    }

    pub fn area_edge(mut self, source: &str, target: &str) -> Self {
        self.edges
            .push((Source::Area(source.to_string()), target.to_string()));
        self
    }

    pub fn intermediate_area(&self) -> &str {
        &self.intermediate_area
    }

    pub fn edges(&self) -> &[(Source, String)] {
        &self.edges
    }

    /// The edge sequence repeated `cycles` times.
    pub fn run(&self, cycles: usize) -> impl Iterator<Item = &(Source, String)> + '_ {
        (0..cycles).flat_map(move |_| self.edges.iter())
    }
}
