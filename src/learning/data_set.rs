use crate::learning::error::{LearningError, LearningResult};
use crate::prng::Prng;

/// One labelled example: `input` is a string of binary digits, most
/// significant bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPoint {
    pub input: String,
    pub output: u8,
}

/// Anything that can hand the learning model a list of examples.
pub trait DataSet {
    fn domain_size(&self) -> usize;
    fn data_points(&self) -> LearningResult<Vec<DataPoint>>;
}

/// Data set that enumerates every input of a binary function.
///
/// Inputs are visited in ascending numeric order. With a noise
/// probability `q`, each output is flipped with probability `q`; the noise
/// stream restarts from the same seed on every pass, so the set is
/// reusable.
pub struct CallableDataSet<F> {
    f: F,
    domain_size: usize,
    noise_probability: f64,
    seed: u64,
}

impl<F: Fn(u32) -> u32> CallableDataSet<F> {
    pub fn new(f: F, domain_size: usize) -> LearningResult<Self> {
        if domain_size == 0 || domain_size > 31 {
            return Err(LearningError::InvalidDomainSize(domain_size));
        }
        Ok(Self {
            f,
            domain_size,
            noise_probability: 0.0,
            seed: 1,
        })
    }

    pub fn with_noise(mut self, noise_probability: f64, seed: u64) -> Self {
        self.noise_probability = noise_probability.clamp(0.0, 1.0);
        self.seed = seed;
        self
    }

    pub fn iter(&self) -> DataPoints<'_, F> {
        DataPoints {
            set: self,
            next: 0,
            rng: Prng::new(self.seed),
        }
    }
}

impl<F: Fn(u32) -> u32> DataSet for CallableDataSet<F> {
    fn domain_size(&self) -> usize {
        self.domain_size
    }

    fn data_points(&self) -> LearningResult<Vec<DataPoint>> {
        self.iter().collect()
    }
}

pub struct DataPoints<'a, F> {
    set: &'a CallableDataSet<F>,
    next: u32,
    rng: Prng,
}

impl<F: Fn(u32) -> u32> Iterator for DataPoints<'_, F> {
    type Item = LearningResult<DataPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.set.domain_size;
        if u64::from(self.next) >= 1u64 << width {
            return None;
        }
        let x = self.next;
        self.next += 1;

        let value = (self.set.f)(x);
        if value > 1 {
            return Some(Err(LearningError::DataSetValue { input: x, value }));
        }
        let mut output = value as u8;
        if self.rng.bernoulli(self.set.noise_probability) {
            output ^= 1;
        }
        Some(Ok(DataPoint {
            input: format!("{x:0width$b}"),
            output,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALTERNATING: [u8; 16] = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];

    fn alternating() -> impl Fn(u32) -> u32 {
        |x| (1 + x) % 2
    }

    #[test]
    fn simple_callable_enumerates_domain() {
        let set = CallableDataSet::new(|x| 1 - x, 1).unwrap();
        let points = set.data_points().unwrap();
        assert_eq!(
            points,
            vec![
                DataPoint {
                    input: "0".to_string(),
                    output: 1
                },
                DataPoint {
                    input: "1".to_string(),
                    output: 0
                },
            ]
        );
    }

    #[test]
    fn non_boolean_value_is_an_error() {
        let set = CallableDataSet::new(|x| x + 1, 1).unwrap();
        let mut it = set.iter();
        assert_eq!(it.next().unwrap().unwrap().output, 1);
        assert_eq!(
            it.next().unwrap(),
            Err(LearningError::DataSetValue { input: 1, value: 2 })
        );
    }

    #[test]
    fn domain_of_four_bits() {
        let set = CallableDataSet::new(alternating(), 4).unwrap();
        assert_eq!(set.domain_size(), 4);
        let points = set.data_points().unwrap();
        assert_eq!(points.len(), 16);
        assert_eq!(points[5].input, "0101");
        let outputs: Vec<u8> = points.iter().map(|p| p.output).collect();
        assert_eq!(outputs, ALTERNATING);
    }

    #[test]
    fn set_is_reusable() {
        let set = CallableDataSet::new(alternating(), 4)
            .unwrap()
            .with_noise(0.5, 17);
        assert_eq!(set.data_points().unwrap(), set.data_points().unwrap());
    }

    #[test]
    fn full_noise_flips_every_output() {
        let set = CallableDataSet::new(alternating(), 4)
            .unwrap()
            .with_noise(1.0, 3);
        for (p, expected) in set.data_points().unwrap().iter().zip(ALTERNATING) {
            assert_eq!(p.output, expected ^ 1);
        }
    }

    #[test]
    fn partial_noise_flips_some_outputs() {
        let set = CallableDataSet::new(|x| x & 1, 8)
            .unwrap()
            .with_noise(0.5, 99);
        let flipped = set
            .data_points()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(x, p)| u32::from(p.output) != (*x as u32 & 1))
            .count();
        assert!(flipped > 0 && flipped < 256, "flipped = {flipped}");
    }

    #[test]
    fn rejects_unsupported_domain() {
        assert!(matches!(
            CallableDataSet::new(|x| x, 0),
            Err(LearningError::InvalidDomainSize(0))
        ));
    }
}
