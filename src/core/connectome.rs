#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ExecutionTier;
use crate::prng::Prng;

/// Type alias for synaptic weights (non-negative).
pub type Weight = f32;

/// Dense, directed weight matrix between two populations.
///
/// Row `i` holds the outgoing weights of source neuron `i`; column `j` is
/// target neuron `j`. Storage is a single row-major buffer, so the weights
/// of source neuron `i` live at `weights[i * cols..(i + 1) * cols]`.
/// The shape is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Connectome {
    rows: usize,
    cols: usize,
    weights: Vec<Weight>,
}

impl Connectome {
    pub fn filled(rows: usize, cols: usize, value: Weight) -> Self {
        Self {
            rows,
            cols,
            weights: vec![value; rows * cols],
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 1.0)
    }

    /// Each entry independently 1.0 with probability `p`, else 0.0.
    pub fn bernoulli(rows: usize, cols: usize, p: f64, rng: &mut Prng) -> Self {
        let weights = (0..rows * cols)
            .map(|_| if rng.bernoulli(p) { 1.0 } else { 0.0 })
            .collect();
        Self {
            rows,
            cols,
            weights,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Weight {
        self.weights[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, weight: Weight) {
        self.weights[row * self.cols + col] = weight;
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[Weight] {
        &self.weights[row * self.cols..(row + 1) * self.cols]
    }

    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Add the given rows into `acc` (length `cols`).
    pub fn accumulate_rows(&self, rows: &[usize], acc: &mut [f32]) {
        debug_assert_eq!(acc.len(), self.cols);
        for &r in rows {
            for (a, w) in acc.iter_mut().zip(self.row(r)) {
                *a += *w;
            }
        }
    }

    /// Add every row into `acc`, i.e. the column sums of the matrix.
    pub fn accumulate_column_sums(&self, acc: &mut [f32]) {
        debug_assert_eq!(acc.len(), self.cols);
        if self.cols == 0 {
            return;
        }
        for row in self.weights.chunks_exact(self.cols) {
            for (a, w) in acc.iter_mut().zip(row) {
                *a += *w;
            }
        }
    }

    /// Multiply `(r, c)` by `factor` for `r` in `rows`, `c` in `cols`.
    ///
    /// `rows` and `cols` must not contain duplicates, otherwise an entry
    /// would be scaled twice.
    pub fn strengthen(&mut self, rows: &[usize], cols: &[usize], factor: Weight) {
        let width = self.cols;
        for &r in rows {
            let row = &mut self.weights[r * width..(r + 1) * width];
            for &c in cols {
                row[c] *= factor;
            }
        }
    }

    /// Multiply `(r, c)` by `factor` for every row `r` and each `c` in `cols`.
    pub fn strengthen_all_rows(&mut self, cols: &[usize], factor: Weight, tier: ExecutionTier) {
        if self.cols == 0 {
            return;
        }
        match tier {
            ExecutionTier::Scalar => self.strengthen_all_rows_scalar(cols, factor),
            ExecutionTier::Parallel => self.strengthen_all_rows_parallel(cols, factor),
        }
    }

    fn strengthen_all_rows_scalar(&mut self, cols: &[usize], factor: Weight) {
        for row in self.weights.chunks_exact_mut(self.cols) {
            for &c in cols {
                row[c] *= factor;
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn strengthen_all_rows_parallel(&mut self, cols: &[usize], factor: Weight) {
        self.weights.par_chunks_exact_mut(self.cols).for_each(|row| {
            for &c in cols {
                row[c] *= factor;
            }
        });
    }

    #[cfg(not(feature = "parallel"))]
    fn strengthen_all_rows_parallel(&mut self, cols: &[usize], factor: Weight) {
        self.strengthen_all_rows_scalar(cols, factor);
    }
}
