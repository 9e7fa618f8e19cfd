//! Simplex parameters and the cumulative monotonic effect.
//!
//! A monotonic term with `C` categories is parameterized by a scale `b` and
//! a simplex `ζ` of length `C - 1`. The contribution of rank `x` is
//!
//! ```text
//! b * (ζ_1 + ... + ζ_min(x, C-1))
//! ```
//!
//! Partial sums of non-negative weights never decrease, so the contribution
//! moves in the direction of `b` only.

use crate::error::{MonoError, Result};
use serde::{Deserialize, Serialize};

/// Default tolerance for the unit-sum check.
pub const SIMPLEX_TOLERANCE: f64 = 1e-8;

/// Unit-sum tolerance for simplex draws read back from CmdStan CSV, which
/// keeps six significant digits per value.
pub const DRAW_TOLERANCE: f64 = 1e-5;

/// A vector of non-negative weights summing to one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Simplex {
    weights: Vec<f64>,
}

impl Simplex {
    /// Validate `weights` with the default tolerance.
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        Self::with_tolerance(weights, SIMPLEX_TOLERANCE)
    }

    /// Validate `weights`: non-empty, every element finite and in `[0, 1]`,
    /// sum within `tolerance` of one.
    pub fn with_tolerance(weights: Vec<f64>, tolerance: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(MonoError::InvalidSimplex(
                "a simplex needs at least one element".to_string(),
            ));
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0 || **w > 1.0)
        {
            return Err(MonoError::InvalidSimplex(format!(
                "element {} is {}, outside [0, 1]",
                i + 1,
                w
            )));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > tolerance {
            return Err(MonoError::InvalidSimplex(format!(
                "elements sum to {}, expected 1",
                sum
            )));
        }
        Ok(Self { weights })
    }

    /// Uniform simplex of length `len`.
    pub fn uniform(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(MonoError::InvalidSimplex(
                "a simplex needs at least one element".to_string(),
            ));
        }
        Ok(Self {
            weights: vec![1.0 / len as f64; len],
        })
    }

    /// Normalize non-negative weights onto the simplex.
    pub fn normalize(weights: Vec<f64>) -> Result<Self> {
        let sum: f64 = weights.iter().sum();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || !(sum > 0.0) {
            return Err(MonoError::InvalidSimplex(
                "cannot normalize: weights must be finite, non-negative and not all zero"
                    .to_string(),
            ));
        }
        Ok(Self {
            weights: weights.into_iter().map(|w| w / sum).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.weights
    }

    /// Sum of the first `k` weights; `k` is capped at the length.
    pub fn partial_sum(&self, k: usize) -> f64 {
        self.weights.iter().take(k).sum()
    }

    /// Running sums `[ζ_1, ζ_1 + ζ_2, ..., 1]`.
    pub fn cumulative(&self) -> Vec<f64> {
        self.weights
            .iter()
            .scan(0.0, |acc, w| {
                *acc += w;
                Some(*acc)
            })
            .collect()
    }
}

/// One `(b, ζ)` pair, e.g. a single posterior draw of a monotonic term.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonotonicEffect {
    b: f64,
    zeta: Simplex,
}

impl MonotonicEffect {
    pub fn new(b: f64, zeta: Simplex) -> Result<Self> {
        if !b.is_finite() {
            return Err(MonoError::InvalidParameter(format!(
                "scale b must be finite, got {}",
                b
            )));
        }
        Ok(Self { b, zeta })
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn zeta(&self) -> &Simplex {
        &self.zeta
    }

    /// Category count `C = len(ζ) + 1`.
    pub fn n_categories(&self) -> usize {
        self.zeta.len() + 1
    }

    /// Contribution of `rank` to the linear predictor.
    ///
    /// # Errors
    /// Fails when `rank` is outside `[1, C]`.
    ///
    /// # Example
    /// ```
    /// use mono_effects::simplex::{MonotonicEffect, Simplex};
    ///
    /// let zeta = Simplex::new(vec![0.7, 0.2, 0.1]).unwrap();
    /// let effect = MonotonicEffect::new(10.0, zeta).unwrap();
    /// assert!((effect.contribution(2).unwrap() - 9.0).abs() < 1e-12);
    /// ```
    pub fn contribution(&self, rank: usize) -> Result<f64> {
        if rank == 0 || rank > self.n_categories() {
            return Err(MonoError::InvalidParameter(format!(
                "rank {} outside [1, {}]",
                rank,
                self.n_categories()
            )));
        }
        Ok(mo(self.b, &self.zeta, rank))
    }

    /// Contributions for a sequence of ranks.
    pub fn contributions(&self, ranks: &[usize]) -> Result<Vec<f64>> {
        ranks.iter().map(|&r| self.contribution(r)).collect()
    }
}

/// Unchecked contribution `b * Σ_{i <= min(rank, len)} ζ_i`.
#[inline]
pub fn mo(b: f64, zeta: &Simplex, rank: usize) -> f64 {
    b * zeta.partial_sum(rank.min(zeta.len()))
}
