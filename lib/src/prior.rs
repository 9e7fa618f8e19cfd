//! Prior specifications for monotonic terms.

use crate::error::{MonoError, Result};
use crate::simplex::Simplex;
use rand::Rng;
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};

/// Dirichlet prior on the simplex `ζ` of a term with `C` categories.
///
/// The concentration vector has length `C - 1`. All ones (the default) is
/// uniform over the simplex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirichletPrior {
    concentration: Vec<f64>,
}

impl DirichletPrior {
    /// Validate a concentration vector: non-empty, finite, strictly positive.
    pub fn new(concentration: Vec<f64>) -> Result<Self> {
        if concentration.is_empty() {
            return Err(MonoError::InvalidPrior(
                "Dirichlet concentration must not be empty".to_string(),
            ));
        }
        if let Some(c) = concentration.iter().find(|c| !c.is_finite() || **c <= 0.0) {
            return Err(MonoError::InvalidPrior(format!(
                "Dirichlet concentration must be positive and finite, got {}",
                c
            )));
        }
        Ok(Self { concentration })
    }

    /// Uniform prior for a term with `n_categories` categories.
    pub fn uniform(n_categories: usize) -> Result<Self> {
        if n_categories < 2 {
            return Err(MonoError::InvalidPrior(format!(
                "a Dirichlet prior needs at least 2 categories, got {}",
                n_categories
            )));
        }
        Ok(Self {
            concentration: vec![1.0; n_categories - 1],
        })
    }

    pub fn concentration(&self) -> &[f64] {
        &self.concentration
    }

    /// Length of the simplex this prior applies to.
    pub fn len(&self) -> usize {
        self.concentration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concentration.is_empty()
    }

    /// Check that the prior fits a term with `n_categories` categories.
    pub fn check_categories(&self, predictor: &str, n_categories: usize) -> Result<()> {
        if self.concentration.len() + 1 != n_categories {
            return Err(MonoError::InvalidPrior(format!(
                "Dirichlet prior for '{}' has length {}, expected {} for {} categories",
                predictor,
                self.concentration.len(),
                n_categories.saturating_sub(1),
                n_categories
            )));
        }
        Ok(())
    }

    /// Prior mean of `ζ`.
    pub fn mean(&self) -> Result<Simplex> {
        Simplex::normalize(self.concentration.clone())
    }

    /// Draw one `ζ` from the prior.
    ///
    /// Uses independent `Gamma(α_i, 1)` variates normalized by their sum,
    /// which also covers the one-element case.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Simplex> {
        let mut draws = Vec::with_capacity(self.concentration.len());
        for &alpha in &self.concentration {
            let gamma = Gamma::new(alpha, 1.0)
                .map_err(|e| MonoError::InvalidPrior(format!("gamma({}): {}", alpha, e)))?;
            draws.push(gamma.sample(rng));
        }
        // Tiny concentrations can underflow every draw to zero.
        if draws.iter().all(|&d| d == 0.0) {
            let max_idx = self
                .concentration
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap_or(0);
            draws[max_idx] = 1.0;
        }
        Simplex::normalize(draws)
    }
}

/// Prior on the scale `b` of a monotonic term.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ScalePrior {
    /// Improper flat prior; no statement is emitted.
    #[default]
    Flat,
    Normal {
        mean: f64,
        sd: f64,
    },
    StudentT {
        df: f64,
        location: f64,
        scale: f64,
    },
}

impl ScalePrior {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ScalePrior::Flat => Ok(()),
            ScalePrior::Normal { mean, sd } => {
                if !mean.is_finite() || !(sd > 0.0) || !sd.is_finite() {
                    return Err(MonoError::InvalidPrior(format!(
                        "normal({}, {}) needs a finite mean and positive sd",
                        mean, sd
                    )));
                }
                Ok(())
            }
            ScalePrior::StudentT {
                df,
                location,
                scale,
            } => {
                if !(df > 0.0)
                    || !df.is_finite()
                    || !location.is_finite()
                    || !(scale > 0.0)
                    || !scale.is_finite()
                {
                    return Err(MonoError::InvalidPrior(format!(
                        "student_t({}, {}, {}) needs finite positive df and scale",
                        df, location, scale
                    )));
                }
                Ok(())
            }
        }
    }

    /// Stan log-density increment for `param`, `None` for a flat prior.
    pub fn stan_statement(&self, param: &str) -> Option<String> {
        match *self {
            ScalePrior::Flat => None,
            ScalePrior::Normal { mean, sd } => Some(format!(
                "target += normal_lpdf({} | {}, {});",
                param,
                stan_real(mean),
                stan_real(sd)
            )),
            ScalePrior::StudentT {
                df,
                location,
                scale,
            } => Some(format!(
                "target += student_t_lpdf({} | {}, {}, {});",
                param,
                stan_real(df),
                stan_real(location),
                stan_real(scale)
            )),
        }
    }
}

/// Render a real literal the way Stan accepts it.
pub(crate) fn stan_real(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_uniform_prior() {
        let prior = DirichletPrior::uniform(4).unwrap();
        assert_eq!(prior.concentration(), &[1.0, 1.0, 1.0]);
        assert!(prior.check_categories("income", 4).is_ok());
        assert!(prior.check_categories("income", 5).is_err());
        assert!(DirichletPrior::uniform(1).is_err());
    }

    #[test]
    fn test_invalid_concentration() {
        assert!(DirichletPrior::new(vec![]).is_err());
        assert!(DirichletPrior::new(vec![1.0, 0.0]).is_err());
        assert!(DirichletPrior::new(vec![1.0, -2.0]).is_err());
        assert!(DirichletPrior::new(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_prior_mean() {
        let prior = DirichletPrior::new(vec![1.0, 3.0]).unwrap();
        assert_eq!(prior.mean().unwrap().as_slice(), &[0.25, 0.75]);
    }

    #[test]
    fn test_samples_are_simplexes() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for conc in [vec![1.0], vec![1.0, 1.0, 1.0], vec![0.05, 0.05], vec![10.0, 2.0, 0.5]] {
            let prior = DirichletPrior::new(conc).unwrap();
            for _ in 0..500 {
                let zeta = prior.sample(&mut rng).unwrap();
                assert_eq!(zeta.len(), prior.len());
                assert!(zeta.as_slice().iter().all(|&z| (0.0..=1.0).contains(&z)));
                let sum: f64 = zeta.as_slice().iter().sum();
                assert!((sum - 1.0).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn test_sample_mean_tracks_concentration() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let prior = DirichletPrior::new(vec![6.0, 2.0]).unwrap();
        let n = 4000;
        let mean_first: f64 = (0..n)
            .map(|_| prior.sample(&mut rng).unwrap().as_slice()[0])
            .sum::<f64>()
            / n as f64;
        assert!((mean_first - 0.75).abs() < 0.02, "mean {}", mean_first);
    }

    #[test]
    fn test_scale_prior_statements() {
        assert_eq!(ScalePrior::Flat.stan_statement("b_x"), None);
        assert_eq!(
            ScalePrior::Normal { mean: 0.0, sd: 5.0 }.stan_statement("b_x"),
            Some("target += normal_lpdf(b_x | 0.0, 5.0);".to_string())
        );
        assert_eq!(
            ScalePrior::StudentT {
                df: 3.0,
                location: 0.0,
                scale: 2.5
            }
            .stan_statement("b_x"),
            Some("target += student_t_lpdf(b_x | 3.0, 0.0, 2.5);".to_string())
        );
    }

    #[test]
    fn test_scale_prior_validation() {
        assert!(ScalePrior::Flat.validate().is_ok());
        assert!(ScalePrior::Normal { mean: 0.0, sd: 0.0 }.validate().is_err());
        assert!(ScalePrior::StudentT {
            df: -1.0,
            location: 0.0,
            scale: 1.0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_student_t_infinite_df_rejected() {
        let prior = ScalePrior::StudentT {
            df: f64::INFINITY,
            location: 0.0,
            scale: 1.0,
        };
        assert!(matches!(prior.validate(), Err(MonoError::InvalidPrior(_))));
    }
}
