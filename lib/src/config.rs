//! Model-level configuration.
//!
//! ```ignore
//! let config = ModelConfig::default()
//!     .with_family(Family::Poisson)
//!     .with_interval(0.9);
//!
//! // or from a file
//! let config = ModelConfig::from_json_file("model.json")?;
//! ```

use crate::error::{MonoError, Result};
use crate::simplex::DRAW_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Response distribution and link of the generated model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Normal response, identity link.
    #[default]
    Gaussian,
    /// 0/1 response, logit link.
    Bernoulli,
    /// Count response, log link.
    Poisson,
}

impl Family {
    /// Whether the response is passed to Stan as an integer array.
    pub fn integer_response(&self) -> bool {
        !matches!(self, Family::Gaussian)
    }

    /// Map the linear predictor to the expected response.
    pub fn inverse_link(&self, eta: f64) -> f64 {
        match self {
            Family::Gaussian => eta,
            Family::Bernoulli => 1.0 / (1.0 + (-eta).exp()),
            Family::Poisson => eta.exp(),
        }
    }

    /// Check response values against the family's support. Integer responses
    /// must also fit Stan's 32-bit `int`.
    pub fn validate_response(&self, response: &str, y: &[f64]) -> Result<()> {
        let bad = match self {
            Family::Gaussian => y.iter().find(|v| !v.is_finite()),
            Family::Bernoulli => y.iter().find(|&&v| v != 0.0 && v != 1.0),
            Family::Poisson => y.iter().find(|&&v| {
                !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > i32::MAX as f64
            }),
        };
        match bad {
            Some(v) => Err(MonoError::InvalidParameter(format!(
                "response '{}' value {} is outside the support of the {} family",
                response,
                v,
                self.name()
            ))),
            None => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Family::Gaussian => "gaussian",
            Family::Bernoulli => "bernoulli",
            Family::Poisson => "poisson",
        }
    }
}

/// Configuration shared by model preparation and posterior summaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Response family.
    pub family: Family,
    /// Whether the linear predictor has an intercept `b_Intercept`.
    pub intercept: bool,
    /// Probability mass of reported credible intervals.
    pub interval: f64,
    /// Tolerance of the unit-sum check on simplex draws. Draws that pass are
    /// renormalized before use.
    pub simplex_tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            family: Family::Gaussian,
            intercept: true,
            interval: 0.95,
            simplex_tolerance: DRAW_TOLERANCE,
        }
    }
}

impl ModelConfig {
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    pub fn with_intercept(mut self, intercept: bool) -> Self {
        self.intercept = intercept;
        self
    }

    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_simplex_tolerance(mut self, tolerance: f64) -> Self {
        self.simplex_tolerance = tolerance;
        self
    }

    /// Lower and upper quantile probabilities of the credible interval.
    pub fn interval_bounds(&self) -> (f64, f64) {
        let tail = (1.0 - self.interval) / 2.0;
        (tail, 1.0 - tail)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.interval > 0.0 && self.interval < 1.0) {
            return Err(MonoError::InvalidParameter(format!(
                "interval must lie in (0, 1), got {}",
                self.interval
            )));
        }
        if !(self.simplex_tolerance > 0.0) || !self.simplex_tolerance.is_finite() {
            return Err(MonoError::InvalidParameter(format!(
                "simplex tolerance must be positive, got {}",
                self.simplex_tolerance
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert_eq!(config.family, Family::Gaussian);
        assert!(config.intercept);
        assert!(config.validate().is_ok());
        let (lo, hi) = config.interval_bounds();
        assert!((lo - 0.025).abs() < 1e-12);
        assert!((hi - 0.975).abs() < 1e-12);
    }

    #[test]
    fn test_json_partial_config() {
        let config = ModelConfig::from_json_str(r#"{"family": "poisson", "interval": 0.9}"#).unwrap();
        assert_eq!(config.family, Family::Poisson);
        assert!(config.intercept);
        assert!((config.interval - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_json_invalid_interval() {
        let result = ModelConfig::from_json_str(r#"{"interval": 1.5}"#);
        assert!(matches!(result, Err(MonoError::InvalidParameter(_))));
        let result = ModelConfig::from_json_str(r#"{"family": "weibull"}"#);
        assert!(matches!(result, Err(MonoError::Json(_))));
    }

    #[test]
    fn test_json_file() {
        let path = std::env::temp_dir().join("test_mono_config.json");
        std::fs::write(&path, r#"{"intercept": false}"#).unwrap();
        let config = ModelConfig::from_json_file(&path).unwrap();
        assert!(!config.intercept);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_family_support() {
        assert!(Family::Bernoulli.validate_response("y", &[0.0, 1.0]).is_ok());
        assert!(Family::Bernoulli.validate_response("y", &[2.0]).is_err());
        assert!(Family::Poisson.validate_response("y", &[0.0, 7.0]).is_ok());
        assert!(Family::Poisson.validate_response("y", &[1.5]).is_err());
        assert!(Family::Poisson.validate_response("y", &[i32::MAX as f64]).is_ok());
        assert!(Family::Gaussian.validate_response("y", &[f64::NAN]).is_err());
    }

    #[test]
    fn test_counts_past_stan_int_rejected() {
        let result = Family::Poisson.validate_response("count", &[1.0, 3e9]);
        assert!(matches!(result, Err(MonoError::InvalidParameter(_))));
    }

    #[test]
    fn test_inverse_link() {
        assert_eq!(Family::Gaussian.inverse_link(2.0), 2.0);
        assert!((Family::Bernoulli.inverse_link(0.0) - 0.5).abs() < 1e-12);
        assert!((Family::Poisson.inverse_link(0.0) - 1.0).abs() < 1e-12);
    }
}
