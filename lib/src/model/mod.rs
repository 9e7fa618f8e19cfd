//! Model description and preparation.
//!
//! [`ModelBuilder`] collects the response, the family and the monotonic
//! predictors; [`ModelBuilder::build`] fits one encoder per predictor on the
//! training frame and emits the Stan program and its data. The resulting
//! [`PreparedModel`] is immutable and keeps the training-time category
//! tables for encoding new data.
//!
//! # Example
//! ```ignore
//! let model = ModelBuilder::new("ls")
//!     .monotonic("income")
//!     .dirichlet("income", DirichletPrior::new(vec![2.0, 1.0, 1.0])?)
//!     .build(&frame)?;
//!
//! std::fs::write("model.stan", model.stan_code())?;
//! std::fs::write("data.json", model.stan_data_json()?)?;
//! ```

mod term;

pub use term::MonotonicTerm;

use crate::config::{Family, ModelConfig};
use crate::dataset::DataFrame;
use crate::encoding::{EncodedColumn, Encoder, FittedEncoder, MonotonicEncoder};
use crate::error::{MonoError, Result};
use crate::prior::{DirichletPrior, ScalePrior};
use crate::stan::{codegen, data, names};
use log::info;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Builder for a regression with one or more monotonic terms.
#[derive(Clone, Debug)]
pub struct ModelBuilder {
    response: String,
    config: ModelConfig,
    predictors: Vec<String>,
    n_categories: HashMap<String, usize>,
    dirichlet: HashMap<String, DirichletPrior>,
    scale_priors: HashMap<String, ScalePrior>,
}

impl ModelBuilder {
    /// Start a model for the named response column.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            config: ModelConfig::default(),
            predictors: Vec::new(),
            n_categories: HashMap::new(),
            dirichlet: HashMap::new(),
            scale_priors: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn family(mut self, family: Family) -> Self {
        self.config.family = family;
        self
    }

    pub fn intercept(mut self, intercept: bool) -> Self {
        self.config.intercept = intercept;
        self
    }

    /// Add a monotonic term for the named predictor column.
    pub fn monotonic(mut self, predictor: impl Into<String>) -> Self {
        self.predictors.push(predictor.into());
        self
    }

    /// Declare the category count of an integer-valued predictor.
    pub fn n_categories(mut self, predictor: impl Into<String>, n_categories: usize) -> Self {
        self.n_categories.insert(predictor.into(), n_categories);
        self
    }

    /// Dirichlet prior for the simplex of a predictor (default: all ones).
    pub fn dirichlet(mut self, predictor: impl Into<String>, prior: DirichletPrior) -> Self {
        self.dirichlet.insert(predictor.into(), prior);
        self
    }

    /// Prior for the scale of a predictor (default: flat).
    pub fn scale_prior(mut self, predictor: impl Into<String>, prior: ScalePrior) -> Self {
        self.scale_priors.insert(predictor.into(), prior);
        self
    }

    /// Fit the encoders on `frame` and emit code and data.
    ///
    /// # Errors
    /// Any encoding error of any predictor, an unusable response, priors for
    /// predictors that are not in the model, or mismatched prior lengths.
    pub fn build(&self, frame: &DataFrame) -> Result<PreparedModel> {
        self.config.validate()?;
        if self.predictors.is_empty() {
            return Err(MonoError::InvalidParameter(
                "a model needs at least one monotonic term".to_string(),
            ));
        }
        if frame.is_empty() {
            return Err(MonoError::EmptyData(
                "cannot build a model from a frame without rows".to_string(),
            ));
        }
        self.check_prior_targets()?;

        let y = frame.column(&self.response)?.as_f64().ok_or_else(|| {
            MonoError::InvalidParameter(format!(
                "response '{}' must be a numeric column",
                self.response
            ))
        })?;
        self.config.family.validate_response(&self.response, &y)?;

        let mut terms = Vec::with_capacity(self.predictors.len());
        let mut encoded = Vec::with_capacity(self.predictors.len());
        let mut idents = HashSet::new();
        for predictor in &self.predictors {
            let ident = names::stan_identifier(predictor)?;
            if !idents.insert(ident.clone()) {
                return Err(MonoError::InvalidParameter(format!(
                    "predictor '{}' appears twice or collides with another predictor as '{}'",
                    predictor, ident
                )));
            }

            let mut encoder = MonotonicEncoder::new(predictor.as_str());
            if let Some(&c) = self.n_categories.get(predictor) {
                encoder = encoder.with_n_categories(c);
            }
            let column = frame.column(predictor)?;
            let fitted = encoder.fit(column)?;
            let ranks = fitted.transform(column)?;

            let dirichlet = match self.dirichlet.get(predictor) {
                Some(prior) => {
                    prior.check_categories(predictor, fitted.n_categories())?;
                    prior.clone()
                }
                None => DirichletPrior::uniform(fitted.n_categories())?,
            };
            let scale_prior = self
                .scale_priors
                .get(predictor)
                .cloned()
                .unwrap_or_default();
            scale_prior.validate()?;

            terms.push(MonotonicTerm::new(ident, fitted, dirichlet, scale_prior));
            encoded.push(ranks);
        }

        let code = codegen::generate(&terms, &self.config);
        let stan_data = data::build(&y, &terms, &encoded, self.config.family)?;

        info!(
            "prepared {} model for '{}' with {} monotonic term(s) on {} rows",
            self.config.family.name(),
            self.response,
            terms.len(),
            frame.n_rows()
        );

        Ok(PreparedModel {
            response: self.response.clone(),
            config: self.config.clone(),
            terms,
            code,
            data: stan_data,
        })
    }

    fn check_prior_targets(&self) -> Result<()> {
        let known: HashSet<&str> = self.predictors.iter().map(String::as_str).collect();
        let targets = self
            .dirichlet
            .keys()
            .chain(self.scale_priors.keys())
            .chain(self.n_categories.keys());
        for target in targets {
            if !known.contains(target.as_str()) {
                return Err(MonoError::InvalidPrior(format!(
                    "'{}' is not a monotonic predictor of this model",
                    target
                )));
            }
        }
        Ok(())
    }
}

/// A model ready to be handed to Stan.
#[derive(Clone, Debug)]
pub struct PreparedModel {
    response: String,
    config: ModelConfig,
    terms: Vec<MonotonicTerm>,
    code: String,
    data: serde_json::Value,
}

impl PreparedModel {
    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn family(&self) -> Family {
        self.config.family
    }

    pub fn terms(&self) -> &[MonotonicTerm] {
        &self.terms
    }

    /// Look up the term of a predictor.
    pub fn term(&self, predictor: &str) -> Result<&MonotonicTerm> {
        self.terms
            .iter()
            .find(|t| t.predictor() == predictor)
            .ok_or_else(|| {
                MonoError::InvalidParameter(format!(
                    "'{}' is not a monotonic predictor of this model",
                    predictor
                ))
            })
    }

    /// Stan program text.
    pub fn stan_code(&self) -> &str {
        &self.code
    }

    /// Stan data as a JSON value.
    pub fn stan_data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Stan data as pretty-printed JSON text.
    pub fn stan_data_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Write the program and its data next to each other.
    pub fn write_stan_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        code_path: P,
        data_path: Q,
    ) -> Result<()> {
        std::fs::write(code_path, &self.code)?;
        std::fs::write(data_path, self.stan_data_json()?)?;
        Ok(())
    }

    /// Names of every sampled parameter, in declaration order.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.config.intercept {
            out.push(names::INTERCEPT.to_string());
        }
        for term in &self.terms {
            out.push(term.scale_name());
            out.extend(term.simplex_names());
        }
        if self.config.family == Family::Gaussian {
            out.push(names::SIGMA.to_string());
        }
        out
    }

    /// Encode every monotonic predictor of `frame` with the training tables.
    ///
    /// Fails with `UnknownCategory` on labels unseen at build time; no
    /// permissive new-level policy is applied.
    pub fn encode_new_data(&self, frame: &DataFrame) -> Result<Vec<EncodedColumn>> {
        self.terms
            .iter()
            .map(|term| term.encoder().transform(frame.column(term.predictor())?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Column;

    const INCOME: [&str; 4] = ["below_20", "20_to_40", "40_to_100", "greater_100"];

    fn frame() -> DataFrame {
        DataFrame::new()
            .with_column("ls", Column::Numeric(vec![30.0, 45.0, 60.0, 62.0]))
            .unwrap()
            .with_column(
                "income",
                Column::ordered(&INCOME, &["below_20", "20_to_40", "40_to_100", "greater_100"]),
            )
            .unwrap()
            .with_column("edu", Column::Integer(vec![1, 2, 2, 3]))
            .unwrap()
            .with_column("city", Column::unordered(&["a", "b", "a", "b"]))
            .unwrap()
    }

    #[test]
    fn test_build_single_term() {
        let model = ModelBuilder::new("ls").monotonic("income").build(&frame()).unwrap();
        assert_eq!(model.terms().len(), 1);
        assert_eq!(model.term("income").unwrap().n_categories(), 4);
        assert_eq!(
            model.parameter_names(),
            vec![
                "b_Intercept",
                "b_income",
                "simplex_income[1]",
                "simplex_income[2]",
                "simplex_income[3]",
                "sigma"
            ]
        );
        assert!(model.stan_code().contains("simplex[C_income - 1] simplex_income;"));
        assert_eq!(model.stan_data()["C_income"], 4);
    }

    #[test]
    fn test_build_two_terms_without_intercept() {
        let model = ModelBuilder::new("ls")
            .intercept(false)
            .monotonic("income")
            .monotonic("edu")
            .build(&frame())
            .unwrap();
        let names = model.parameter_names();
        assert_eq!(names[0], "b_income");
        assert!(names.contains(&"simplex_edu[2]".to_string()));
        assert!(!names.contains(&"b_Intercept".to_string()));
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            ModelBuilder::new("ls").build(&frame()),
            Err(MonoError::InvalidParameter(_))
        ));
        assert!(matches!(
            ModelBuilder::new("ls").monotonic("city").build(&frame()),
            Err(MonoError::InvalidPredictorKind { .. })
        ));
        assert!(matches!(
            ModelBuilder::new("ls").monotonic("age").build(&frame()),
            Err(MonoError::MissingColumn(_))
        ));
        assert!(matches!(
            ModelBuilder::new("city").monotonic("income").build(&frame()),
            Err(MonoError::InvalidParameter(_))
        ));
        assert!(matches!(
            ModelBuilder::new("ls")
                .monotonic("income")
                .monotonic("income")
                .build(&frame()),
            Err(MonoError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_prior_checks() {
        let wrong_len = ModelBuilder::new("ls")
            .monotonic("income")
            .dirichlet("income", DirichletPrior::new(vec![1.0, 1.0]).unwrap())
            .build(&frame());
        assert!(matches!(wrong_len, Err(MonoError::InvalidPrior(_))));

        let unknown_target = ModelBuilder::new("ls")
            .monotonic("income")
            .scale_prior("edu", ScalePrior::Normal { mean: 0.0, sd: 1.0 })
            .build(&frame());
        assert!(matches!(unknown_target, Err(MonoError::InvalidPrior(_))));
    }

    #[test]
    fn test_family_response_check() {
        let result = ModelBuilder::new("ls")
            .family(Family::Bernoulli)
            .monotonic("income")
            .build(&frame());
        assert!(matches!(result, Err(MonoError::InvalidParameter(_))));

        let counts = frame()
            .with_column("visits", Column::Integer(vec![0, 1, 3_000_000_000, 2]))
            .unwrap();
        let result = ModelBuilder::new("visits")
            .family(Family::Poisson)
            .monotonic("income")
            .build(&counts);
        assert!(matches!(result, Err(MonoError::InvalidParameter(_))));
    }

    #[test]
    fn test_encode_new_data() {
        let model = ModelBuilder::new("ls")
            .monotonic("income")
            .monotonic("edu")
            .build(&frame())
            .unwrap();

        let new = DataFrame::new()
            .with_column("income", Column::ordered(&INCOME, &["greater_100", "below_20"]))
            .unwrap()
            .with_column("edu", Column::Integer(vec![3, 1]))
            .unwrap();
        let encoded = model.encode_new_data(&new).unwrap();
        assert_eq!(encoded[0].ranks, vec![4, 1]);
        assert_eq!(encoded[1].ranks, vec![3, 1]);

        let unseen = DataFrame::new()
            .with_column("income", Column::ordered(&["billions"], &["billions"]))
            .unwrap()
            .with_column("edu", Column::Integer(vec![1]))
            .unwrap();
        assert!(matches!(
            model.encode_new_data(&unseen),
            Err(MonoError::UnknownCategory { .. })
        ));

        let beyond_scale = DataFrame::new()
            .with_column("income", Column::ordered(&INCOME, &["below_20"]))
            .unwrap()
            .with_column("edu", Column::Integer(vec![4]))
            .unwrap();
        assert!(matches!(
            model.encode_new_data(&beyond_scale),
            Err(MonoError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_write_stan_files() {
        let model = ModelBuilder::new("ls").monotonic("income").build(&frame()).unwrap();
        let dir = std::env::temp_dir();
        let code_path = dir.join("test_mono_model.stan");
        let data_path = dir.join("test_mono_model.json");
        model.write_stan_files(&code_path, &data_path).unwrap();

        let data: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&data_path).unwrap()).unwrap();
        assert_eq!(data["N"], 4);
        assert_eq!(std::fs::read_to_string(&code_path).unwrap(), model.stan_code());

        std::fs::remove_file(code_path).ok();
        std::fs::remove_file(data_path).ok();
    }
}
