//! Posterior draws and read-only projections over them.
//!
//! Sampling happens outside this crate: the program and data of a
//! [`PreparedModel`] are run through CmdStan and the CSV output is read back
//! into [`PosteriorDraws`]. [`FittedModel`] pairs the two and exposes the
//! projections:
//!
//! - [`FittedModel::summary`]: mean, sd, interval, R-hat and ESS per parameter
//! - [`FittedModel::monotonic_effects`]: one `(b, ζ)` per draw
//! - [`FittedModel::conditional_effects`]: contribution per category
//! - [`FittedModel::linear_predictor`] / [`FittedModel::fitted`]: predictions
//!   for new data encoded with the training tables
//!
//! # Example
//! ```ignore
//! let draws = PosteriorDraws::from_cmdstan_files(&["output_1.csv", "output_2.csv"])?;
//! let fit = FittedModel::new(model, draws)?;
//! println!("{}", fit.summary()?.to_table());
//! for effect in fit.conditional_effects("income")? {
//!     println!("{:>12} {:.2}", effect.label, effect.mean);
//! }
//! ```

mod draws;
mod effects;
mod summary;

pub use draws::PosteriorDraws;
pub use effects::{
    conditional_effects, fitted, linear_predictor, mean_linear_predictor, monotonic_effects,
    CategoryEffect, FittedValue,
};
pub use summary::{
    effective_sample_size, split_rhat, summarize, ParameterSummary, SummaryReport, RHAT_WARNING,
};

use crate::dataset::DataFrame;
use crate::error::{MonoError, Result};
use crate::model::PreparedModel;
use crate::simplex::MonotonicEffect;
use ndarray::Array2;

/// A prepared model together with its posterior draws.
#[derive(Clone, Debug)]
pub struct FittedModel {
    model: PreparedModel,
    draws: PosteriorDraws,
}

impl FittedModel {
    /// Pair a model with its draws.
    ///
    /// # Errors
    /// `MissingParameter` when a parameter the model declares is absent from
    /// the draws.
    pub fn new(model: PreparedModel, draws: PosteriorDraws) -> Result<Self> {
        if let Some(missing) = model
            .parameter_names()
            .into_iter()
            .find(|name| !draws.contains(name))
        {
            return Err(MonoError::MissingParameter(missing));
        }
        Ok(Self { model, draws })
    }

    pub fn model(&self) -> &PreparedModel {
        &self.model
    }

    pub fn draws(&self) -> &PosteriorDraws {
        &self.draws
    }

    /// Summary of the model's parameters, in declaration order.
    pub fn summary(&self) -> Result<SummaryReport> {
        let mut report = summarize(&self.draws, self.model.config().interval)?;
        let order = self.model.parameter_names();
        report.params.retain(|p| order.contains(&p.name));
        report
            .params
            .sort_by_key(|p| order.iter().position(|n| *n == p.name));
        Ok(report)
    }

    pub fn monotonic_effects(&self, predictor: &str) -> Result<Vec<MonotonicEffect>> {
        let term = self.model.term(predictor)?;
        monotonic_effects(&self.draws, term, self.model.config().simplex_tolerance)
    }

    pub fn conditional_effects(&self, predictor: &str) -> Result<Vec<CategoryEffect>> {
        let term = self.model.term(predictor)?;
        conditional_effects(&self.draws, term, self.model.config())
    }

    pub fn linear_predictor(&self, new_data: &DataFrame) -> Result<Array2<f64>> {
        linear_predictor(&self.draws, &self.model, new_data)
    }

    pub fn fitted(&self, new_data: &DataFrame) -> Result<Vec<FittedValue>> {
        fitted(&self.draws, &self.model, new_data)
    }
}
