//! A single monotonic term of the linear predictor.

use crate::encoding::FittedMonotonicEncoder;
use crate::prior::{DirichletPrior, ScalePrior};
use crate::stan::names;

/// `b_p * mo(simplex_p, X_p)`: fitted encoder plus priors for predictor `p`.
#[derive(Clone, Debug)]
pub struct MonotonicTerm {
    ident: String,
    encoder: FittedMonotonicEncoder,
    dirichlet: DirichletPrior,
    scale_prior: ScalePrior,
}

impl MonotonicTerm {
    pub(crate) fn new(
        ident: String,
        encoder: FittedMonotonicEncoder,
        dirichlet: DirichletPrior,
        scale_prior: ScalePrior,
    ) -> Self {
        Self {
            ident,
            encoder,
            dirichlet,
            scale_prior,
        }
    }

    /// Predictor (column) name.
    pub fn predictor(&self) -> &str {
        self.encoder.predictor()
    }

    /// Stan identifier suffix.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn encoder(&self) -> &FittedMonotonicEncoder {
        &self.encoder
    }

    pub fn n_categories(&self) -> usize {
        self.encoder.n_categories()
    }

    pub fn dirichlet(&self) -> &DirichletPrior {
        &self.dirichlet
    }

    pub fn scale_prior(&self) -> &ScalePrior {
        &self.scale_prior
    }

    /// Reported name of the scale, `b_<predictor>`.
    pub fn scale_name(&self) -> String {
        names::scale_name(&self.ident)
    }

    /// Reported names of the simplex elements, `simplex_<predictor>[i]`.
    pub fn simplex_names(&self) -> Vec<String> {
        (1..self.n_categories())
            .map(|i| names::simplex_element(&self.ident, i))
            .collect()
    }
}
