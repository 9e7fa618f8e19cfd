//! Projections of posterior draws onto monotonic effects and predictions.
//!
//! Every function here reads an immutable [`PosteriorDraws`] and returns a
//! new value; nothing is cached or shared between projections.

use crate::config::ModelConfig;
use crate::dataset::DataFrame;
use crate::error::{MonoError, Result};
use crate::model::{MonotonicTerm, PreparedModel};
use crate::posterior::draws::PosteriorDraws;
use crate::posterior::summary::{mean, quantile_sorted};
use crate::simplex::{mo, MonotonicEffect, Simplex};
use crate::stan::names;
use ndarray::{Array1, Array2, Axis};

/// Posterior contribution of one category of a monotonic predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEffect {
    pub rank: usize,
    pub label: String,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Posterior summary of one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedValue {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// One `(b, ζ)` pair per draw for `term`.
///
/// # Errors
/// `MissingParameter` when `b_<p>` or any `simplex_<p>[i]` is absent;
/// `InvalidSimplex` when a draw of `ζ` violates the simplex invariant under
/// `tolerance`. Draws within `tolerance` are renormalized to sum to one.
pub fn monotonic_effects(
    draws: &PosteriorDraws,
    term: &MonotonicTerm,
    tolerance: f64,
) -> Result<Vec<MonotonicEffect>> {
    let b = draws.column(&term.scale_name())?;
    let simplex_columns = term
        .simplex_names()
        .iter()
        .map(|name| draws.column(name))
        .collect::<Result<Vec<_>>>()?;

    (0..draws.n_draws())
        .map(|d| {
            let zeta: Vec<f64> = simplex_columns.iter().map(|col| col[d]).collect();
            let zeta = Simplex::with_tolerance(zeta, tolerance)
                .and_then(|z| Simplex::normalize(z.into_vec()))
                .map_err(|e| {
                    MonoError::InvalidSimplex(format!(
                        "draw {} of {}: {}",
                        d + 1,
                        names::simplex_name(term.ident()),
                        e
                    ))
                })?;
            MonotonicEffect::new(b[d], zeta)
        })
        .collect()
}

/// Posterior mean and interval of the contribution of every category.
pub fn conditional_effects(
    draws: &PosteriorDraws,
    term: &MonotonicTerm,
    config: &ModelConfig,
) -> Result<Vec<CategoryEffect>> {
    let effects = monotonic_effects(draws, term, config.simplex_tolerance)?;
    let (lo, hi) = config.interval_bounds();
    let table = term.encoder().table();

    (1..=term.n_categories())
        .map(|rank| {
            let mut values = effects
                .iter()
                .map(|e| e.contribution(rank))
                .collect::<Result<Vec<_>>>()?;
            let m = mean(&values);
            values.sort_unstable_by(|a, b| a.total_cmp(b));
            Ok(CategoryEffect {
                rank,
                label: table.label_of(rank)?.into_owned(),
                mean: m,
                lower: quantile_sorted(&values, lo),
                upper: quantile_sorted(&values, hi),
            })
        })
        .collect()
}

/// Linear predictor for every draw and every row of `new_data`, shape
/// `(draws, rows)`.
pub fn linear_predictor(
    draws: &PosteriorDraws,
    model: &PreparedModel,
    new_data: &DataFrame,
) -> Result<Array2<f64>> {
    let encoded = model.encode_new_data(new_data)?;
    let n_rows = new_data.n_rows();

    let mut eta = Array2::<f64>::zeros((draws.n_draws(), n_rows));
    if model.config().intercept {
        let intercept = draws.column(names::INTERCEPT)?;
        for (mut row, &a) in eta.axis_iter_mut(Axis(0)).zip(intercept.iter()) {
            row.fill(a);
        }
    }

    let tolerance = model.config().simplex_tolerance;
    for (term, column) in model.terms().iter().zip(&encoded) {
        let effects = monotonic_effects(draws, term, tolerance)?;
        for (mut row, effect) in eta.axis_iter_mut(Axis(0)).zip(&effects) {
            for (value, &rank) in row.iter_mut().zip(&column.ranks) {
                *value += mo(effect.b(), effect.zeta(), rank);
            }
        }
    }
    Ok(eta)
}

/// Posterior mean and interval of the expected response for every row of
/// `new_data`.
pub fn fitted(
    draws: &PosteriorDraws,
    model: &PreparedModel,
    new_data: &DataFrame,
) -> Result<Vec<FittedValue>> {
    let family = model.family();
    let mu = linear_predictor(draws, model, new_data)?.mapv(|eta| family.inverse_link(eta));
    let (lo, hi) = model.config().interval_bounds();

    Ok(mu
        .axis_iter(Axis(1))
        .map(|col| {
            let mut values: Vec<f64> = col.to_vec();
            let m = mean(&values);
            values.sort_unstable_by(|a, b| a.total_cmp(b));
            FittedValue {
                mean: m,
                lower: quantile_sorted(&values, lo),
                upper: quantile_sorted(&values, hi),
            }
        })
        .collect())
}

/// Posterior mean of the linear predictor per row.
pub fn mean_linear_predictor(
    draws: &PosteriorDraws,
    model: &PreparedModel,
    new_data: &DataFrame,
) -> Result<Array1<f64>> {
    let eta = linear_predictor(draws, model, new_data)?;
    eta.mean_axis(Axis(0))
        .ok_or_else(|| MonoError::EmptyData("no posterior draws".to_string()))
}
