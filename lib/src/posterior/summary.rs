//! Parameter summaries and convergence diagnostics.
//!
//! R-hat is the split-chain potential scale reduction; ESS uses Geyer's
//! initial positive sequence on split chains.

use crate::error::{MonoError, Result};
use crate::posterior::draws::PosteriorDraws;
use log::warn;

/// R-hat above this value flags a parameter as not converged.
pub const RHAT_WARNING: f64 = 1.05;

/// Summary of one parameter.
#[derive(Debug, Clone)]
pub struct ParameterSummary {
    pub name: String,
    pub mean: f64,
    pub sd: f64,
    pub lower: f64,
    pub upper: f64,
    pub rhat: f64,
    pub ess: f64,
}

/// Summaries of every parameter in a draws collection.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub params: Vec<ParameterSummary>,
    pub n_chains: usize,
    pub draws_per_chain: usize,
    /// Interval probabilities `(lower, upper)`.
    pub bounds: (f64, f64),
}

impl SummaryReport {
    pub fn get(&self, name: &str) -> Option<&ParameterSummary> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameters whose R-hat exceeds [`RHAT_WARNING`] or is undefined.
    pub fn unconverged(&self) -> Vec<&ParameterSummary> {
        self.params
            .iter()
            .filter(|p| !(p.rhat <= RHAT_WARNING))
            .collect()
    }

    /// Render the report as a fixed-width table.
    pub fn to_table(&self) -> String {
        let width = self
            .params
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(9)
            .max(9);
        let lo = format!("q{:.1}%", self.bounds.0 * 100.0);
        let hi = format!("q{:.1}%", self.bounds.1 * 100.0);

        let mut lines = Vec::with_capacity(self.params.len() + 4);
        lines.push(format!(
            "{} chains x {} draws",
            self.n_chains, self.draws_per_chain
        ));
        lines.push(format!(
            "{:<w$} {:>9} {:>9} {:>9} {:>9} {:>7} {:>8}",
            "Parameter",
            "mean",
            "sd",
            lo,
            hi,
            "rhat",
            "ess",
            w = width
        ));
        lines.push("-".repeat(width + 56));
        for p in &self.params {
            let ess = if p.ess.is_finite() {
                format!("{:.0}", p.ess)
            } else {
                "NaN".to_string()
            };
            lines.push(format!(
                "{:<w$} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>7.3} {:>8}",
                p.name,
                p.mean,
                p.sd,
                p.lower,
                p.upper,
                p.rhat,
                ess,
                w = width
            ));
        }
        lines.join("\n")
    }
}

/// Summarize every parameter with an interval of probability `interval`.
///
/// # Errors
/// `InvalidParameter` unless `interval` lies in `(0, 1)`.
pub fn summarize(draws: &PosteriorDraws, interval: f64) -> Result<SummaryReport> {
    if !(interval > 0.0 && interval < 1.0) {
        return Err(MonoError::InvalidParameter(format!(
            "interval must lie in (0, 1), got {}",
            interval
        )));
    }
    let tail = (1.0 - interval) / 2.0;
    let bounds = (tail, 1.0 - tail);

    let params: Vec<ParameterSummary> = draws
        .names()
        .iter()
        .map(|name| {
            // Names come from the draws themselves, so the lookup succeeds.
            let chains = draws.chains_of(name).unwrap_or_default();
            summarize_chains(name, &chains, bounds)
        })
        .collect();

    let report = SummaryReport {
        params,
        n_chains: draws.n_chains(),
        draws_per_chain: draws.draws_per_chain(),
        bounds,
    };
    for p in report.unconverged() {
        warn!(
            "parameter '{}' has R-hat {:.3}; chains may not have converged",
            p.name, p.rhat
        );
    }
    Ok(report)
}

fn summarize_chains(name: &str, chains: &[Vec<f64>], bounds: (f64, f64)) -> ParameterSummary {
    let mut all: Vec<f64> = chains.iter().flatten().copied().collect();
    let mean = mean(&all);
    let sd = sample_sd(&all, mean);
    all.sort_unstable_by(|a, b| a.total_cmp(b));
    ParameterSummary {
        name: name.to_string(),
        mean,
        sd,
        lower: quantile_sorted(&all, bounds.0),
        upper: quantile_sorted(&all, bounds.1),
        rhat: split_rhat(chains),
        ess: effective_sample_size(chains),
    }
}

pub(crate) fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

fn sample_sd(data: &[f64], mean: f64) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = data.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (data.len() - 1) as f64).sqrt()
}

/// Linear-interpolated quantile of sorted data.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (pos.ceil() as usize).min(sorted.len() - 1);
    let frac = pos - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

fn split(chains: &[Vec<f64>]) -> Vec<&[f64]> {
    chains
        .iter()
        .flat_map(|c| {
            let mid = c.len() / 2;
            [&c[..mid], &c[mid..]]
        })
        .collect()
}

/// Split R-hat; `NaN` when it is undefined (too few draws, constant chains).
pub fn split_rhat(chains: &[Vec<f64>]) -> f64 {
    let halves = split(chains);
    let n = halves.iter().map(|h| h.len()).min().unwrap_or(0);
    if halves.len() < 2 || n < 2 {
        return f64::NAN;
    }
    let halves: Vec<&[f64]> = halves.into_iter().map(|h| &h[..n]).collect();
    let m = halves.len() as f64;
    let n_f = n as f64;

    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let grand = mean(&means);
    let between = n_f / (m - 1.0) * means.iter().map(|&cm| (cm - grand).powi(2)).sum::<f64>();
    let within = halves
        .iter()
        .zip(&means)
        .map(|(h, &cm)| h.iter().map(|&x| (x - cm).powi(2)).sum::<f64>() / (n_f - 1.0))
        .sum::<f64>()
        / m;
    if within < 1e-300 {
        return f64::NAN;
    }
    let var_plus = (n_f - 1.0) / n_f * within + between / n_f;
    (var_plus / within).sqrt()
}

/// Effective sample size over split chains.
pub fn effective_sample_size(chains: &[Vec<f64>]) -> f64 {
    let halves = split(chains);
    let n = halves.iter().map(|h| h.len()).min().unwrap_or(0);
    if halves.is_empty() || n < 4 {
        return f64::NAN;
    }
    let halves: Vec<&[f64]> = halves.into_iter().map(|h| &h[..n]).collect();
    let m = halves.len() as f64;
    let n_f = n as f64;

    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let within = halves
        .iter()
        .zip(&means)
        .map(|(h, &cm)| h.iter().map(|&x| (x - cm).powi(2)).sum::<f64>() / (n_f - 1.0))
        .sum::<f64>()
        / m;
    if within < 1e-300 {
        return f64::NAN;
    }

    let autocorr = |lag: usize| -> f64 {
        let gamma = halves
            .iter()
            .zip(&means)
            .map(|(h, &cm)| {
                (0..n - lag)
                    .map(|t| (h[t] - cm) * (h[t + lag] - cm))
                    .sum::<f64>()
            })
            .sum::<f64>()
            / (m * (n_f - 1.0));
        1.0 - (within - gamma) / within
    };

    let mut tau = -1.0;
    let mut lag = 0;
    while lag + 1 < n {
        let pair = autocorr(lag) + autocorr(lag + 1);
        if pair < 0.0 {
            break;
        }
        tau += 2.0 * pair;
        lag += 2;
    }
    let tau = tau.max(1.0 / (m * n_f).log10().max(1.0));
    m * n_f / tau
}
