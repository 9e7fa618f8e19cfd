//! Parameter and data naming.
//!
//! Every monotonic predictor `p` is reported as `b_p` (scale) and
//! `simplex_p[i]`, `i = 1..C-1` (simplex elements). Data variables follow the
//! same suffix: `C_p`, `X_p`, `con_simplex_p`.

use crate::error::{MonoError, Result};

/// Name of the intercept parameter.
pub const INTERCEPT: &str = "b_Intercept";
/// Name of the residual standard deviation (gaussian family).
pub const SIGMA: &str = "sigma";

/// Map a predictor name to a Stan identifier suffix.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, and trailing underscores
/// are dropped because Stan reserves identifiers ending in `__`. The suffix
/// is always prefixed (`b_`, `simplex_`, ...) so it may start with a digit.
pub fn stan_identifier(predictor: &str) -> Result<String> {
    let mapped: String = predictor
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    let ident = mapped.trim_end_matches('_').to_string();
    if ident.is_empty() {
        return Err(MonoError::InvalidParameter(format!(
            "predictor name '{}' has no usable identifier characters",
            predictor
        )));
    }
    if ident == "Intercept" {
        return Err(MonoError::InvalidParameter(format!(
            "predictor name '{}' collides with the intercept",
            predictor
        )));
    }
    Ok(ident)
}

pub fn scale_name(ident: &str) -> String {
    format!("b_{}", ident)
}

pub fn simplex_name(ident: &str) -> String {
    format!("simplex_{}", ident)
}

/// Reported name of simplex element `i` (1-based).
pub fn simplex_element(ident: &str, i: usize) -> String {
    format!("simplex_{}[{}]", ident, i)
}

pub fn count_name(ident: &str) -> String {
    format!("C_{}", ident)
}

pub fn rank_name(ident: &str) -> String {
    format!("X_{}", ident)
}

pub fn concentration_name(ident: &str) -> String {
    format!("con_simplex_{}", ident)
}

/// Normalize a CmdStan CSV header (`simplex_x.2`, `m.1.3`) to bracket form
/// (`simplex_x[2]`, `m[1,3]`). Headers without indices pass through.
pub fn normalize_cmdstan_name(header: &str) -> String {
    let mut parts = header.split('.');
    let base = parts.next().unwrap_or_default();
    let indices: Vec<&str> = parts.collect();
    if indices.is_empty() || indices.iter().any(|i| i.parse::<usize>().is_err()) {
        return header.to_string();
    }
    format!("{}[{}]", base, indices.join(","))
}

/// Whether a column is sampler bookkeeping (`lp__`, `accept_stat__`, ...).
pub fn is_sampler_column(name: &str) -> bool {
    name.ends_with("__")
}
