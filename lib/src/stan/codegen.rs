//! Stan program generation.

use crate::config::{Family, ModelConfig};
use crate::model::MonotonicTerm;
use crate::stan::names;
use log::debug;

const MO_FUNCTION: &str = "\
  /* cumulative monotonic effect
   * Args:
   *   scale: simplex over the C - 1 steps between adjacent categories
   *   i: rank in 1..C
   * Returns:
   *   sum of the first min(i, C - 1) elements of scale
   */
  real mo(vector scale, int i) {
    return sum(scale[1:min(i, rows(scale))]);
  }
";

/// Indentation-aware line buffer.
struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("}");
    }
}

/// Emit the complete program for `terms` under `config`.
pub fn generate(terms: &[MonotonicTerm], config: &ModelConfig) -> String {
    let mut w = CodeWriter::new();
    w.line(&format!(
        "// generated by mono-effects {}",
        env!("CARGO_PKG_VERSION")
    ));

    w.line("functions {");
    w.out.push_str(MO_FUNCTION);
    w.line("}");

    write_data(&mut w, terms, config.family);
    write_parameters(&mut w, terms, config);
    write_model(&mut w, terms, config);

    debug!(
        "generated Stan program: {} lines, {} monotonic term(s)",
        w.out.lines().count(),
        terms.len()
    );
    w.out
}

fn write_data(w: &mut CodeWriter, terms: &[MonotonicTerm], family: Family) {
    w.open("data");
    w.line("int<lower=1> N;  // number of observations");
    match family {
        Family::Gaussian => w.line("vector[N] Y;  // response"),
        Family::Bernoulli => w.line("array[N] int<lower=0, upper=1> Y;  // response"),
        Family::Poisson => w.line("array[N] int<lower=0> Y;  // response"),
    }
    for term in terms {
        let ident = term.ident();
        let count = names::count_name(ident);
        w.line(&format!(
            "int<lower=2> {};  // categories of {}",
            count,
            term.predictor()
        ));
        w.line(&format!(
            "array[N] int<lower=1, upper={}> {};  // ranks",
            count,
            names::rank_name(ident)
        ));
        w.line(&format!(
            "vector<lower=0>[{} - 1] {};  // Dirichlet concentration",
            count,
            names::concentration_name(ident)
        ));
    }
    w.close();
}

fn write_parameters(w: &mut CodeWriter, terms: &[MonotonicTerm], config: &ModelConfig) {
    w.open("parameters");
    if config.intercept {
        w.line(&format!("real {};", names::INTERCEPT));
    }
    for term in terms {
        let ident = term.ident();
        w.line(&format!("real {};  // scale", names::scale_name(ident)));
        w.line(&format!(
            "simplex[{} - 1] {};  // step weights",
            names::count_name(ident),
            names::simplex_name(ident)
        ));
    }
    if config.family == Family::Gaussian {
        w.line(&format!("real<lower=0> {};", names::SIGMA));
    }
    w.close();
}

fn write_model(w: &mut CodeWriter, terms: &[MonotonicTerm], config: &ModelConfig) {
    w.open("model");
    let base = if config.intercept {
        names::INTERCEPT
    } else {
        "0.0"
    };
    w.line(&format!("vector[N] mu = rep_vector({}, N);", base));
    w.open("for (n in 1:N)");
    for term in terms {
        let ident = term.ident();
        w.line(&format!(
            "mu[n] += {} * mo({}, {}[n]);",
            names::scale_name(ident),
            names::simplex_name(ident),
            names::rank_name(ident)
        ));
    }
    w.close();

    match config.family {
        Family::Gaussian => w.line(&format!("target += normal_lpdf(Y | mu, {});", names::SIGMA)),
        Family::Bernoulli => w.line("target += bernoulli_logit_lpmf(Y | mu);"),
        Family::Poisson => w.line("target += poisson_log_lpmf(Y | mu);"),
    }

    w.line("// priors");
    for term in terms {
        let ident = term.ident();
        w.line(&format!(
            "target += dirichlet_lpdf({} | {});",
            names::simplex_name(ident),
            names::concentration_name(ident)
        ));
        if let Some(scale) = term.scale_prior().stan_statement(&names::scale_name(ident)) {
            w.line(&scale);
        }
    }
    if config.family == Family::Gaussian {
        w.line(&format!(
            "target += student_t_lpdf({} | 3, 0, 2.5) - student_t_lccdf(0 | 3, 0, 2.5);",
            names::SIGMA
        ));
    }
    w.close();
}
