use mono_effects::dataset::DataFrame;
use mono_effects::model::PreparedModel;
use mono_effects::posterior::PosteriorDraws;
use mono_effects::prior::DirichletPrior;
use mono_effects::stan::names;
use mono_effects::{mo, Column, MonoError, Result, Simplex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Parameters of the effect a synthetic dataset is drawn from.
#[derive(Debug, Clone)]
pub struct TrueEffect {
    pub intercept: f64,
    pub b: f64,
    pub zeta: Simplex,
    pub sigma: f64,
}

impl TrueEffect {
    /// Even steps over `n_categories` with scale `b`.
    ///
    /// A monotonic effect needs at least two categories.
    pub fn even(n_categories: usize, b: f64) -> Result<Self> {
        if n_categories < 2 {
            return Err(MonoError::InvalidParameter(format!(
                "an even effect needs at least 2 categories, got {}",
                n_categories
            )));
        }
        Ok(Self {
            intercept: 1.0,
            b,
            zeta: Simplex::uniform(n_categories - 1)?,
            sigma: 1.0,
        })
    }
}

/// Synthetic ordinal dataset: one predictor `x` with levels `level_1 <
/// level_2 < ...` and a gaussian response `y`.
///
/// The dataset is deterministic given its seed.
///
/// # Example
///
/// ```no_run
/// use benchmarks::data::{OrdinalDataset, TrueEffect};
///
/// let truth = TrueEffect::even(5, 2.0).unwrap();
/// let data = OrdinalDataset::generate(1_000, &truth, 42).unwrap();
/// assert_eq!(data.frame.n_rows(), 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct OrdinalDataset {
    pub frame: DataFrame,
    pub levels: Vec<String>,
    pub truth: TrueEffect,
}

impl OrdinalDataset {
    pub fn generate(n_rows: usize, truth: &TrueEffect, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n_categories = truth.zeta.len() + 1;
        let levels: Vec<String> = (1..=n_categories).map(|i| format!("level_{}", i)).collect();
        let noise = Normal::new(0.0, truth.sigma)
            .map_err(|e| MonoError::InvalidParameter(e.to_string()))?;

        let mut labels = Vec::with_capacity(n_rows);
        let mut y = Vec::with_capacity(n_rows);
        for _ in 0..n_rows {
            let rank = rng.gen_range(1..=n_categories);
            labels.push(levels[rank - 1].clone());
            y.push(truth.intercept + mo(truth.b, &truth.zeta, rank) + noise.sample(&mut rng));
        }

        let frame = DataFrame::new()
            .with_column("y", Column::Numeric(y))?
            .with_column("x", Column::ordered(&levels, &labels))?;
        Ok(Self {
            frame,
            levels,
            truth: truth.clone(),
        })
    }

    /// Frame of `n_rows` predictor values cycling through the levels.
    pub fn new_data(&self, n_rows: usize) -> Result<DataFrame> {
        let labels: Vec<String> = (0..n_rows)
            .map(|i| self.levels[i % self.levels.len()].clone())
            .collect();
        DataFrame::new().with_column("x", Column::ordered(&self.levels, &labels))
    }

    /// Draws scattered around the true effect for every parameter of `model`.
    ///
    /// Simplexes are drawn from a Dirichlet centred on the true `ζ`.
    pub fn posterior_draws(
        &self,
        model: &PreparedModel,
        n_chains: usize,
        draws_per_chain: usize,
        seed: u64,
    ) -> Result<PosteriorDraws> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let jitter = Normal::new(0.0, 0.1)
            .map_err(|e| MonoError::InvalidParameter(e.to_string()))?;
        let concentration: Vec<f64> = self.truth.zeta.as_slice().iter().map(|z| z * 200.0).collect();
        let around_zeta = DirichletPrior::new(concentration)?;
        let param_names = model.parameter_names();

        let mut chains = Vec::with_capacity(n_chains);
        for _ in 0..n_chains {
            let mut chain = Vec::with_capacity(draws_per_chain);
            for _ in 0..draws_per_chain {
                let mut draw = Vec::with_capacity(param_names.len());
                if model.config().intercept {
                    draw.push(self.truth.intercept + jitter.sample(&mut rng));
                }
                for _ in model.terms() {
                    draw.push(self.truth.b + jitter.sample(&mut rng));
                    draw.extend_from_slice(around_zeta.sample(&mut rng)?.as_slice());
                }
                if param_names.last().map(String::as_str) == Some(names::SIGMA) {
                    draw.push((self.truth.sigma + jitter.sample(&mut rng)).abs());
                }
                chain.push(draw);
            }
            chains.push(chain);
        }
        PosteriorDraws::from_chains(param_names, chains)
    }
}

/// Render one chain of `draws` the way CmdStan writes it, including the
/// comment header and sampler columns.
pub fn to_cmdstan_csv(draws: &PosteriorDraws, chain: usize) -> String {
    let headers: Vec<String> = draws
        .names()
        .iter()
        .map(|n| n.replace('[', ".").replace(']', ""))
        .collect();
    let mut out = String::from("# model = synthetic\n# method = sample (Default)\n");
    out.push_str("lp__,accept_stat__,");
    out.push_str(&headers.join(","));
    out.push('\n');

    let per_chain = draws.draws_per_chain();
    let rows = draws.values().rows().into_iter().skip(chain * per_chain).take(per_chain);
    for row in rows {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str("-10.0,0.9,");
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mono_effects::model::ModelBuilder;

    #[test]
    fn test_generate_is_deterministic() {
        let truth = TrueEffect::even(4, 3.0).unwrap();
        let a = OrdinalDataset::generate(50, &truth, 7).unwrap();
        let b = OrdinalDataset::generate(50, &truth, 7).unwrap();
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.levels.len(), 4);
    }

    #[test]
    fn test_even_needs_two_categories() {
        assert!(matches!(
            TrueEffect::even(0, 1.0),
            Err(MonoError::InvalidParameter(_))
        ));
        assert!(matches!(
            TrueEffect::even(1, 1.0),
            Err(MonoError::InvalidParameter(_))
        ));
        assert_eq!(TrueEffect::even(2, 1.0).unwrap().zeta.len(), 1);
    }

    #[test]
    fn test_draws_match_model_parameters() {
        let truth = TrueEffect::even(4, 3.0).unwrap();
        let data = OrdinalDataset::generate(100, &truth, 1).unwrap();
        let model = ModelBuilder::new("y").monotonic("x").build(&data.frame).unwrap();
        let draws = data.posterior_draws(&model, 2, 20, 3).unwrap();
        assert_eq!(draws.names(), model.parameter_names().as_slice());
        assert_eq!(draws.n_draws(), 40);

        let csv = to_cmdstan_csv(&draws, 1);
        let chain = PosteriorDraws::from_cmdstan_reader(csv.as_bytes()).unwrap();
        assert_eq!(chain.n_draws(), 20);
        assert_eq!(chain.names(), draws.names());
    }
}
