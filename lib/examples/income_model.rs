//! Monotonic Effect Example: Life Satisfaction by Income
//!
//! This example walks through the full workflow for one ordinal predictor:
//! - Ordered income brackets encoded to ranks
//! - Encoder persistence and reload
//! - Stan program and data emission for CmdStan
//! - Prior draws of the monotonic effect
//! - Posterior summary and conditional effects from CmdStan output
//!
//! # Data:
//! - ls: life satisfaction (gaussian response)
//! - income: below_20 < 20_to_40 < 40_to_100 < greater_100
//!
//! Run with: cargo run --example income_model
//! After sampling:  cargo run --example income_model -- output_1.csv output_2.csv

use mono_effects::{
    dataset::DataFrame,
    encoding::{FittedEncoder, FittedMonotonicEncoder},
    model::ModelBuilder,
    posterior::{FittedModel, PosteriorDraws},
    prior::{DirichletPrior, ScalePrior},
    Column, MonotonicEffect,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;

const INCOME: [&str; 4] = ["below_20", "20_to_40", "40_to_100", "greater_100"];

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Life Satisfaction by Income ===\n");

    // 1. Training data
    let income = [
        "below_20",
        "20_to_40",
        "40_to_100",
        "greater_100",
        "20_to_40",
        "below_20",
        "40_to_100",
        "greater_100",
        "40_to_100",
        "20_to_40",
        "below_20",
        "greater_100",
    ];
    let ls = vec![
        32.0, 48.0, 55.0, 58.0, 45.0, 30.0, 57.0, 60.0, 54.0, 50.0, 35.0, 59.0,
    ];
    let frame = DataFrame::new()
        .with_column("ls", Column::Numeric(ls))?
        .with_column("income", Column::ordered(&INCOME, &income))?;
    println!("Training rows: {}", frame.n_rows());

    // 2. Model with a weakly informative prior on the scale
    let model = ModelBuilder::new("ls")
        .monotonic("income")
        .scale_prior("income", ScalePrior::Normal { mean: 0.0, sd: 20.0 })
        .build(&frame)?;

    let term = model.term("income")?;
    println!("Categories: {} -> {:?}", term.n_categories(), term.encoder().levels());

    // 3. Persist the encoder so held-out data is ranked the same way
    let encoder_path = std::env::temp_dir().join("income_encoder.bin");
    term.encoder().save_to_file(&encoder_path)?;
    let reloaded = FittedMonotonicEncoder::load_from_file(&encoder_path)?;
    let held_out = Column::ordered(&INCOME, &["greater_100", "below_20"]);
    println!("Held-out ranks: {:?}", reloaded.transform(&held_out)?.ranks);

    // 4. Stan files
    let code_path = std::env::temp_dir().join("income_model.stan");
    let data_path = std::env::temp_dir().join("income_model.json");
    model.write_stan_files(&code_path, &data_path)?;
    println!("\nStan program: {}", code_path.display());
    println!("Stan data:    {}", data_path.display());

    // 5. What the Dirichlet prior implies for the category spacing
    println!("\nPrior draws of the effect with b = 10:");
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let prior = DirichletPrior::uniform(term.n_categories())?;
    for _ in 0..3 {
        let effect = MonotonicEffect::new(10.0, prior.sample(&mut rng)?)?;
        let contributions = effect.contributions(&[1, 2, 3, 4])?;
        println!("  zeta = {:.3?} -> {:.2?}", effect.zeta().as_slice(), contributions);
    }

    // 6. Posterior from CmdStan output, when given
    let csv_paths: Vec<String> = std::env::args().skip(1).collect();
    if csv_paths.is_empty() {
        println!("\nSample with CmdStan and pass the output CSV files to see the posterior.");
        return Ok(());
    }
    let draws = PosteriorDraws::from_cmdstan_files(&csv_paths)?;
    let fit = FittedModel::new(model, draws)?;

    println!("\n{}", fit.summary()?.to_table());
    println!("\nConditional effects of income:");
    for effect in fit.conditional_effects("income")? {
        println!(
            "  {:>12}  {:>7.2}  [{:.2}, {:.2}]",
            effect.label, effect.mean, effect.lower, effect.upper
        );
    }

    let new_data = DataFrame::new().with_column("income", held_out)?;
    for (label, value) in ["greater_100", "below_20"].iter().zip(fit.fitted(&new_data)?) {
        println!("Expected ls for {}: {:.2}", label, value.mean);
    }

    Ok(())
}
