// Quick timing report for the monotonic-effects pipeline.
// For statistically sound numbers use the criterion benches:
//   cargo bench --package benchmarks --bench encoding
//   cargo bench --package benchmarks --bench posterior

use benchmarks::data::to_cmdstan_csv;
use benchmarks::{BenchmarkStats, OrdinalDataset, TrueEffect};
use mono_effects::model::ModelBuilder;
use mono_effects::posterior::{FittedModel, PosteriorDraws};

fn main() -> mono_effects::Result<()> {
    println!("mono-effects benchmark report");
    println!();

    for &(n_rows, n_categories) in &[(1_000, 4), (10_000, 4), (10_000, 10), (100_000, 10)] {
        let truth = TrueEffect::even(n_categories, 2.0)?;
        let data = OrdinalDataset::generate(n_rows, &truth, 42)?;
        let builder = ModelBuilder::new("y").monotonic("x");

        let build = BenchmarkStats::measure(5, || builder.build(&data.frame));
        println!("build   N={:<7} C={:<3} {}", n_rows, n_categories, build);

        let model = builder.build(&data.frame)?;
        let draws = data.posterior_draws(&model, 4, 1_000, 7)?;
        let csv = to_cmdstan_csv(&draws, 0);
        let read = BenchmarkStats::measure(5, || PosteriorDraws::from_cmdstan_reader(csv.as_bytes()));
        println!("read    N={:<7} C={:<3} {}", n_rows, n_categories, read);

        let fit = FittedModel::new(model, draws)?;
        let effects = BenchmarkStats::measure(5, || fit.conditional_effects("x"));
        println!("effects N={:<7} C={:<3} {}", n_rows, n_categories, effects);
        println!();
    }
    Ok(())
}
