use benchmarks::data::to_cmdstan_csv;
use benchmarks::{OrdinalDataset, TrueEffect};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mono_effects::model::ModelBuilder;
use mono_effects::posterior::{summarize, FittedModel, PosteriorDraws};

/// Fitted model with `draws_per_chain` draws in each of 4 chains.
fn fitted(draws_per_chain: usize) -> (OrdinalDataset, FittedModel) {
    let data = OrdinalDataset::generate(1_000, &TrueEffect::even(5, 2.0).unwrap(), 11).unwrap();
    let model = ModelBuilder::new("y").monotonic("x").build(&data.frame).unwrap();
    let draws = data.posterior_draws(&model, 4, draws_per_chain, 13).unwrap();
    let fit = FittedModel::new(model, draws).unwrap();
    (data, fit)
}

fn bench_read_cmdstan(c: &mut Criterion) {
    for draws_per_chain in [100, 1_000].iter() {
        let (_, fit) = fitted(*draws_per_chain);
        let csv = to_cmdstan_csv(fit.draws(), 0);

        c.bench_with_input(BenchmarkId::new("read_cmdstan", draws_per_chain), &csv, |b, csv| {
            b.iter(|| {
                let draws = PosteriorDraws::from_cmdstan_reader(black_box(csv.as_bytes())).unwrap();
                black_box(draws);
            });
        });
    }
}

fn bench_summary(c: &mut Criterion) {
    for draws_per_chain in [100, 1_000].iter() {
        let (_, fit) = fitted(*draws_per_chain);

        c.bench_with_input(BenchmarkId::new("summarize", draws_per_chain), fit.draws(), |b, draws| {
            b.iter(|| {
                let report = summarize(black_box(draws), 0.95).unwrap();
                black_box(report);
            });
        });
    }
}

fn bench_projections(c: &mut Criterion) {
    let (data, fit) = fitted(1_000);

    c.bench_function("conditional_effects", |b| {
        b.iter(|| {
            let effects = fit.conditional_effects(black_box("x")).unwrap();
            black_box(effects);
        });
    });

    for n_rows in [10, 100, 1_000].iter() {
        let new_data = data.new_data(*n_rows).unwrap();
        c.bench_with_input(BenchmarkId::new("fitted", n_rows), &new_data, |b, new_data| {
            b.iter(|| {
                let fitted = fit.fitted(black_box(new_data)).unwrap();
                black_box(fitted);
            });
        });
    }
}

criterion_group!(benches, bench_read_cmdstan, bench_summary, bench_projections);
criterion_main!(benches);
