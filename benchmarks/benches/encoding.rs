use benchmarks::{OrdinalDataset, TrueEffect};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mono_effects::encoding::{Encoder, FittedEncoder, MonotonicEncoder};
use mono_effects::model::ModelBuilder;

fn bench_fit(c: &mut Criterion) {
    for n_rows in [100, 1_000, 10_000, 100_000].iter() {
        let data = OrdinalDataset::generate(*n_rows, &TrueEffect::even(5, 2.0).unwrap(), 1).unwrap();
        let column = data.frame.column("x").unwrap();

        c.bench_with_input(BenchmarkId::new("encoder_fit", n_rows), column, |b, column| {
            b.iter(|| {
                let fitted = MonotonicEncoder::new("x").fit(black_box(column)).unwrap();
                black_box(fitted);
            });
        });
    }
}

fn bench_transform(c: &mut Criterion) {
    // Number of categories drives the table lookup cost
    for n_categories in [3, 10, 50].iter() {
        let truth = TrueEffect::even(*n_categories, 2.0).unwrap();
        let data = OrdinalDataset::generate(10_000, &truth, 2).unwrap();
        let column = data.frame.column("x").unwrap();
        let fitted = MonotonicEncoder::new("x").fit(column).unwrap();

        c.bench_with_input(
            BenchmarkId::new("encoder_transform", n_categories),
            column,
            |b, column| {
                b.iter(|| {
                    let encoded = fitted.transform(black_box(column)).unwrap();
                    black_box(encoded);
                });
            },
        );
    }
}

fn bench_build(c: &mut Criterion) {
    for n_rows in [1_000, 10_000].iter() {
        let data = OrdinalDataset::generate(*n_rows, &TrueEffect::even(5, 2.0).unwrap(), 3).unwrap();
        let builder = ModelBuilder::new("y").monotonic("x");

        c.bench_with_input(BenchmarkId::new("model_build", n_rows), &data.frame, |b, frame| {
            b.iter(|| {
                let model = builder.build(black_box(frame)).unwrap();
                black_box(model);
            });
        });
    }
}

criterion_group!(benches, bench_fit, bench_transform, bench_build);
criterion_main!(benches);
