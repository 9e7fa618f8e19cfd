use mono_effects::config::{Family, ModelConfig};
use mono_effects::dataset::DataFrame;
use mono_effects::encoding::{Encoder, FittedEncoder, FittedMonotonicEncoder, MonotonicEncoder};
use mono_effects::model::ModelBuilder;
use mono_effects::posterior::{FittedModel, PosteriorDraws};
use mono_effects::prior::DirichletPrior;
use mono_effects::{Column, MonoError, MonotonicEffect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const INCOME: [&str; 4] = ["below_20", "20_to_40", "40_to_100", "greater_100"];

fn income_frame() -> DataFrame {
    DataFrame::new()
        .with_column("ls", Column::Numeric(vec![31.0, 47.0, 55.0, 58.0, 33.0, 54.0]))
        .unwrap()
        .with_column(
            "income",
            Column::ordered(
                &INCOME,
                &["below_20", "20_to_40", "40_to_100", "greater_100", "below_20", "40_to_100"],
            ),
        )
        .unwrap()
}

#[test]
fn income_levels_round_trip_through_saved_encoder() {
    let column = Column::ordered(&INCOME, &INCOME);
    let encoder = MonotonicEncoder::new("income");
    assert_eq!(encoder.fit_transform(&column).unwrap().ranks, vec![1, 2, 3, 4]);

    let fitted = encoder.fit(&column).unwrap();
    let encoded = fitted.transform(&column).unwrap();
    assert_eq!(encoded.ranks, vec![1, 2, 3, 4]);
    assert_eq!(encoded.n_categories, 4);

    let path = std::env::temp_dir().join("end_to_end_income_encoder.bin");
    fitted.save_to_file(&path).unwrap();
    let loaded = FittedMonotonicEncoder::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.inverse_transform(&encoded).unwrap(), column);
    assert!(matches!(
        loaded.transform(&Column::ordered(&["unknown"], &["unknown"])),
        Err(MonoError::UnknownCategory { .. })
    ));
}

#[test]
fn single_category_is_degenerate() {
    let frame = DataFrame::new()
        .with_column("y", Column::Numeric(vec![1.0, 2.0]))
        .unwrap()
        .with_column("x", Column::ordered(&["only"], &["only", "only"]))
        .unwrap();
    assert!(matches!(
        ModelBuilder::new("y").monotonic("x").build(&frame),
        Err(MonoError::DegenerateCategory { .. })
    ));
}

#[test]
fn cmdstan_chains_to_conditional_effects() {
    let model = ModelBuilder::new("ls").monotonic("income").build(&income_frame()).unwrap();

    let chain_1 = "\
# model = income
lp__,accept_stat__,stepsize__,b_Intercept,b_income,simplex_income.1,simplex_income.2,simplex_income.3,sigma
-5.1,0.9,0.3,30,10,0.7,0.2,0.1,2
-5.3,0.8,0.3,30,10,0.7,0.2,0.1,2
";
    let chain_2 = "\
# model = income
lp__,accept_stat__,stepsize__,b_Intercept,b_income,simplex_income.1,simplex_income.2,simplex_income.3,sigma
-5.0,0.9,0.3,30,30,0.5,0.3,0.2,2
-5.2,0.7,0.3,30,30,0.5,0.3,0.2,2
";
    let dir = std::env::temp_dir();
    let paths = [
        dir.join("end_to_end_income_1.csv"),
        dir.join("end_to_end_income_2.csv"),
    ];
    std::fs::write(&paths[0], chain_1).unwrap();
    std::fs::write(&paths[1], chain_2).unwrap();
    let draws = PosteriorDraws::from_cmdstan_files(&paths).unwrap();
    for path in &paths {
        std::fs::remove_file(path).ok();
    }
    assert_eq!(draws.n_chains(), 2);

    let fit = FittedModel::new(model, draws).unwrap();
    let effects = fit.conditional_effects("income").unwrap();
    // chain 1: 7, 9, 10, 10; chain 2: 15, 24, 30, 30
    let expected = [11.0, 16.5, 20.0, 20.0];
    for (effect, want) in effects.iter().zip(expected.iter()) {
        assert!((effect.mean - want).abs() < 1e-9, "{}: {}", effect.label, effect.mean);
        assert!(effect.lower <= effect.mean && effect.mean <= effect.upper);
    }

    let summary = fit.summary().unwrap();
    assert_eq!(summary.n_chains, 2);
    assert!((summary.get("b_income").unwrap().mean - 20.0).abs() < 1e-9);
    assert!(summary.get("lp__").is_none());
}

#[test]
fn poisson_model_from_json_config() {
    let config = ModelConfig::from_json_str(r#"{ "family": "poisson", "interval": 0.9 }"#).unwrap();
    assert_eq!(config.family, Family::Poisson);

    let frame = DataFrame::new()
        .with_column("count", Column::Integer(vec![0, 2, 3, 7]))
        .unwrap()
        .with_column("dose", Column::Integer(vec![1, 2, 3, 3]))
        .unwrap();
    let model = ModelBuilder::new("count")
        .with_config(config)
        .monotonic("dose")
        .build(&frame)
        .unwrap();
    assert_eq!(model.stan_data()["Y"], serde_json::json!([0, 2, 3, 7]));
    assert_eq!(model.stan_data()["X_dose"], serde_json::json!([1, 2, 3, 3]));
    assert!(!model.parameter_names().contains(&"sigma".to_string()));

    let names = model.parameter_names();
    let draw = vec![0.0, 2.0, 0.5, 0.5];
    let draws = PosteriorDraws::from_chains(names, vec![vec![draw.clone(), draw]]).unwrap();
    let fit = FittedModel::new(model, draws).unwrap();

    let new_data = DataFrame::new()
        .with_column("dose", Column::Integer(vec![1, 3]))
        .unwrap();
    let fitted = fit.fitted(&new_data).unwrap();
    assert!((fitted[0].mean - 1.0f64.exp()).abs() < 1e-9);
    assert!((fitted[1].mean - 2.0f64.exp()).abs() < 1e-9);
}

#[test]
fn prior_draws_give_monotonic_contributions() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let prior = DirichletPrior::new(vec![0.5, 1.0, 2.0, 4.0]).unwrap();
    for _ in 0..200 {
        let b: f64 = rng.gen_range(-5.0..5.0);
        let effect = MonotonicEffect::new(b, prior.sample(&mut rng).unwrap()).unwrap();
        let contributions = effect.contributions(&[1, 2, 3, 4, 5]).unwrap();
        for pair in contributions.windows(2) {
            if b >= 0.0 {
                assert!(pair[0] <= pair[1] + 1e-12);
            } else {
                assert!(pair[0] >= pair[1] - 1e-12);
            }
        }
        assert!((contributions[4] - b).abs() < 1e-8);
    }
}
