//! Replays the documented recurrences draw by draw and compares them with
//! generator output.
//!
//! Each test rebuilds the entity's stream from the same seed and label, then
//! runs the recurrence by hand with plain `rand`/`rand_distr` calls in the
//! documented draw order.

use std::collections::BTreeMap;

use catalog::{Catalog, CatalogConfig};
use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use synth::{DatasetGenerator, GeneratorConfig, RandomSource, StreamKey};
use types::{Market, Sector, round_dp};

const SEED: u64 = 2024;

/// One IT company, no indices, no overrides, no tier lists.
fn single_company_catalog() -> Catalog {
    let defaults = CatalogConfig::default();
    let config = CatalogConfig {
        companies: vec!["ACME".to_string()],
        company_sectors: BTreeMap::from([("ACME".to_string(), Sector::It)]),
        sectors: defaults.sectors,
        indices: Vec::new(),
        sentiment_overrides: BTreeMap::new(),
        sentiment_bias_range: defaults.sentiment_bias_range,
        large_caps: Vec::new(),
        mid_caps: Vec::new(),
        tier_volumes: defaults.tier_volumes,
    };
    Catalog::load(config).unwrap()
}

/// Monday 2024-01-01 through Wednesday 2024-01-03.
fn three_day_config() -> GeneratorConfig {
    GeneratorConfig::default()
        .with_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .with_seed(SEED)
}

fn close_to(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_price_walk_matches_hand_trace() {
    let catalog = single_company_catalog();
    let config = three_day_config();
    let dataset = DatasetGenerator::new(&catalog, &config)
        .unwrap()
        .generate()
        .unwrap();

    let rows: Vec<_> = dataset.prices_for(Market::Nse).collect();
    assert_eq!(rows.len(), 3);

    // IT: sigma 0.015, growth 0.14
    let sigma = 0.015;
    let daily_growth = 0.14 / 252.0;
    let shock = Normal::new(0.0, sigma).unwrap();

    let mut rng = RandomSource::new(SEED).stream(&StreamKey::Price {
        market: Market::Nse,
        company: "ACME",
    });
    let mut price: f64 = rng.random_range(100.0..=2500.0);

    for (day, row) in rows.iter().enumerate() {
        let drift = price * daily_growth;
        let e1 = shock.sample(&mut rng);
        let e2 = shock.sample(&mut rng);
        let h: f64 = rng.random_range(1.001..=1.02);
        let l: f64 = rng.random_range(0.98..=0.999);

        let mut open = price + price * e1;
        let mut close = open + price * e2;
        let mut high = open.max(close) * h;
        let mut low = open.min(close) * l;
        open = open.max(5.0);
        close = close.max(5.0);
        high = high.max(open).max(close);
        low = low.min(open).min(close).max(5.0);

        assert_eq!(row.company, "ACME");
        assert_eq!(row.market, Market::Nse);
        assert!(close_to(row.open, round_dp(open, 2)), "day {day} open");
        assert!(close_to(row.high, round_dp(high, 2)), "day {day} high");
        assert!(close_to(row.low, round_dp(low, 2)), "day {day} low");
        assert!(close_to(row.close, round_dp(close, 2)), "day {day} close");

        price = close + drift;
    }
}

#[test]
fn test_macro_walk_matches_hand_trace() {
    let catalog = single_company_catalog();
    let config = three_day_config();
    let dataset = DatasetGenerator::new(&catalog, &config)
        .unwrap()
        .generate()
        .unwrap();

    let inflation_noise = Normal::new(0.0, 0.02).unwrap();
    let rate_noise = Normal::new(0.0, 0.015).unwrap();
    let mut rng = RandomSource::new(SEED).stream(&StreamKey::Macro);
    let (mut inflation, mut rate) = (5.5_f64, 6.5_f64);

    for row in &dataset.macro_rows {
        inflation += inflation_noise.sample(&mut rng);
        rate += rate_noise.sample(&mut rng);
        inflation = inflation.clamp(2.5, 9.0);
        rate = rate.clamp(3.5, 10.0);
        assert!(close_to(row.inflation, round_dp(inflation, 2)));
        assert!(close_to(row.interest_rate, round_dp(rate, 2)));
    }
}

#[test]
fn test_sentiment_matches_hand_trace() {
    let catalog = single_company_catalog();
    let config = three_day_config();
    let dataset = DatasetGenerator::new(&catalog, &config)
        .unwrap()
        .generate()
        .unwrap();

    let mut rng = RandomSource::new(SEED).stream(&StreamKey::Sentiment("ACME"));
    // IT sector bias 0.20, no override: company bias drawn once
    let base_bias = 0.20 + rng.random_range(0.02..=0.10);

    for (i, row) in dataset.sentiment.iter().enumerate() {
        let cycle = 0.15 * (i as f64 / 250.0).sin();
        let noise: f64 = rng.random_range(-0.15..=0.15);
        let spike = if rng.random_bool(0.04) {
            rng.random_range(-0.4..=0.6)
        } else {
            0.0
        };
        let score = (base_bias + cycle + noise + spike).clamp(-1.0, 1.0);
        assert!(close_to(row.sentiment_score, round_dp(score, 3)));
    }
}

#[test]
fn test_volume_matches_hand_trace() {
    let catalog = single_company_catalog();
    let config = three_day_config();
    let dataset = DatasetGenerator::new(&catalog, &config)
        .unwrap()
        .generate()
        .unwrap();

    let mut rng = RandomSource::new(SEED).stream(&StreamKey::Volume("ACME"));
    // Small tier, IT multiplier 1.2
    let base: u64 = rng.random_range(500_000..=2_500_000);

    for (i, row) in dataset.volumes.iter().enumerate() {
        let seasonal = 1.0 + 0.2 * (i as f64 / 200.0).sin();
        let noise: f64 = rng.random_range(0.7..=1.3);
        let spike = if rng.random_bool(0.02) {
            rng.random_range(1.5..=4.0)
        } else {
            1.0
        };
        let expected = (base as f64 * 1.2 * seasonal * noise * spike).floor() as u64;
        assert_eq!(row.volume, expected);
    }
}

#[test]
fn test_fundamentals_match_hand_trace() {
    let catalog = single_company_catalog();
    let config = three_day_config();
    let dataset = DatasetGenerator::new(&catalog, &config)
        .unwrap()
        .generate()
        .unwrap();

    let mut rng = RandomSource::new(SEED).stream(&StreamKey::Fundamentals("ACME"));
    let pe: f64 = rng.random_range(20.0..=45.0);
    let de: f64 = rng.random_range(0.1..=0.8);
    let roe: f64 = rng.random_range(15.0..=30.0);

    let row = &dataset.fundamentals[0];
    assert_eq!(row.sector, Sector::It);
    assert!(close_to(row.pe_ratio, round_dp(pe, 2)));
    assert!(close_to(row.debt_equity, round_dp(de, 2)));
    assert!(close_to(row.roe, round_dp(roe, 2)));
}
