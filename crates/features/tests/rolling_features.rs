//! Hand-checked features: a ten-bar series, short histories and interleaved companies.

use chrono::NaiveDate;
use features::{CompanyEncoder, derive_features};
use types::TradeBar;

const CLOSES: [f64; 10] = [
    100.0, 102.5, 101.0, 104.0, 107.5, 106.0, 108.25, 110.0, 109.5, 112.0,
];

fn series() -> Vec<TradeBar> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    // Reverse input order; derivation sorts by date.
    CLOSES
        .iter()
        .enumerate()
        .rev()
        .map(|(i, &close)| TradeBar {
            company: "TCS".to_string(),
            trade_date: first + chrono::Days::new(i as u64),
            open: close - 0.5,
            high: close + 1.25,
            low: close - 2.0,
            close,
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn close_to(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

#[test]
fn test_lag_and_trailing_means_match_hand_values() {
    let encoder = CompanyEncoder::fit(["TCS"]);
    let table = derive_features(&series(), &encoder);
    let rows = table.rows();
    assert_eq!(rows.len(), 10);

    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.close, CLOSES[i]);

        if i < 1 {
            assert_eq!(row.prev_close, None);
        } else {
            assert_eq!(row.prev_close, Some(CLOSES[i - 1]));
        }

        if i < 4 {
            assert_eq!(row.ma_5, None, "row {i}");
        } else {
            assert!(close_to(row.ma_5, mean(&CLOSES[i - 4..=i])), "row {i}");
        }

        if i < 9 {
            assert_eq!(row.ma_10, None, "row {i}");
        } else {
            assert!(close_to(row.ma_10, mean(&CLOSES)), "row {i}");
        }

        assert!((row.volatility - 3.25).abs() < 1e-9);
    }
}

#[test]
fn test_insufficient_history_counts() {
    let encoder = CompanyEncoder::fit(["TCS"]);
    let table = derive_features(&series(), &encoder);
    let rows = table.rows();

    assert_eq!(rows.iter().filter(|r| r.prev_close.is_none()).count(), 1);
    assert_eq!(rows.iter().filter(|r| r.ma_5.is_none()).count(), 4);
    assert_eq!(rows.iter().filter(|r| r.ma_10.is_none()).count(), 9);

    // Only the last row has full history and it has no next close.
    assert_eq!(rows.iter().filter(|r| r.has_history()).count(), 1);
    assert!(table.training_set().0.is_empty());
}

#[test]
fn test_hand_values_spot_check() {
    let encoder = CompanyEncoder::fit(["TCS"]);
    let table = derive_features(&series(), &encoder);
    let row = &table.rows()[4];
    // (100 + 102.5 + 101 + 104 + 107.5) / 5
    assert!(close_to(row.ma_5, 103.0));
    assert_eq!(row.target, Some(106.0));

    let last = &table.rows()[9];
    assert!(close_to(last.ma_5, (106.0 + 108.25 + 110.0 + 109.5 + 112.0) / 5.0));
    assert!(close_to(last.ma_10, 1060.75 / 10.0));
    assert_eq!(last.target, None);
}

fn bars(company: &str, days: &[u64], base: f64) -> Vec<TradeBar> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    days.iter()
        .map(|&d| TradeBar {
            company: company.to_string(),
            trade_date: first + chrono::Days::new(d),
            open: base + d as f64,
            high: base + d as f64 + 1.0,
            low: base + d as f64 - 1.0,
            close: base + d as f64,
        })
        .collect()
}

#[test]
fn test_short_history_yields_no_complete_rows() {
    let mut input = series();
    let short: Vec<u64> = (0..6).collect();
    input.extend(bars("INFY", &short, 500.0));

    let encoder = CompanyEncoder::fit(["TCS", "INFY"]);
    let table = derive_features(&input, &encoder);

    let infy = table.rows_for("INFY");
    assert_eq!(infy.len(), 6);
    assert!(infy.iter().all(|r| r.ma_10.is_none() && !r.has_history()));
    assert!(infy.iter().all(|r| r.training_sample().is_none()));
    assert!(table.latest_complete("INFY").is_none());
    // The other company is unaffected.
    assert!(table.latest_complete("TCS").is_some());
}

#[test]
fn test_interleaved_companies_with_gap_keep_separate_windows() {
    // INFY trades every day; TCS skips day 5. Input is interleaved by date.
    let all: Vec<u64> = (0..13).collect();
    let gapped: Vec<u64> = all.iter().copied().filter(|&d| d != 5).collect();
    let infy = bars("INFY", &all, 100.0);
    let tcs = bars("TCS", &gapped, 500.0);

    let mut input = Vec::new();
    for day in &all {
        input.extend(infy.iter().filter(|b| b.close == 100.0 + *day as f64).cloned());
        input.extend(tcs.iter().filter(|b| b.close == 500.0 + *day as f64).cloned());
    }

    let encoder = CompanyEncoder::fit(["TCS", "INFY"]);
    let table = derive_features(&input, &encoder);
    assert_eq!(table.companies(), vec!["INFY", "TCS"]);

    let tcs_rows = table.rows_for("TCS");
    assert_eq!(tcs_rows.len(), 12);
    assert!(tcs_rows.iter().all(|r| r.company == "TCS" && r.close >= 500.0));

    // Across the gap the lag and target come from the company's own bars.
    let day6 = &tcs_rows[5];
    assert_eq!(day6.close, 506.0);
    assert_eq!(day6.prev_close, Some(504.0));
    assert_eq!(tcs_rows[4].target, Some(506.0));

    // Tenth TCS bar: days 0..=4 and 6..=10.
    let tenth = &tcs_rows[9];
    assert_eq!(tenth.close, 510.0);
    let own: f64 = gapped[..10].iter().map(|&d| 500.0 + d as f64).sum();
    assert!(close_to(tenth.ma_10, own / 10.0));
    assert!(close_to(tenth.ma_5, (506.0 + 507.0 + 508.0 + 509.0 + 510.0) / 5.0));

    // INFY windows never see TCS closes.
    let infy_rows = table.rows_for("INFY");
    assert_eq!(infy_rows.len(), 13);
    assert!(close_to(infy_rows[9].ma_10, 104.5));
    assert_eq!(infy_rows[0].company_encoded, 0);
    assert_eq!(tcs_rows[0].company_encoded, 1);
}
