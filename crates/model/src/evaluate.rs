//! Chronological hold-out split and regression metrics.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Number of leading rows kept for training when the last `test_fraction`
/// of rows is held out. The hold-out size rounds up.
///
/// # Errors
/// `test_fraction` outside `[0, 1)`, or no rows left for training.
pub fn split_point(n: usize, test_fraction: f64) -> Result<usize> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(ModelError::config(
            "test_fraction",
            format!("{test_fraction} is not in [0, 1)"),
        ));
    }
    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_train == 0 {
        return Err(ModelError::EmptyTrainingSet { rows: n });
    }
    Ok(n_train)
}

/// Mean absolute error; `NaN` for empty input.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n as f64
}

/// Coefficient of determination.
///
/// A constant `actual` scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    let mean = actual[..n].iter().sum::<f64>() / n as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual[..n].iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Hold-out evaluation of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub n_train: usize,
    pub n_test: usize,
    pub mae: f64,
    pub r2: f64,
}
