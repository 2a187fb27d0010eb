//! Least-squares linear regressor.
//!
//! Fits `y = w·x + b` on standardized columns with a small ridge term so that
//! collinear inputs (open/high/low/close move together) still give a unique
//! solution. Constant columns get a zero weight.

use serde::{Deserialize, Serialize};

use crate::PriceModel;
use crate::error::{ModelError, Result};

/// Columns with a spread below this are treated as constant.
const MIN_SPREAD: f64 = 1e-12;
const MIN_PIVOT: f64 = 1e-12;

/// Fitted linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn from_parts(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fit on rows `x` and targets `y`.
    ///
    /// `ridge` is the L2 penalty per sample on standardized weights; `0.0`
    /// gives plain least squares.
    ///
    /// # Errors
    /// Empty or ragged input, a negative or non-finite `ridge`, or a singular
    /// system when `ridge` is zero.
    pub fn fit<R: AsRef<[f64]>>(x: &[R], y: &[f64], ridge: f64) -> Result<Self> {
        let n_features = check_shape(x, y)?;
        if !ridge.is_finite() || ridge < 0.0 {
            return Err(ModelError::config("ridge", format!("{ridge} is not >= 0")));
        }
        let n = x.len() as f64;

        // Column statistics
        let mut means = vec![0.0; n_features];
        for row in x {
            for (m, v) in means.iter_mut().zip(row.as_ref()) {
                *m += v / n;
            }
        }
        let mut spreads = vec![0.0; n_features];
        for row in x {
            for ((s, v), m) in spreads.iter_mut().zip(row.as_ref()).zip(&means) {
                *s += (v - m).powi(2) / n;
            }
        }
        for s in &mut spreads {
            *s = s.sqrt();
        }
        let active: Vec<usize> = (0..n_features)
            .filter(|&j| spreads[j] > MIN_SPREAD)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        // Normal equations on standardized active columns
        let k = active.len();
        let mut gram = vec![vec![0.0; k]; k];
        let mut rhs = vec![0.0; k];
        let mut z = vec![0.0; k];
        for (row, &target) in x.iter().zip(y) {
            let row = row.as_ref();
            for (zi, &j) in z.iter_mut().zip(&active) {
                *zi = (row[j] - means[j]) / spreads[j];
            }
            let centered = target - y_mean;
            for a in 0..k {
                rhs[a] += z[a] * centered;
                for b in a..k {
                    gram[a][b] += z[a] * z[b];
                }
            }
        }
        for a in 0..k {
            gram[a][a] += ridge * n;
            for b in 0..a {
                gram[a][b] = gram[b][a];
            }
        }

        let weights = solve(gram, rhs)?;

        let mut coefficients = vec![0.0; n_features];
        for (&j, w) in active.iter().zip(&weights) {
            coefficients[j] = w / spreads[j];
        }
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&means)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl PriceModel for LinearRegressor {
    /// `w·x + b`. Extra trailing inputs are ignored.
    fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }

    fn name(&self) -> &str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

/// Validate that `x` is non-empty, rectangular and matches `y`; returns the
/// row width.
pub(crate) fn check_shape<R: AsRef<[f64]>>(x: &[R], y: &[f64]) -> Result<usize> {
    if x.is_empty() {
        return Err(ModelError::EmptyTrainingSet { rows: 0 });
    }
    if x.len() != y.len() {
        return Err(ModelError::Shape(format!(
            "{} rows but {} targets",
            x.len(),
            y.len()
        )));
    }
    let width = x[0].as_ref().len();
    if width == 0 {
        return Err(ModelError::Shape("rows have no features".into()));
    }
    if let Some(i) = x.iter().position(|r| r.as_ref().len() != width) {
        return Err(ModelError::Shape(format!(
            "row {i} has {} features, expected {width}",
            x[i].as_ref().len()
        )));
    }
    Ok(width)
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let k = b.len();
    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .ok_or(ModelError::Singular)?;
        if a[pivot][col].abs() < MIN_PIVOT {
            return Err(ModelError::Singular);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..k {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..k {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut out = vec![0.0; k];
    for row in (0..k).rev() {
        let tail: f64 = (row + 1..k).map(|c| a[row][c] * out[c]).sum();
        out[row] = (b[row] - tail) / a[row][row];
    }
    Ok(out)
}
