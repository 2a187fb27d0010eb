//! Configuration types for dataset generation.
//!
//! Run-level settings (date range, frequency, seed) plus the fixed shape
//! parameters of each stochastic process. All of it is startup-time
//! configuration; nothing here changes during a run.

use std::fmt;
use std::str::FromStr;

use catalog::ValueRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

// =============================================================================
// Frequency
// =============================================================================

/// Calendar frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Monday through Friday. Holidays are not modeled.
    #[default]
    Business,
    /// Every calendar day.
    Daily,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Business => write!(f, "business"),
            Frequency::Daily => write!(f, "daily"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" | "b" => Ok(Frequency::Business),
            "daily" | "d" => Ok(Frequency::Daily),
            other => Err(format!("unknown frequency {other:?} (expected business or daily)")),
        }
    }
}

// =============================================================================
// PriceModel
// =============================================================================

/// Shape of the OHLC walk shared by every company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceModel {
    /// Range of the first day's starting price.
    pub initial_price: ValueRange,
    /// Lower bound applied to open, close and low.
    pub floor: f64,
    /// Multiplier range applied to max(open, close) for the high.
    pub high_factor: ValueRange,
    /// Multiplier range applied to min(open, close) for the low.
    pub low_factor: ValueRange,
}

impl Default for PriceModel {
    fn default() -> Self {
        Self {
            initial_price: ValueRange::new(100.0, 2500.0),
            floor: 5.0,
            high_factor: ValueRange::new(1.001, 1.02),
            low_factor: ValueRange::new(0.98, 0.999),
        }
    }
}

// =============================================================================
// SentimentModel
// =============================================================================

/// Shape of the daily sentiment score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentModel {
    /// Amplitude of the slow market cycle.
    pub cycle_amplitude: f64,
    /// Divisor of the day index inside the sine.
    pub cycle_period: f64,
    /// Daily uniform noise range.
    pub noise: ValueRange,
    /// Probability of a news spike on any given day.
    pub spike_probability: f64,
    /// Spike magnitude range.
    pub spike: ValueRange,
}

impl Default for SentimentModel {
    fn default() -> Self {
        Self {
            cycle_amplitude: 0.15,
            cycle_period: 250.0,
            noise: ValueRange::new(-0.15, 0.15),
            spike_probability: 0.04,
            spike: ValueRange::new(-0.4, 0.6),
        }
    }
}

// =============================================================================
// VolumeModel
// =============================================================================

/// Shape of the daily traded volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeModel {
    /// Amplitude of the seasonal cycle around 1.0.
    pub seasonal_amplitude: f64,
    /// Divisor of the day index inside the sine.
    pub seasonal_period: f64,
    /// Multiplicative noise range.
    pub noise: ValueRange,
    /// Probability of a volume spike on any given day.
    pub spike_probability: f64,
    /// Spike multiplier range.
    pub spike: ValueRange,
}

impl Default for VolumeModel {
    fn default() -> Self {
        Self {
            seasonal_amplitude: 0.2,
            seasonal_period: 200.0,
            noise: ValueRange::new(0.7, 1.3),
            spike_probability: 0.02,
            spike: ValueRange::new(1.5, 4.0),
        }
    }
}

// =============================================================================
// MacroModel
// =============================================================================

/// A random walk re-clamped into `bounds` after every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedWalk {
    pub start: f64,
    /// Standard deviation of the daily normal increment.
    pub step_std: f64,
    pub bounds: ValueRange,
}

/// The two macro series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroModel {
    pub inflation: BoundedWalk,
    pub interest_rate: BoundedWalk,
}

impl Default for MacroModel {
    fn default() -> Self {
        Self {
            inflation: BoundedWalk {
                start: 5.5,
                step_std: 0.02,
                bounds: ValueRange::new(2.5, 9.0),
            },
            interest_rate: BoundedWalk {
                start: 6.5,
                step_std: 0.015,
                bounds: ValueRange::new(3.5, 10.0),
            },
        }
    }
}

// =============================================================================
// GeneratorConfig
// =============================================================================

/// Top-level configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// First calendar date (inclusive).
    pub start: NaiveDate,
    /// Last calendar date (inclusive).
    pub end: NaiveDate,
    pub frequency: Frequency,
    /// Master seed; every entity stream is derived from it.
    pub seed: u64,
    /// Walk entities on the rayon pool. Output is identical either way.
    pub parallel: bool,

    pub price: PriceModel,
    pub sentiment: SentimentModel,
    pub volume: VolumeModel,
    #[serde(rename = "macro")]
    pub macro_model: MacroModel,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap_or_default(),
            frequency: Frequency::Business,
            seed: 42,
            parallel: false,
            price: PriceModel::default(),
            sentiment: SentimentModel::default(),
            volume: VolumeModel::default(),
            macro_model: MacroModel::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Reject malformed settings before anything is generated.
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(SynthError::config(
                "start",
                format!("{} is after end {}", self.start, self.end),
            ));
        }

        check_range("price.initial_price", &self.price.initial_price)?;
        check_range("price.high_factor", &self.price.high_factor)?;
        check_range("price.low_factor", &self.price.low_factor)?;
        if !self.price.floor.is_finite() || self.price.floor <= 0.0 {
            return Err(SynthError::config("price.floor", "must be positive"));
        }

        check_range("sentiment.noise", &self.sentiment.noise)?;
        check_range("sentiment.spike", &self.sentiment.spike)?;
        check_probability("sentiment.spike_probability", self.sentiment.spike_probability)?;
        check_period("sentiment.cycle_period", self.sentiment.cycle_period)?;

        // Every volume factor stays positive so volume > 0.
        check_positive_range("volume.noise", &self.volume.noise)?;
        check_positive_range("volume.spike", &self.volume.spike)?;
        let amplitude = self.volume.seasonal_amplitude;
        if !(amplitude.is_finite() && (0.0..1.0).contains(&amplitude)) {
            return Err(SynthError::config(
                "volume.seasonal_amplitude",
                format!("{amplitude} must be in [0, 1)"),
            ));
        }
        check_probability("volume.spike_probability", self.volume.spike_probability)?;
        check_period("volume.seasonal_period", self.volume.seasonal_period)?;

        for (field, walk) in [
            ("macro.inflation", &self.macro_model.inflation),
            ("macro.interest_rate", &self.macro_model.interest_rate),
        ] {
            check_range(field, &walk.bounds)?;
            if !walk.step_std.is_finite() || walk.step_std < 0.0 {
                return Err(SynthError::config(field, "step_std must be >= 0"));
            }
            if !walk.start.is_finite() {
                return Err(SynthError::config(field, "start must be finite"));
            }
        }

        Ok(())
    }
}

fn check_range(field: &'static str, range: &ValueRange) -> Result<()> {
    range
        .validate(field)
        .map_err(|e| SynthError::config(field, e.to_string()))
}

fn check_positive_range(field: &'static str, range: &ValueRange) -> Result<()> {
    check_range(field, range)?;
    if range.low > 0.0 {
        Ok(())
    } else {
        Err(SynthError::config(field, format!("low {} must be positive", range.low)))
    }
}

fn check_probability(field: &'static str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SynthError::config(field, format!("{p} is not a probability")))
    }
}

fn check_period(field: &'static str, period: f64) -> Result<()> {
    if period.is_finite() && period > 0.0 {
        Ok(())
    } else {
        Err(SynthError::config(field, format!("{period} must be positive")))
    }
}

// =============================================================================
// Tests
// =============================================================================
