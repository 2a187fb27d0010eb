//! Deterministic random streams.
//!
//! A [`RandomSource`] holds only the master seed. Each logical entity stream
//! (one price walk, one index, one company's sentiment...) gets its own
//! [`ChaCha8Rng`] keyed by a label, so the draws an entity sees never depend on
//! which other entities were walked first or on which thread.

use rand::distr::uniform::SampleUniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use catalog::ValueRange;
use types::Market;

use crate::error::{Result, SynthError};

/// Random generator type used by every walk.
pub type StreamRng = ChaCha8Rng;

// =============================================================================
// StreamKey
// =============================================================================

/// Identity of one independent draw sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamKey<'a> {
    Price { market: Market, company: &'a str },
    Index(&'a str),
    Fundamentals(&'a str),
    Sentiment(&'a str),
    Volume(&'a str),
    Macro,
}

impl StreamKey<'_> {
    /// Stable label, e.g. `price/NSE/TCS`.
    pub fn label(&self) -> String {
        match self {
            StreamKey::Price { market, company } => format!("price/{market}/{company}"),
            StreamKey::Index(name) => format!("index/{name}"),
            StreamKey::Fundamentals(company) => format!("fundamentals/{company}"),
            StreamKey::Sentiment(company) => format!("sentiment/{company}"),
            StreamKey::Volume(company) => format!("volume/{company}"),
            StreamKey::Macro => "macro".to_string(),
        }
    }
}

// =============================================================================
// RandomSource
// =============================================================================

/// Master seed plus the rule for deriving per-entity streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSource {
    seed: u64,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fresh generator for `key`. Calling twice with the same key yields the
    /// same sequence.
    pub fn stream(&self, key: &StreamKey<'_>) -> StreamRng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(fnv1a(key.label().as_bytes()));
        rng
    }
}

/// FNV-1a, 64 bit. Stable across platforms and releases, unlike
/// `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

// =============================================================================
// Sampling helpers
// =============================================================================

/// Uniform draw from an inclusive range. A degenerate range returns its bound.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, range: ValueRange) -> f64 {
    sample_inclusive(rng, range.low, range.high)
}

#[inline]
pub(crate) fn sample_inclusive<R, T>(rng: &mut R, low: T, high: T) -> T
where
    R: Rng + ?Sized,
    T: SampleUniform + PartialOrd,
{
    rng.random_range(low..=high)
}

/// Zero-mean normal with the given standard deviation.
pub fn centered_normal(what: impl Into<String>, std_dev: f64) -> Result<Normal<f64>> {
    let what = what.into();
    Normal::new(0.0, std_dev).map_err(|e| SynthError::distribution(what, e))
}
