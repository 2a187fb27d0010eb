//! Command-line configuration.
//!
//! Every flag has a `MARKET_*` environment fallback. Flags left unset keep
//! the library defaults ([`GeneratorConfig::default`], [`TrainConfig::default`]).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use catalog::Catalog;
use chrono::NaiveDate;
use clap::Args;
use features::Quote;
use model::{ModelKind, TrainConfig};
use server::ServerConfig;
use storage::DatasetLayout;
use synth::{Frequency, GeneratorConfig};
use types::Market;

/// Dataset root when `--out` is not given.
pub const DEFAULT_OUT_DIR: &str = "stock_market_dataset";
/// Model artifact when `--model` is not given.
pub const DEFAULT_MODEL_PATH: &str = "model/next_close.json";

// ─────────────────────────────────────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Dataset root directory
    #[arg(long, env = "MARKET_OUT", default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// Master random seed
    #[arg(long, env = "MARKET_SEED")]
    pub seed: Option<u64>,

    /// First calendar date (YYYY-MM-DD)
    #[arg(long, env = "MARKET_START")]
    pub start: Option<NaiveDate>,

    /// Last calendar date (YYYY-MM-DD)
    #[arg(long, env = "MARKET_END")]
    pub end: Option<NaiveDate>,

    /// Calendar frequency: business or daily
    #[arg(long, env = "MARKET_FREQUENCY")]
    pub frequency: Option<Frequency>,

    /// JSON catalog overriding the built-in NSE universe
    #[arg(long, env = "MARKET_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Walk entities on the rayon pool
    #[arg(long, env = "MARKET_PARALLEL")]
    pub parallel: bool,
}

impl GenerateArgs {
    pub fn generator_config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default().with_parallel(self.parallel);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(frequency) = self.frequency {
            config = config.with_frequency(frequency);
        }
        let start = self.start.unwrap_or(config.start);
        let end = self.end.unwrap_or(config.end);
        config.with_range(start, end)
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("loading catalog {}", path.display())),
            None => Catalog::nse_default().context("building the default catalog"),
        }
    }

    pub fn layout(&self) -> DatasetLayout {
        DatasetLayout::new(&self.out)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Model paths
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct ModelPaths {
    /// Price CSV to train on or serve from [default: NSE prices under --out]
    #[arg(long, env = "MARKET_PRICES")]
    pub prices: Option<PathBuf>,

    /// Dataset root used when --prices is not given
    #[arg(long, env = "MARKET_OUT", default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// Model artifact (JSON)
    #[arg(long, env = "MARKET_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,
}

impl ModelPaths {
    pub fn prices_path(&self) -> PathBuf {
        self.prices
            .clone()
            .unwrap_or_else(|| DatasetLayout::new(&self.out).prices(Market::Nse))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Training
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub paths: ModelPaths,

    /// Regressor: random_forest or linear
    #[arg(long, env = "MARKET_MODEL_KIND", default_value = "random_forest")]
    pub kind: ModelKind,

    /// Trailing share of samples held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Number of trees in the forest
    #[arg(long)]
    pub trees: Option<usize>,

    /// Maximum tree depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Forest bootstrap seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Grow trees one at a time
    #[arg(long)]
    pub sequential: bool,
}

impl TrainArgs {
    pub fn train_config(&self) -> TrainConfig {
        let mut forest = TrainConfig::default().forest;
        if let Some(trees) = self.trees {
            forest = forest.with_trees(trees);
        }
        if let Some(depth) = self.max_depth {
            forest = forest.with_max_depth(depth);
        }
        if let Some(seed) = self.seed {
            forest = forest.with_seed(seed);
        }
        TrainConfig::default()
            .with_kind(self.kind)
            .with_test_fraction(self.test_fraction)
            .with_forest(forest)
            .with_parallel(!self.sequential)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Prediction
// ─────────────────────────────────────────────────────────────────────────────

/// Optional caller-supplied bar; all four values or none.
#[derive(Args, Debug, Clone, Default)]
pub struct QuoteArgs {
    #[arg(long)]
    pub open: Option<f64>,
    #[arg(long)]
    pub high: Option<f64>,
    #[arg(long)]
    pub low: Option<f64>,
    #[arg(long)]
    pub close: Option<f64>,
}

impl QuoteArgs {
    pub fn quote(&self) -> Result<Option<Quote>> {
        match (self.open, self.high, self.low, self.close) {
            (Some(open), Some(high), Some(low), Some(close)) => Ok(Some(Quote {
                open,
                high,
                low,
                close,
            })),
            (None, None, None, None) => Ok(None),
            _ => bail!("--open, --high, --low and --close must be given together"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serving
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "MARKET_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "MARKET_PORT", default_value_t = 8000)]
    pub port: u16,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}
