//! Dataset directory layout.
//!
//! ```text
//! <root>/
//!   raw_data/nse_prices.csv
//!   raw_data/bse_prices.csv
//!   raw_data/global_indices.csv
//!   company_data/company_fundamentals.csv
//!   news_sentiment/daily_sentiment.csv
//!   trading_data/volumes.csv
//!   macro_data/inflation_interest.csv
//!   metadata/data_dictionary.csv
//!   logs/generation_log.txt
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;
use types::Market;

use crate::error::{Result, StorageError};

/// Subdirectories created under the dataset root.
pub const DIRECTORIES: [&str; 7] = [
    "raw_data",
    "company_data",
    "macro_data",
    "news_sentiment",
    "trading_data",
    "metadata",
    "logs",
];

/// Paths of every file in a dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and all subdirectories. Existing directories are kept.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in DIRECTORIES {
            let path = self.root.join(dir);
            std::fs::create_dir_all(&path).map_err(|e| StorageError::io(&path, e))?;
        }
        debug!(root = %self.root.display(), "dataset directories ready");
        Ok(())
    }

    pub fn prices(&self, market: Market) -> PathBuf {
        let file = match market {
            Market::Nse => "nse_prices.csv",
            Market::Bse => "bse_prices.csv",
        };
        self.root.join("raw_data").join(file)
    }

    pub fn global_indices(&self) -> PathBuf {
        self.root.join("raw_data").join("global_indices.csv")
    }

    pub fn fundamentals(&self) -> PathBuf {
        self.root.join("company_data").join("company_fundamentals.csv")
    }

    pub fn sentiment(&self) -> PathBuf {
        self.root.join("news_sentiment").join("daily_sentiment.csv")
    }

    pub fn volumes(&self) -> PathBuf {
        self.root.join("trading_data").join("volumes.csv")
    }

    pub fn macro_series(&self) -> PathBuf {
        self.root.join("macro_data").join("inflation_interest.csv")
    }

    pub fn data_dictionary(&self) -> PathBuf {
        self.root.join("metadata").join("data_dictionary.csv")
    }

    pub fn generation_log(&self) -> PathBuf {
        self.root.join("logs").join("generation_log.txt")
    }
}
