//! CSV persistence for the synthetic market dataset.
//!
//! This crate ONLY handles files: directory layout, writing every table, the
//! metadata files, and reading a price table back. No generation logic.

pub mod error;
pub mod layout;
pub mod metadata;
pub mod reader;
pub mod writer;

pub use error::{Result, StorageError};
pub use layout::{DIRECTORIES, DatasetLayout};
pub use metadata::{ColumnDoc, DATA_DICTIONARY, generation_log};
pub use reader::{PriceTable, normalize_company, read_trade_bars};
pub use writer::{DatasetWriter, WriteSummary, write_rows};
