//! CSV persistence of a generated dataset.

use std::path::{Path, PathBuf};

use serde::Serialize;
use synth::Dataset;
use tracing::info;
use types::Market;

use crate::error::{Result, StorageError};
use crate::layout::DatasetLayout;
use crate::metadata::{DATA_DICTIONARY, generation_log};

/// Serialize rows to a CSV file with a header row taken from the field names.
///
/// Returns the number of data rows written.
pub fn write_rows<'a, T, I>(path: &Path, rows: I) -> Result<usize>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = csv::Writer::from_path(path).map_err(|e| StorageError::csv(path, e))?;
    let mut count = 0;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| StorageError::csv(path, e))?;
        count += 1;
    }
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    Ok(count)
}

/// Files written for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// (path, data rows) in write order.
    pub files: Vec<(PathBuf, usize)>,
}

impl WriteSummary {
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|(_, rows)| rows).sum()
    }
}

/// Writes a [`Dataset`] into a [`DatasetLayout`].
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    layout: DatasetLayout,
}

impl DatasetWriter {
    pub fn new(layout: DatasetLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// Create the directory tree and write every table plus metadata.
    pub fn write(&self, dataset: &Dataset) -> Result<WriteSummary> {
        self.layout.create_dirs()?;
        let mut summary = WriteSummary::default();

        for market in Market::ALL {
            self.table(
                &mut summary,
                self.layout.prices(market),
                dataset.prices_for(market),
            )?;
        }
        self.table(&mut summary, self.layout.global_indices(), &dataset.indices)?;
        self.table(&mut summary, self.layout.fundamentals(), &dataset.fundamentals)?;
        self.table(&mut summary, self.layout.sentiment(), &dataset.sentiment)?;
        self.table(&mut summary, self.layout.volumes(), &dataset.volumes)?;
        self.table(&mut summary, self.layout.macro_series(), &dataset.macro_rows)?;
        self.table(&mut summary, self.layout.data_dictionary(), DATA_DICTIONARY)?;

        let log_path = self.layout.generation_log();
        std::fs::write(&log_path, generation_log(dataset))
            .map_err(|e| StorageError::io(&log_path, e))?;

        info!(
            root = %self.layout.root().display(),
            files = summary.files.len() + 1,
            rows = summary.total_rows(),
            "dataset written"
        );
        Ok(summary)
    }

    fn table<'a, T, I>(&self, summary: &mut WriteSummary, path: PathBuf, rows: I) -> Result<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let count = write_rows(&path, rows)?;
        info!(path = %path.display(), rows = count, "wrote table");
        summary.files.push((path, count));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use types::PriceRow;

    #[test]
    fn test_price_header_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        let rows = vec![PriceRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            market: Market::Nse,
            company: "M&M".to_string(),
            open: 101.5,
            high: 103.25,
            low: 100.0,
            close: 102.75,
        }];
        assert_eq!(write_rows(&path, &rows).unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,market,company,open,high,low,close"));
        assert_eq!(
            lines.next(),
            Some("2024-01-02,NSE,M&M,101.5,103.25,100.0,102.75")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_into_missing_dir_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("x.csv");
        let err = write_rows::<PriceRow, _>(&path, &[]).unwrap_err();
        assert!(err.to_string().contains("x.csv"));
    }
}
