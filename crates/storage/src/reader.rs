//! Reading a price table back as trade bars.
//!
//! The reader is lenient in the way downstream consumers need: it accepts
//! either a `date` or a `trade_date` column, normalizes company names, and
//! drops rows whose date or prices do not parse instead of failing the whole
//! file.

use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, warn};
use types::TradeBar;

use crate::error::{Result, StorageError};

/// Date formats accepted in the date column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Parsed price table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    /// Bars in file order.
    pub bars: Vec<TradeBar>,
    /// Rows dropped because a field failed to parse.
    pub skipped: usize,
}

/// Column positions resolved from the header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    company: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str], column: &'static str| {
            find(names).ok_or_else(|| StorageError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })
        };

        Ok(Self {
            date: require(&["trade_date", "date"], "date")?,
            company: require(&["company"], "company")?,
            open: require(&["open"], "open")?,
            high: require(&["high"], "high")?,
            low: require(&["low"], "low")?,
            close: require(&["close"], "close")?,
        })
    }

    fn parse(&self, record: &StringRecord) -> Option<TradeBar> {
        let company = normalize_company(record.get(self.company)?);
        if company.is_empty() {
            return None;
        }
        Some(TradeBar {
            company,
            trade_date: parse_date(record.get(self.date)?)?,
            open: parse_price(record.get(self.open)?)?,
            high: parse_price(record.get(self.high)?)?,
            low: parse_price(record.get(self.low)?)?,
            close: parse_price(record.get(self.close)?)?,
        })
    }
}

/// Trim and uppercase a company name.
pub fn normalize_company(name: &str) -> String {
    name.trim().to_uppercase()
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    // Accept timestamps such as "2024-01-02 00:00:00" by keeping the date part.
    let field = field.split_whitespace().next().unwrap_or(field);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(field, fmt).ok())
}

fn parse_price(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read a price CSV (`date` or `trade_date`, `company`, `open`, `high`,
/// `low`, `close`; other columns ignored).
///
/// # Errors
/// I/O failures and a header missing a required column are errors;
/// unparseable rows are counted in [`PriceTable::skipped`].
pub fn read_trade_bars(path: &Path) -> Result<PriceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| StorageError::csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| StorageError::csv(path, e))?
        .clone();
    let columns = Columns::resolve(&headers, path)?;

    let mut table = PriceTable::default();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(StorageError::csv(path, e)),
            Err(_) => {
                table.skipped += 1;
                continue;
            }
        };
        match columns.parse(&record) {
            Some(bar) => table.bars.push(bar),
            None => table.skipped += 1,
        }
    }

    if table.skipped > 0 {
        warn!(
            path = %path.display(),
            skipped = table.skipped,
            "dropped unparseable price rows"
        );
    }
    debug!(path = %path.display(), bars = table.bars.len(), "price table read");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_reads_generator_layout() {
        let (_dir, path) = write(
            "date,market,company,open,high,low,close\n\
             2024-01-02,NSE,TCS,100.0,102.0,99.0,101.0\n",
        );
        let table = read_trade_bars(&path).unwrap();
        assert_eq!(table.skipped, 0);
        assert_eq!(table.bars.len(), 1);
        let bar = &table.bars[0];
        assert_eq!(bar.company, "TCS");
        assert_eq!(bar.trade_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bar.close, 101.0);
    }

    #[test]
    fn test_reads_trade_date_header_and_normalizes_company() {
        let (_dir, path) = write(
            "company,trade_date,open,high,low,close\n \
             infy ,02-01-2024,10,11,9,10.5\n",
        );
        let table = read_trade_bars(&path).unwrap();
        assert_eq!(table.bars[0].company, "INFY");
        assert_eq!(
            table.bars[0].trade_date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_skips_bad_rows() {
        let (_dir, path) = write(
            "date,company,open,high,low,close\n\
             2024-01-02,TCS,100,102,99,101\n\
             company,company,open,high,low,close\n\
             2024-01-03,TCS,abc,102,99,101\n\
             not-a-date,TCS,100,102,99,101\n\
             2024-01-04,TCS,100,102\n\
             2024-01-05,TCS,100,102,99,101\n",
        );
        let table = read_trade_bars(&path).unwrap();
        assert_eq!(table.bars.len(), 2);
        assert_eq!(table.skipped, 4);
    }

    #[test]
    fn test_missing_column_is_error() {
        let (_dir, path) = write("date,company,open,high,low\n2024-01-02,TCS,1,2,0.5\n");
        assert!(matches!(
            read_trade_bars(&path),
            Err(StorageError::MissingColumn { column: "close", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_trade_bars(&dir.path().join("absent.csv")).is_err());
    }
}
