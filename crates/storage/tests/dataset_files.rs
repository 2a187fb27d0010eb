//! Writes a generated dataset to a temporary directory and checks the files.

use catalog::Catalog;
use chrono::NaiveDate;
use storage::{DatasetLayout, DatasetWriter, read_trade_bars};
use synth::{Dataset, DatasetGenerator, GeneratorConfig};
use types::{Market, TradeBar};

fn dataset(seed: u64) -> Dataset {
    let catalog = Catalog::nse_default().unwrap();
    let config = GeneratorConfig::default()
        .with_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        )
        .with_seed(seed);
    DatasetGenerator::new(&catalog, &config)
        .unwrap()
        .generate()
        .unwrap()
}

fn header(path: &std::path::Path) -> String {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string()
}

#[test]
fn test_every_file_written_with_exact_headers() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DatasetLayout::new(dir.path());
    let summary = DatasetWriter::new(layout.clone())
        .write(&dataset(42))
        .unwrap();
    assert_eq!(summary.files.len(), 8);

    let price_header = "date,market,company,open,high,low,close";
    assert_eq!(header(&layout.prices(Market::Nse)), price_header);
    assert_eq!(header(&layout.prices(Market::Bse)), price_header);
    assert_eq!(header(&layout.global_indices()), "date,index,value");
    assert_eq!(
        header(&layout.fundamentals()),
        "company,sector,pe_ratio,debt_equity,roe"
    );
    assert_eq!(header(&layout.sentiment()), "date,company,sentiment_score");
    assert_eq!(header(&layout.volumes()), "date,company,volume");
    assert_eq!(header(&layout.macro_series()), "date,inflation,interest_rate");
    assert_eq!(header(&layout.data_dictionary()), "column,description");

    let log = std::fs::read_to_string(layout.generation_log()).unwrap();
    assert!(log.starts_with("Stock Market Dataset Generated Successfully"));
    assert!(log.contains("seed: 42"));
}

#[test]
fn test_same_seed_byte_identical_files() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let la = DatasetLayout::new(a.path());
    let lb = DatasetLayout::new(b.path());
    DatasetWriter::new(la.clone()).write(&dataset(9)).unwrap();
    DatasetWriter::new(lb.clone()).write(&dataset(9)).unwrap();

    let paths = |l: &DatasetLayout| {
        vec![
            l.prices(Market::Nse),
            l.prices(Market::Bse),
            l.global_indices(),
            l.fundamentals(),
            l.sentiment(),
            l.volumes(),
            l.macro_series(),
            l.generation_log(),
        ]
    };
    for (pa, pb) in paths(&la).into_iter().zip(paths(&lb)) {
        assert_eq!(std::fs::read(&pa).unwrap(), std::fs::read(&pb).unwrap(), "{pa:?}");
    }
}

#[test]
fn test_price_file_reads_back_as_trade_bars() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DatasetLayout::new(dir.path());
    let data = dataset(42);
    DatasetWriter::new(layout.clone()).write(&data).unwrap();

    let table = read_trade_bars(&layout.prices(Market::Nse)).unwrap();
    assert_eq!(table.skipped, 0);

    let expected: Vec<TradeBar> = data.prices_for(Market::Nse).map(TradeBar::from).collect();
    assert_eq!(table.bars, expected);
}
