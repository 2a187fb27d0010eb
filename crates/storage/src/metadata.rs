//! Data dictionary and generation log.

use serde::Serialize;
use synth::Dataset;

/// One row of `metadata/data_dictionary.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDoc {
    pub column: &'static str,
    pub description: &'static str,
}

/// Every column that appears in the dataset tables.
pub const DATA_DICTIONARY: &[ColumnDoc] = &[
    ColumnDoc {
        column: "date",
        description: "Trading date (YYYY-MM-DD)",
    },
    ColumnDoc {
        column: "market",
        description: "Exchange of the simulated series (NSE or BSE)",
    },
    ColumnDoc {
        column: "company",
        description: "Company ticker",
    },
    ColumnDoc {
        column: "open",
        description: "Opening price of stock",
    },
    ColumnDoc {
        column: "high",
        description: "Highest price of the day",
    },
    ColumnDoc {
        column: "low",
        description: "Lowest price of the day",
    },
    ColumnDoc {
        column: "close",
        description: "Closing price of stock",
    },
    ColumnDoc {
        column: "index",
        description: "Global index name",
    },
    ColumnDoc {
        column: "value",
        description: "Index level",
    },
    ColumnDoc {
        column: "sector",
        description: "Industry sector of the company",
    },
    ColumnDoc {
        column: "pe_ratio",
        description: "Price to earnings ratio",
    },
    ColumnDoc {
        column: "debt_equity",
        description: "Debt to equity ratio",
    },
    ColumnDoc {
        column: "roe",
        description: "Return on equity percentage",
    },
    ColumnDoc {
        column: "sentiment_score",
        description: "News sentiment score (-1 to 1)",
    },
    ColumnDoc {
        column: "volume",
        description: "Shares traded during the day",
    },
    ColumnDoc {
        column: "inflation",
        description: "Inflation percentage",
    },
    ColumnDoc {
        column: "interest_rate",
        description: "Policy interest rate percentage",
    },
];

/// Text of `logs/generation_log.txt`.
pub fn generation_log(dataset: &Dataset) -> String {
    let mut log = String::from("Stock Market Dataset Generated Successfully\n");
    log.push_str(&format!("seed: {}\n", dataset.seed));
    log.push_str(&format!("frequency: {}\n", dataset.calendar.frequency()));
    match (dataset.calendar.first(), dataset.calendar.last()) {
        (Some(first), Some(last)) => {
            log.push_str(&format!(
                "dates: {first} to {last} ({} days)\n",
                dataset.calendar.len()
            ));
        }
        _ => log.push_str("dates: none\n"),
    }
    for (table, rows) in dataset.row_counts() {
        log.push_str(&format!("{table}: {rows} rows\n"));
    }
    log
}
