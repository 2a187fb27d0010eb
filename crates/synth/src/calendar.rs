//! Trading calendar shared by every generator.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::Frequency;

/// Ordered dates in `[start, end]` at a given frequency.
///
/// Every time-series table is joined on this sequence; the position of a date
/// in it is the day index `i` used by the cyclical terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    dates: Vec<NaiveDate>,
    frequency: Frequency,
}

impl Calendar {
    /// Build the calendar. An inverted range yields an empty calendar;
    /// [`GeneratorConfig::validate`](crate::GeneratorConfig::validate) rejects
    /// that case before generation.
    pub fn new(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Self {
        let dates = if start > end {
            Vec::new()
        } else {
            start
                .iter_days()
                .take_while(|d| *d <= end)
                .filter(|d| match frequency {
                    Frequency::Business => is_business_day(*d),
                    Frequency::Daily => true,
                })
                .collect()
        };
        Self { dates, frequency }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Monday to Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
