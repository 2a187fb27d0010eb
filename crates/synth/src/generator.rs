//! Common seam for the table generators.

use crate::calendar::Calendar;
use crate::error::Result;
use crate::random::RandomSource;

/// Shared, read-only inputs of one generation run.
#[derive(Debug, Clone, Copy)]
pub struct WalkContext<'a> {
    pub calendar: &'a Calendar,
    pub source: RandomSource,
    /// Walk entities one after another even when rayon is available.
    pub force_sequential: bool,
}

impl<'a> WalkContext<'a> {
    pub fn new(calendar: &'a Calendar, source: RandomSource) -> Self {
        Self {
            calendar,
            source,
            force_sequential: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.force_sequential = !parallel;
        self
    }
}

/// A generator producing one flat output table.
///
/// Implementations own no mutable state: every call to [`generate`] derives
/// fresh streams from the context, so repeated calls return identical rows.
///
/// [`generate`]: TableGenerator::generate
pub trait TableGenerator {
    type Row;

    /// Table name used in logs.
    fn table(&self) -> &'static str;

    fn generate(&self, ctx: &WalkContext<'_>) -> Result<Vec<Self::Row>>;
}
