//! Churn analyzer for repeated queries over one loaded book
//!
//! Loads the contract records once, then answers any number of period and
//! series queries without re-reading the source.

use crate::churn::{compute_for, compute_period, Period, PeriodResult, SeriesAggregator, SeriesConfig, SeriesResult};
use crate::error::Result;
use crate::records::{load_contracts, ContractRecord};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::path::Path;

/// Pre-loaded analyzer over an immutable set of contract records
///
/// # Example
/// ```ignore
/// let analyzer = ChurnAnalyzer::from_csv("customers.csv")?;
///
/// let monthly = analyzer.monthly(2023)?;
/// let march = analyzer.period(date(2023, 3, 1), date(2023, 4, 1))?;
/// ```
#[derive(Debug, Clone)]
pub struct ChurnAnalyzer {
    records: Vec<ContractRecord>,
    aggregator: SeriesAggregator,
}

impl ChurnAnalyzer {
    /// Create analyzer over already validated records
    pub fn new(records: Vec<ContractRecord>) -> Self {
        Self {
            records,
            aggregator: SeriesAggregator::default(),
        }
    }

    /// Create analyzer by loading contracts from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(load_contracts(path)?))
    }

    /// Replace the series configuration
    pub fn with_config(mut self, config: SeriesConfig) -> Self {
        self.aggregator = SeriesAggregator::new(config);
        self
    }

    /// Churn result for a custom `[start, end)` window
    pub fn period(&self, start: NaiveDate, end: NaiveDate) -> Result<PeriodResult> {
        compute_period(&self.records, start, end)
    }

    /// Results for several windows, returned in the order given
    pub fn periods(&self, periods: &[Period]) -> Vec<PeriodResult> {
        if self.aggregator.config().parallel {
            periods.par_iter().map(|p| compute_for(&self.records, p)).collect()
        } else {
            periods.iter().map(|p| compute_for(&self.records, p)).collect()
        }
    }

    pub fn monthly(&self, year: i32) -> Result<SeriesResult> {
        self.aggregator.monthly(&self.records, year)
    }

    pub fn quarterly(&self, year: i32) -> Result<SeriesResult> {
        self.aggregator.quarterly(&self.records, year)
    }

    pub fn yearly(&self, first_year: i32, last_year: i32) -> Result<SeriesResult> {
        self.aggregator.yearly(&self.records, first_year, last_year)
    }

    /// Loaded records, for inspection
    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }

    /// Number of customers still without an end date
    pub fn open_contracts(&self) -> usize {
        self.records.iter().filter(|r| r.is_open()).count()
    }
}
