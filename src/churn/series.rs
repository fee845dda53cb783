//! Churn time series over the months, quarters or years of a calendar
//!
//! Every window is computed independently from the same immutable record
//! slice, so sequential and parallel runs produce identical series.

use super::period::{compute_for, PeriodResult};
use super::window::Period;
use crate::error::{ChurnError, Result};
use crate::records::ContractRecord;
use log::debug;
use rayon::prelude::*;
use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Partition used to build a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    /// Name of the ordinal attached to each point ("month", "quarter", "year")
    pub fn ordinal_name(&self) -> &'static str {
        match self {
            Granularity::Monthly => "month",
            Granularity::Quarterly => "quarter",
            Granularity::Yearly => "year",
        }
    }
}

/// One window of a series, tagged with its ordinal
///
/// The ordinal is the month (1-12), the quarter (1-4) or the calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub ordinal: i32,
    #[serde(flatten)]
    pub result: PeriodResult,
}

/// Chronologically ordered churn results
///
/// Serialized points carry their ordinal under the granularity's name
/// (`month`, `quarter` or `year`) instead of `ordinal`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResult {
    pub granularity: Granularity,
    pub periods: Vec<SeriesPoint>,
}

/// A point serialized with its ordinal keyed by granularity
struct NamedPoint<'a> {
    key: &'static str,
    point: &'a SeriesPoint,
}

impl Serialize for NamedPoint<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let r = &self.point.result;
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry(self.key, &self.point.ordinal)?;
        map.serialize_entry("period_start", &r.period_start)?;
        map.serialize_entry("period_end", &r.period_end)?;
        map.serialize_entry("active_at_start", &r.active_at_start)?;
        map.serialize_entry("active_at_end", &r.active_at_end)?;
        map.serialize_entry("churned_count", &r.churned_count)?;
        map.serialize_entry("churn_rate", &r.churn_rate)?;
        map.end()
    }
}

impl Serialize for SeriesResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let key = self.granularity.ordinal_name();
        let points: Vec<NamedPoint<'_>> = self
            .periods
            .iter()
            .map(|point| NamedPoint { key, point })
            .collect();

        let mut state = serializer.serialize_struct("SeriesResult", 2)?;
        state.serialize_field("granularity", &self.granularity)?;
        state.serialize_field("periods", &points)?;
        state.end()
    }
}

impl SeriesResult {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesPoint> {
        self.periods.iter()
    }

    /// Churn rates in period order, e.g. for a trend chart
    pub fn rates(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.result.churn_rate).collect()
    }

    /// Sum of churn events across all windows
    ///
    /// Windows are contiguous and half-open, so each end date inside the
    /// covered span is counted exactly once.
    pub fn total_churned(&self) -> u64 {
        self.periods.iter().map(|p| p.result.churned_count).sum()
    }

    /// Point for a given month, quarter or year
    pub fn get(&self, ordinal: i32) -> Option<&SeriesPoint> {
        self.periods.iter().find(|p| p.ordinal == ordinal)
    }
}

impl<'a> IntoIterator for &'a SeriesResult {
    type Item = &'a SeriesPoint;
    type IntoIter = std::slice::Iter<'a, SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

/// Configuration for series aggregation
#[derive(Debug, Clone, Default)]
pub struct SeriesConfig {
    /// Compute windows on the rayon thread pool
    pub parallel: bool,
}

/// Drives the period calculator across a partition of the calendar
#[derive(Debug, Clone, Default)]
pub struct SeriesAggregator {
    config: SeriesConfig,
}

impl SeriesAggregator {
    pub fn new(config: SeriesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    /// Twelve calendar months of `year`
    pub fn monthly(&self, records: &[ContractRecord], year: i32) -> Result<SeriesResult> {
        let windows = (1..=12)
            .map(|m| Period::month(year, m).map(|p| (m as i32, p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.aggregate(records, Granularity::Monthly, windows))
    }

    /// Four calendar quarters of `year`
    pub fn quarterly(&self, records: &[ContractRecord], year: i32) -> Result<SeriesResult> {
        let windows = (1..=4)
            .map(|q| Period::quarter(year, q).map(|p| (q as i32, p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.aggregate(records, Granularity::Quarterly, windows))
    }

    /// One window per calendar year, `first_year..=last_year`
    pub fn yearly(&self, records: &[ContractRecord], first_year: i32, last_year: i32) -> Result<SeriesResult> {
        if first_year > last_year {
            return Err(ChurnError::invalid(format!(
                "first year {} is after last year {}",
                first_year, last_year
            )));
        }
        let windows = (first_year..=last_year)
            .map(|y| Period::year(y).map(|p| (y, p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.aggregate(records, Granularity::Yearly, windows))
    }

    fn aggregate(
        &self,
        records: &[ContractRecord],
        granularity: Granularity,
        windows: Vec<(i32, Period)>,
    ) -> SeriesResult {
        let compute = |(ordinal, period): (i32, Period)| SeriesPoint {
            ordinal,
            result: compute_for(records, &period),
        };

        let mut periods: Vec<SeriesPoint> = if self.config.parallel {
            windows.into_par_iter().map(compute).collect()
        } else {
            windows.into_iter().map(compute).collect()
        };
        periods.sort_by_key(|p| p.ordinal);

        debug!(
            "{:?} series: {} periods over {} records",
            granularity,
            periods.len(),
            records.len()
        );

        SeriesResult { granularity, periods }
    }
}

/// Monthly churn series for `year`, January through December
pub fn monthly_series(records: &[ContractRecord], year: i32) -> Result<SeriesResult> {
    SeriesAggregator::default().monthly(records, year)
}

/// Quarterly churn series for `year`, Q1 through Q4
pub fn quarterly_series(records: &[ContractRecord], year: i32) -> Result<SeriesResult> {
    SeriesAggregator::default().quarterly(records, year)
}

/// Yearly churn series over `first_year..=last_year`
pub fn yearly_series(records: &[ContractRecord], first_year: i32, last_year: i32) -> Result<SeriesResult> {
    SeriesAggregator::default().yearly(records, first_year, last_year)
}
