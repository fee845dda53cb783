//! Half-open calendar windows and the month/quarter/year partitions

use crate::error::{ChurnError, Result};
use crate::records::DATE_FORMAT;
use chrono::NaiveDate;
use serde::Serialize;

/// A half-open interval `[start, end)` of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ChurnError::invalid(format!("date {}-{:02}-01 is out of range", year, month)))
}

/// First day of the month after `month`, rolling December into January of `year + 1`
fn first_of_next_month(year: i32, month: u32) -> Result<NaiveDate> {
    if month == 12 {
        let next = year
            .checked_add(1)
            .ok_or_else(|| ChurnError::invalid(format!("year {} has no successor", year)))?;
        first_of_month(next, 1)
    } else {
        first_of_month(year, month + 1)
    }
}

impl Period {
    /// Create a window; `start` must be strictly before `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(ChurnError::invalid(format!(
                "period start {} must be before period end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Calendar month `month` (1-12) of `year`
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ChurnError::invalid(format!("month {} is not in 1..=12", month)));
        }
        Self::new(first_of_month(year, month)?, first_of_next_month(year, month)?)
    }

    /// Calendar quarter `quarter` (1-4) of `year`, three whole months
    pub fn quarter(year: i32, quarter: u32) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(ChurnError::invalid(format!("quarter {} is not in 1..=4", quarter)));
        }
        let first_month = 3 * quarter - 2;
        let last_month = 3 * quarter;
        Self::new(first_of_month(year, first_month)?, first_of_next_month(year, last_month)?)
    }

    /// Calendar year `[year-01-01, (year+1)-01-01)`
    pub fn year(year: i32) -> Result<Self> {
        Self::new(first_of_month(year, 1)?, first_of_next_month(year, 12)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered by the window
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// `"YYYY-MM-DD to YYYY-MM-DD"`
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}
