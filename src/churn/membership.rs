//! Interval membership: who is active at an instant, who left in a window
//!
//! Both rules treat the contract end date as exclusive of presence. A
//! customer whose contract ends on `t` is already gone at `t`, and that
//! churn event belongs to the window `(s, e]` containing `t`. Adjacent
//! half-open periods therefore claim each churn event exactly once.

use super::window::Period;
use crate::error::Result;
use crate::records::ContractRecord;
use chrono::NaiveDate;

impl ContractRecord {
    /// `start <= instant` and the contract has not ended by `instant`
    pub fn is_active_at(&self, instant: NaiveDate) -> bool {
        self.contract_start_date() <= instant
            && self.contract_end_date().map_or(true, |end| end > instant)
    }

    /// End date falls in `(period.start, period.end]`
    pub fn churned_within(&self, period: &Period) -> bool {
        self.contract_end_date()
            .map_or(false, |end| period.start() < end && end <= period.end())
    }
}

/// Whether `record` belongs to the cohort at `instant`
///
/// Records can only be built with a start date, so this cannot fail.
pub fn is_active(record: &ContractRecord, instant: NaiveDate) -> bool {
    record.is_active_at(instant)
}

/// Whether `record` churned within `[start, end)`; fails if `start >= end`
pub fn churned_in_window(record: &ContractRecord, start: NaiveDate, end: NaiveDate) -> Result<bool> {
    let period = Period::new(start, end)?;
    Ok(record.churned_within(&period))
}
