//! Churn rate for a single explicit window

use super::window::Period;
use crate::error::Result;
use crate::records::{ContractRecord, DATE_FORMAT};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Counts and rate for one half-open window `[period_start, period_end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,

    /// Cohort at `period_start`
    pub active_at_start: u64,

    /// Cohort at `period_end`
    pub active_at_end: u64,

    /// Contracts ending in `(period_start, period_end]`, whether or not
    /// they belonged to the starting cohort
    pub churned_count: u64,

    /// `churned_count / active_at_start * 100`, two decimals; `0.0` with no base population
    pub churn_rate: f64,
}

impl PeriodResult {
    pub fn period(&self) -> Result<Period> {
        Period::new(self.period_start, self.period_end)
    }

    /// `"YYYY-MM-DD to YYYY-MM-DD"`
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.period_start.format(DATE_FORMAT),
            self.period_end.format(DATE_FORMAT)
        )
    }

    /// No customers were active when the window opened
    pub fn has_empty_base(&self) -> bool {
        self.active_at_start == 0
    }
}

/// Percentage rounded to two decimal places, exact halves to even
pub(crate) fn churn_percentage(churned: u64, base: u64) -> f64 {
    if base == 0 {
        return 0.0;
    }
    let rate = churned as f64 / base as f64 * 100.0;
    (rate * 100.0).round_ties_even() / 100.0
}

/// Single pass over `records` for an already validated window
pub fn compute_for(records: &[ContractRecord], period: &Period) -> PeriodResult {
    let mut active_at_start = 0u64;
    let mut active_at_end = 0u64;
    let mut churned_count = 0u64;

    for record in records {
        if record.is_active_at(period.start()) {
            active_at_start += 1;
        }
        if record.is_active_at(period.end()) {
            active_at_end += 1;
        }
        if record.churned_within(period) {
            churned_count += 1;
        }
    }

    let result = PeriodResult {
        period_start: period.start(),
        period_end: period.end(),
        active_at_start,
        active_at_end,
        churned_count,
        churn_rate: churn_percentage(churned_count, active_at_start),
    };

    debug!(
        "{}: start={} end={} churned={} rate={:.2}%",
        period.label(),
        result.active_at_start,
        result.active_at_end,
        result.churned_count,
        result.churn_rate
    );

    result
}

/// Churn result for `[start, end)`; fails with invalid input if `start >= end`
pub fn compute_period(records: &[ContractRecord], start: NaiveDate, end: NaiveDate) -> Result<PeriodResult> {
    let period = Period::new(start, end)?;
    Ok(compute_for(records, &period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChurnError;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(id: &str, start: NaiveDate, end: Option<NaiveDate>) -> ContractRecord {
        ContractRecord::new(id, start, end).unwrap()
    }

    fn two_customers() -> Vec<ContractRecord> {
        vec![
            record("1", d(2023, 1, 10), Some(d(2023, 3, 15))),
            record("2", d(2022, 6, 1), None),
        ]
    }

    #[test]
    fn test_january_window() {
        let result = compute_period(&two_customers(), d(2023, 1, 1), d(2023, 2, 1)).unwrap();
        assert_eq!(result.active_at_start, 1);
        assert_eq!(result.active_at_end, 2);
        assert_eq!(result.churned_count, 0);
        assert_eq!(result.churn_rate, 0.0);
    }

    #[test]
    fn test_march_window() {
        let result = compute_period(&two_customers(), d(2023, 3, 1), d(2023, 4, 1)).unwrap();
        assert_eq!(result.active_at_start, 2);
        assert_eq!(result.active_at_end, 1);
        assert_eq!(result.churned_count, 1);
        assert_relative_eq!(result.churn_rate, 50.0);
    }

    #[test]
    fn test_empty_records() {
        let result = compute_period(&[], d(2023, 1, 1), d(2023, 2, 1)).unwrap();
        assert_eq!(result.active_at_start, 0);
        assert_eq!(result.active_at_end, 0);
        assert_eq!(result.churned_count, 0);
        assert_eq!(result.churn_rate, 0.0);
        assert!(result.has_empty_base());
    }

    #[test]
    fn test_empty_base_is_zero_rate_not_error() {
        // Joined and left inside the window: churned, but no starting cohort
        let records = vec![record("1", d(2023, 4, 2), Some(d(2023, 4, 28)))];
        let result = compute_period(&records, d(2023, 4, 1), d(2023, 5, 1)).unwrap();
        assert_eq!(result.active_at_start, 0);
        assert_eq!(result.churned_count, 1);
        assert_eq!(result.churn_rate, 0.0);
    }

    #[test]
    fn test_joiners_churn_not_capped_by_cohort() {
        let records = vec![
            record("1", d(2022, 1, 1), Some(d(2023, 4, 10))),
            record("2", d(2023, 4, 2), Some(d(2023, 4, 28))),
            record("3", d(2022, 1, 1), None),
        ];
        let result = compute_period(&records, d(2023, 4, 1), d(2023, 5, 1)).unwrap();
        assert_eq!(result.active_at_start, 2);
        assert_eq!(result.churned_count, 2);
        assert_relative_eq!(result.churn_rate, 100.0);
    }

    #[test]
    fn test_rate_rounded_to_two_decimals() {
        let mut records = vec![record("gone", d(2022, 1, 1), Some(d(2023, 1, 15)))];
        for i in 0..2 {
            records.push(record(&format!("stay{}", i), d(2022, 1, 1), None));
        }
        let result = compute_period(&records, d(2023, 1, 1), d(2023, 2, 1)).unwrap();
        assert_eq!(result.churn_rate, 33.33);
    }

    #[test]
    fn test_rate_halves_round_to_even() {
        assert_eq!(churn_percentage(1, 800), 0.12);
        assert_eq!(churn_percentage(3, 800), 0.38);
        assert_eq!(churn_percentage(5, 800), 0.62);
        assert_eq!(churn_percentage(1, 8), 12.5);

        let mut records = vec![record("gone", d(2022, 1, 1), Some(d(2023, 1, 15)))];
        for i in 0..799 {
            records.push(record(&format!("stay{}", i), d(2022, 1, 1), None));
        }
        let result = compute_period(&records, d(2023, 1, 1), d(2023, 2, 1)).unwrap();
        assert_eq!(result.active_at_start, 800);
        assert_eq!(result.churn_rate, 0.12);
    }

    #[test]
    fn test_invalid_window() {
        let records = two_customers();
        assert!(matches!(
            compute_period(&records, d(2023, 2, 1), d(2023, 2, 1)),
            Err(ChurnError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_period(&records, d(2023, 3, 1), d(2023, 2, 1)),
            Err(ChurnError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_order_independent() {
        let records = vec![
            record("1", d(2022, 1, 1), Some(d(2023, 2, 10))),
            record("2", d(2023, 2, 2), Some(d(2023, 2, 20))),
            record("3", d(2021, 5, 1), None),
            record("4", d(2023, 1, 31), Some(d(2023, 3, 1))),
            record("5", d(2022, 7, 1), Some(d(2023, 2, 1))),
        ];
        let expected = compute_period(&records, d(2023, 2, 1), d(2023, 3, 1)).unwrap();

        let mut permuted = records.clone();
        for shift in 1..permuted.len() {
            permuted.rotate_left(1);
            assert_eq!(compute_period(&permuted, d(2023, 2, 1), d(2023, 3, 1)).unwrap(), expected, "shift {}", shift);
        }
        permuted.reverse();
        assert_eq!(compute_period(&permuted, d(2023, 2, 1), d(2023, 3, 1)).unwrap(), expected);
    }

    #[test]
    fn test_churn_monotone_in_window_end() {
        let records = vec![
            record("1", d(2022, 1, 1), Some(d(2023, 1, 5))),
            record("2", d(2022, 1, 1), Some(d(2023, 2, 1))),
            record("3", d(2022, 1, 1), Some(d(2023, 6, 30))),
            record("4", d(2023, 3, 1), Some(d(2023, 3, 2))),
            record("5", d(2022, 1, 1), None),
        ];
        let start = d(2023, 1, 1);
        let mut previous = 0;
        let mut end = start.succ_opt().unwrap();
        while end <= d(2024, 1, 1) {
            let churned = compute_period(&records, start, end).unwrap().churned_count;
            assert!(churned >= previous, "churn decreased at {}", end);
            previous = churned;
            end = end.succ_opt().unwrap();
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn test_label_and_period() {
        let result = compute_period(&[], d(2023, 3, 1), d(2023, 4, 1)).unwrap();
        assert_eq!(result.label(), "2023-03-01 to 2023-04-01");
        assert_eq!(result.period().unwrap(), Period::month(2023, 3).unwrap());
    }
}
