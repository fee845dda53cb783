//! Status-based churn rate with no time dimension
//!
//! Kept apart from the interval computation: a customer tagged `churned`
//! here says nothing about when, or whether, a contract end date exists.

use crate::records::StatusRecord;

/// Share of records tagged `churned`, as a percentage of all records
///
/// Returns `0.0` for an empty input. The value is not rounded.
pub fn snapshot_churn_rate(records: &[StatusRecord]) -> f64 {
    let total = records.len();
    if total == 0 {
        return 0.0;
    }
    let churned = records.iter().filter(|r| r.is_churned()).count();
    churned as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn statuses(values: &[&str]) -> Vec<StatusRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, s)| StatusRecord::new(i.to_string(), *s))
            .collect()
    }

    #[test]
    fn test_mixed_case_statuses() {
        let records = statuses(&["churned", "active", "Churned", "active"]);
        assert_relative_eq!(snapshot_churn_rate(&records), 50.0);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(snapshot_churn_rate(&[]), 0.0);
    }

    #[test]
    fn test_all_and_none_churned() {
        assert_relative_eq!(snapshot_churn_rate(&statuses(&["churned", "CHURNED"])), 100.0);
        assert_eq!(snapshot_churn_rate(&statuses(&["active", "suspended", ""])), 0.0);
    }

    #[test]
    fn test_unrounded_fraction() {
        let rate = snapshot_churn_rate(&statuses(&["churned", "active", "active"]));
        assert_relative_eq!(rate, 100.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rate_within_bounds() {
        let pool = ["churned", "active", "Churned", "pending", "CHURNED", "left"];
        for len in 0..=pool.len() {
            for offset in 0..pool.len() {
                let values: Vec<&str> = pool.iter().cycle().skip(offset).take(len).copied().collect();
                let rate = snapshot_churn_rate(&statuses(&values));
                assert!((0.0..=100.0).contains(&rate), "{:?} -> {}", values, rate);
            }
        }
    }
}
