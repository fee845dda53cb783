//! Churn Calculator - customer churn rates for electricity and gas contract books
//!
//! This library provides:
//! - Validated loading of customer contract records from CSV
//! - Cohort membership and churn events over half-open date windows
//! - Period churn rates for any custom `[start, end)` range
//! - Monthly, quarterly and yearly churn series
//! - The status-based snapshot churn rate

pub mod error;
pub mod records;
pub mod churn;
pub mod analyzer;

// Re-export commonly used types
pub use error::{ChurnError, Result};
pub use records::{ContractRecord, StatusRecord};
pub use churn::{
    compute_period, monthly_series, quarterly_series, snapshot_churn_rate, yearly_series, Period,
    PeriodResult, SeriesResult,
};
pub use analyzer::ChurnAnalyzer;
