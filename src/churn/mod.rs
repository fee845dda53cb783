//! Churn computation over contract records
//!
//! - [`membership`]: cohort membership at an instant and churn events in a window
//! - [`period`]: counts and rate for one half-open window
//! - [`series`]: monthly, quarterly and yearly series built from independent windows
//! - [`snapshot`]: status-based rate, unrelated to contract dates

mod window;
pub mod membership;
pub mod period;
pub mod series;
pub mod snapshot;

pub use window::Period;
pub use membership::{is_active, churned_in_window};
pub use period::{compute_period, compute_for, PeriodResult};
pub use series::{
    monthly_series, quarterly_series, yearly_series, Granularity, SeriesAggregator, SeriesConfig,
    SeriesPoint, SeriesResult,
};
pub use snapshot::snapshot_churn_rate;
