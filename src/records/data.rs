//! Customer record structures matching the contract export format

use crate::error::{ChurnError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Calendar date format used by contract exports
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Exactly four year digits, two month digits, two day digits
fn has_iso_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Parse a `YYYY-MM-DD` calendar date
///
/// Surrounding whitespace is ignored. Unpadded fields, signed years and
/// dates that do not exist (including `2023-02-30`) are rejected.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    if !has_iso_shape(trimmed) {
        return Err(ChurnError::invalid(format!(
            "malformed date '{}': expected YYYY-MM-DD",
            trimmed
        )));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| ChurnError::invalid(format!("malformed date '{}': {}", trimmed, e)))
}

/// Parse an optional date column, where an empty cell means "no date"
pub fn parse_optional_date(text: Option<&str>) -> Result<Option<NaiveDate>> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

/// A single customer contract
///
/// Construction goes through [`ContractRecord::new`], so every record in
/// the store satisfies `contract_end_date >= contract_start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRecord {
    customer_id: String,
    contract_start_date: NaiveDate,
    /// `None` while the contract is still running
    contract_end_date: Option<NaiveDate>,
}

impl ContractRecord {
    /// Create a validated contract record
    pub fn new(
        customer_id: impl Into<String>,
        contract_start_date: NaiveDate,
        contract_end_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let customer_id = customer_id.into();

        if let Some(end) = contract_end_date {
            if end < contract_start_date {
                return Err(ChurnError::invalid(format!(
                    "customer {}: contract_end_date {} is before contract_start_date {}",
                    customer_id, end, contract_start_date
                )));
            }
        }

        Ok(Self {
            customer_id,
            contract_start_date,
            contract_end_date,
        })
    }

    /// Build a record from raw date text as found in a tabular source
    pub fn parse(customer_id: &str, start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = match start.map(str::trim) {
            Some(s) if !s.is_empty() => parse_date(s)?,
            _ => {
                return Err(ChurnError::invalid(format!(
                    "customer {}: missing contract_start_date",
                    customer_id
                )))
            }
        };
        let end = parse_optional_date(end)?;
        Self::new(customer_id, start, end)
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn contract_start_date(&self) -> NaiveDate {
        self.contract_start_date
    }

    pub fn contract_end_date(&self) -> Option<NaiveDate> {
        self.contract_end_date
    }

    /// True while no end date has been recorded
    pub fn is_open(&self) -> bool {
        self.contract_end_date.is_none()
    }
}

/// A customer tagged with a categorical status, independent of dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub customer_id: String,
    pub status: String,
}

impl StatusRecord {
    pub fn new(customer_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            status: status.into(),
        }
    }

    /// Case-insensitive exact match on the `churned` status
    ///
    /// Padding is not stripped here; the CSV loader trims fields on read.
    pub fn is_churned(&self) -> bool {
        self.status.eq_ignore_ascii_case("churned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        assert_eq!(d("2023-01-10"), NaiveDate::from_ymd_opt(2023, 1, 10).unwrap());
        assert_eq!(d(" 2024-02-29 "), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_malformed() {
        for bad in [
            "",
            "2023-13-01",
            "2023-02-30",
            "10/01/2023",
            "2023-1",
            "yesterday",
            "2023-1-5",
            "+2023-01-05",
            "2023-01-5 ",
            "2023-01-05T00:00",
            "２023-01-05",
        ] {
            let err = parse_date(bad).unwrap_err();
            assert!(matches!(err, ChurnError::InvalidInput(_)), "{} should fail", bad);
        }
    }

    #[test]
    fn test_optional_date_empty_is_none() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("")).unwrap(), None);
        assert_eq!(parse_optional_date(Some("   ")).unwrap(), None);
        assert_eq!(parse_optional_date(Some("2023-03-15")).unwrap(), Some(d("2023-03-15")));
        assert!(parse_optional_date(Some("15-03-2023")).is_err());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = ContractRecord::new("c1", d("2023-05-01"), Some(d("2023-04-30"))).unwrap_err();
        assert!(matches!(err, ChurnError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_length_contract_allowed() {
        let record = ContractRecord::new("c1", d("2023-05-01"), Some(d("2023-05-01"))).unwrap();
        assert!(!record.is_open());
    }

    #[test]
    fn test_parse_requires_start_date() {
        assert!(ContractRecord::parse("c1", None, None).is_err());
        assert!(ContractRecord::parse("c1", Some(" "), None).is_err());

        let record = ContractRecord::parse("c1", Some("2022-06-01"), Some("")).unwrap();
        assert_eq!(record.customer_id(), "c1");
        assert_eq!(record.contract_start_date(), d("2022-06-01"));
        assert!(record.is_open());
    }

    #[test]
    fn test_status_match_is_case_insensitive() {
        assert!(StatusRecord::new("1", "churned").is_churned());
        assert!(StatusRecord::new("2", "Churned").is_churned());
        assert!(StatusRecord::new("3", "CHURNED").is_churned());
        assert!(!StatusRecord::new("6", "churned ").is_churned());
        assert!(!StatusRecord::new("7", " Churned").is_churned());
        assert!(!StatusRecord::new("4", "active").is_churned());
        assert!(!StatusRecord::new("5", "churned-pending").is_churned());
    }
}
