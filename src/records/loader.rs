//! Load customer records from CSV exports
//!
//! A single malformed row fails the whole load, so every count computed
//! afterwards reflects the full declared population.

use super::{ContractRecord, StatusRecord};
use crate::error::{ChurnError, Result};
use csv::{Reader, ReaderBuilder, Trim};
use log::{info, warn};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

const CONTRACT_COLUMNS: [&str; 3] = ["customer_id", "contract_start_date", "contract_end_date"];
const STATUS_COLUMNS: [&str; 2] = ["customer_id", "status"];

/// Raw CSV row for contract exports; extra columns are ignored
#[derive(Debug, serde::Deserialize)]
struct ContractRow {
    customer_id: String,
    contract_start_date: Option<String>,
    contract_end_date: Option<String>,
}

impl ContractRow {
    fn to_record(self, row: usize) -> Result<ContractRecord> {
        ContractRecord::parse(
            self.customer_id.trim(),
            self.contract_start_date.as_deref(),
            self.contract_end_date.as_deref(),
        )
        .map_err(|e| match e {
            ChurnError::InvalidInput(msg) => ChurnError::invalid(format!("row {}: {}", row, msg)),
            other => other,
        })
    }
}

/// Raw CSV row for status exports
#[derive(Debug, serde::Deserialize)]
struct StatusRow {
    customer_id: String,
    status: String,
}

fn csv_reader<R: Read>(reader: R) -> Reader<R> {
    ReaderBuilder::new().trim(Trim::All).from_reader(reader)
}

fn require_columns<R: Read>(reader: &mut Reader<R>, required: &[&str]) -> Result<()> {
    let headers = reader.headers()?;
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ChurnError::invalid(format!(
            "CSV must contain columns {:?}, missing {:?}",
            required, missing
        )))
    }
}

fn warn_on_duplicates<'a>(ids: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    let duplicates = ids.filter(|id| !seen.insert(*id)).count();
    if duplicates > 0 {
        warn!("{} duplicate customer_id values; counts include every row", duplicates);
    }
}

/// Load all contract records from a CSV file
pub fn load_contracts<P: AsRef<Path>>(path: P) -> Result<Vec<ContractRecord>> {
    let path = path.as_ref();
    let records = load_contracts_from_reader(std::fs::File::open(path)?)?;
    info!("Loaded {} contract records from {}", records.len(), path.display());
    Ok(records)
}

/// Load contract records from any reader (e.g., string buffer, network stream)
pub fn load_contracts_from_reader<R: Read>(reader: R) -> Result<Vec<ContractRecord>> {
    let mut csv_reader = csv_reader(reader);
    require_columns(&mut csv_reader, &CONTRACT_COLUMNS)?;

    let mut records = Vec::new();
    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: ContractRow = result?;
        records.push(row.to_record(idx + 1)?);
    }

    warn_on_duplicates(records.iter().map(|r| r.customer_id()));
    Ok(records)
}

/// Load status-tagged records from a CSV file
pub fn load_statuses<P: AsRef<Path>>(path: P) -> Result<Vec<StatusRecord>> {
    let path = path.as_ref();
    let records = load_statuses_from_reader(std::fs::File::open(path)?)?;
    info!("Loaded {} status records from {}", records.len(), path.display());
    Ok(records)
}

/// Load status-tagged records from any reader
pub fn load_statuses_from_reader<R: Read>(reader: R) -> Result<Vec<StatusRecord>> {
    let mut csv_reader = csv_reader(reader);
    require_columns(&mut csv_reader, &STATUS_COLUMNS)?;

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let row: StatusRow = result?;
        records.push(StatusRecord::new(row.customer_id.trim(), row.status));
    }

    warn_on_duplicates(records.iter().map(|r| r.customer_id.as_str()));
    Ok(records)
}
