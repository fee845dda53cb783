//! Record store: customer contract data and CSV ingestion

mod data;
pub mod loader;

pub use data::{parse_date, parse_optional_date, ContractRecord, StatusRecord, DATE_FORMAT};
pub use loader::{load_contracts, load_contracts_from_reader, load_statuses, load_statuses_from_reader};
