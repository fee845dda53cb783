//! Error type shared by the record store and the churn core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChurnError {
    /// Malformed or missing dates, inverted intervals, inconsistent records
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChurnError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ChurnError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ChurnError>;
