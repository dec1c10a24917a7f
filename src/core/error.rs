//! Error types for Strikewise
//!
//! Only whole-request failures surface here. Per-strike numerical problems are
//! carried as `None` fields on the projection rows instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrikewiseError {
    #[error("Data error: {0}")]
    Data(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type StrikewiseResult<T> = Result<T, StrikewiseError>;

impl StrikewiseError {
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<serde_json::Error> for StrikewiseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<csv::Error> for StrikewiseError {
    fn from(e: csv::Error) -> Self {
        Self::Export(e.to_string())
    }
}
