//! Error types for hisab

use thiserror::Error;

/// Core error type for table construction and preparation
#[derive(Error, Debug)]
pub enum HisabError {
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Row {row} has {found} values, expected {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} is missing column: {column}")]
    MissingColumn { row: usize, column: String },

    #[error("Row {row} has unknown column: {column}")]
    UnknownColumn { row: usize, column: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for hisab operations
pub type Result<T> = std::result::Result<T, HisabError>;
