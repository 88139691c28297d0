//! Error types for export rendering

use thiserror::Error;

use hisab_core::HisabError;

/// Errors raised while producing an export payload.
///
/// Per-cell conversion problems never surface here; they are recovered by
/// writing the cell as text.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] toml::de::Error),

    #[error("Font error: {0}")]
    Font(String),

    #[error(transparent)]
    Table(#[from] HisabError),
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
