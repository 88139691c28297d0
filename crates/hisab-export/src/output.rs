//! Export formats and rendered payloads

use serde::{Deserialize, Serialize};

/// Output kinds the pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Spreadsheet,
    Pdf,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Spreadsheet,
        ExportFormat::Pdf,
        ExportFormat::Csv,
    ];

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            "pdf" => Ok(ExportFormat::Pdf),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unsupported export format: {}", other)),
        }
    }
}

/// A finished export: bytes, their MIME type and a suggested file name.
///
/// Immutable once produced; the caller owns the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    format: ExportFormat,
    filename: String,
}

impl RenderedDocument {
    pub fn new(bytes: Vec<u8>, format: ExportFormat, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            format,
            filename: filename.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
