//! Loading tables from files

use std::path::Path;

use anyhow::{Context, Result, bail};
use hisab_core::{TabularResult, Value};

/// Input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Guess from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(InputFormat::Json),
            Some("csv") | Some("txt") => Ok(InputFormat::Csv),
            _ => bail!(
                "cannot tell the input format of {}; use a .json or .csv file",
                path.display()
            ),
        }
    }
}

pub fn load_table(path: &Path) -> Result<TabularResult> {
    let format = InputFormat::from_path(path)?;
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let table = match format {
        InputFormat::Json => TabularResult::from_json_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?,
        InputFormat::Csv => {
            parse_csv(&content).with_context(|| format!("parsing {}", path.display()))?
        }
    };
    tracing::debug!(
        path = %path.display(),
        columns = table.column_count(),
        rows = table.row_count(),
        "Loaded table"
    );
    Ok(table)
}

/// Parse delimited text with a header row.
///
/// A leading byte-order mark is ignored and empty cells become NULL, so the
/// output of `hisab export --format csv` loads back unchanged.
pub fn parse_csv(content: &str) -> Result<TabularResult> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::from(cell)
                    }
                })
                .collect(),
        );
    }
    Ok(TabularResult::new(columns, rows)?)
}
