//! Core types for hisab

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{HisabError, Result};

/// A single cell as delivered by the query layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL / missing value
    Null,
    /// UTF-8 text
    Text(String),
    /// Any numeric value
    Number(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without timezone
    DateTime(NaiveDateTime),
}

impl Value {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// NULL or text that is empty after trimming.
    ///
    /// Blank cells are treated as missing by classification and totals.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as f64 (native numbers only, no text coercion)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The plain text form used by the delimited export and width estimates.
    pub fn to_plain_text(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(v) => write!(f, "{}", v),
            Value::Number(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

/// A row of a tabular result, positionally aligned with its header
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// All values in header order
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// An in-memory query result: ordered unique columns and ordered rows.
///
/// Every row carries exactly one value per column. Row order is kept as
/// supplied; nothing in the export pipeline re-sorts it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularResult {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TabularResult {
    /// Build a result from a header and positional rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        check_unique(&columns)?;
        let expected = columns.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, values)| {
                if values.len() != expected {
                    return Err(HisabError::RowShape {
                        row: idx,
                        expected,
                        found: values.len(),
                    });
                }
                Ok(Row { values })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns, rows })
    }

    /// A header-only result
    pub fn empty(columns: Vec<String>) -> Result<Self> {
        Self::new(columns, Vec::new())
    }

    /// Build a result from name → value records.
    ///
    /// The column order is taken from the first record; every record must
    /// carry exactly the same column set.
    pub fn from_records(records: Vec<IndexMap<String, Value>>) -> Result<Self> {
        let Some(first) = records.first() else {
            return Ok(Self::default());
        };
        let columns: Vec<String> = first.keys().cloned().collect();
        Self::with_columns(columns, records)
    }

    /// Build a result from records using an explicit column order
    pub fn with_columns(
        columns: Vec<String>,
        records: Vec<IndexMap<String, Value>>,
    ) -> Result<Self> {
        check_unique(&columns)?;
        let mut rows = Vec::with_capacity(records.len());
        for (idx, mut record) in records.into_iter().enumerate() {
            let mut values = Vec::with_capacity(columns.len());
            for column in &columns {
                let value = record
                    .shift_remove(column)
                    .ok_or_else(|| HisabError::MissingColumn {
                        row: idx,
                        column: column.clone(),
                    })?;
                values.push(value);
            }
            if let Some(extra) = record.keys().next() {
                return Err(HisabError::UnknownColumn {
                    row: idx,
                    column: extra.clone(),
                });
            }
            rows.push(Row { values });
        }
        Ok(Self { columns, rows })
    }

    /// Parse a JSON table.
    ///
    /// Accepts either `{"columns": [...], "rows": [[...], ...]}` or an array
    /// of objects whose key order (as written in the document) defines the
    /// columns.
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<JsonTable>(json)? {
            JsonTable::Columnar { columns, rows } => {
                let rows = rows
                    .into_iter()
                    .map(|r| r.into_iter().map(Value::from).collect())
                    .collect();
                Self::new(columns, rows)
            }
            JsonTable::Records(records) => {
                let records = records
                    .into_iter()
                    .map(|r| r.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
                    .collect();
                Self::from_records(records)
            }
        }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column by name, or an error naming the missing column
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| HisabError::ColumnNotFound(name.to_string()))
    }

    /// Cell access by row and column index
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Every value of one column, top to bottom
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |r| r.get(column))
    }

    /// A new result keeping only the given columns, in the given order
    pub fn select_columns(&self, indices: &[usize]) -> Self {
        let columns = indices
            .iter()
            .filter_map(|&i| self.columns.get(i).cloned())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                values: indices
                    .iter()
                    .filter_map(|&i| row.get(i).cloned())
                    .collect(),
            })
            .collect();
        Self { columns, rows }
    }

    /// A new result keeping the rows for which `keep` returns true
    pub fn filter_rows(&self, mut keep: impl FnMut(&Row) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// A new result with every cell of one column replaced by `f(cell)`
    pub fn map_column(&self, column: usize, mut f: impl FnMut(&Value) -> Value) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut values = row.values.clone();
                if let Some(cell) = values.get_mut(column) {
                    *cell = f(cell);
                }
                Row { values }
            })
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTable {
    Columnar {
        columns: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<serde_json::Value>>,
    },
    Records(Vec<IndexMap<String, serde_json::Value>>),
}

fn check_unique(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(HisabError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}
