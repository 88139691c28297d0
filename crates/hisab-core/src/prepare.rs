//! Table preparation before display and export
//!
//! These are the row filters and column tidying steps the dashboard applies
//! to a fetched result before handing it to a renderer. They all return a
//! new [`TabularResult`] and never reorder rows.

use chrono::NaiveDate;

use crate::classify::{ColumnKind, classify_columns};
use crate::coerce::{coerce_date, normalize_name};
use crate::naming::ReportKind;
use crate::types::{TabularResult, Value};

/// Column holding the raw-material category
pub const RAW_MATERIAL_COLUMN: &str = "مواد اوليه";
/// Column holding the supplier name
pub const SUPPLIER_COLUMN: &str = "اسم المورد";
/// Selection value meaning "no raw-material filter"
pub const ALL_MATERIALS: &str = "الكل";

/// Drop identifier columns
pub fn hide_identifier_columns(result: &TabularResult) -> TabularResult {
    let kinds = classify_columns(result);
    let keep: Vec<usize> = kinds
        .iter()
        .enumerate()
        .filter(|(_, k)| **k != ColumnKind::Identifier)
        .map(|(i, _)| i)
        .collect();
    result.select_columns(&keep)
}

/// Drop columns in which every value is NULL.
///
/// A header-only result keeps all of its columns.
pub fn drop_empty_columns(result: &TabularResult) -> TabularResult {
    if result.is_empty() {
        return result.clone();
    }
    let keep: Vec<usize> = (0..result.column_count())
        .filter(|&i| result.column_values(i).any(|v| !v.is_null()))
        .collect();
    result.select_columns(&keep)
}

/// Put the report kind's preferred columns first, in their listed order,
/// followed by the remaining columns in their original order.
pub fn reorder_columns(result: &TabularResult, kind: ReportKind) -> TabularResult {
    let preferred = kind.preferred_columns();
    let mut order: Vec<usize> = preferred
        .iter()
        .filter_map(|name| result.column_index(name))
        .collect();
    for idx in 0..result.column_count() {
        if !order.contains(&idx) {
            order.push(idx);
        }
    }
    result.select_columns(&order)
}

/// Hide identifiers, drop all-NULL columns and apply the report kind's
/// column order.
pub fn prepare_for_display(result: &TabularResult, kind: Option<ReportKind>) -> TabularResult {
    let visible = drop_empty_columns(&hide_identifier_columns(result));
    let prepared = match kind {
        Some(kind) => reorder_columns(&visible, kind),
        None => visible,
    };
    tracing::debug!(
        before = result.column_count(),
        after = prepared.column_count(),
        "Prepared columns for display"
    );
    prepared
}

fn is_date_column_name(name: &str) -> bool {
    let normalized = normalize_name(name);
    normalized.contains("تاريخ") || normalized.contains("date")
}

/// Keep rows whose date columns fall within the inclusive bounds.
///
/// Date columns are recognised by name (`تاريخ` or `date`). While a bound is
/// set, a row whose date cell is missing or unparseable is dropped. A result
/// without date columns, or a call without bounds, is returned unchanged.
pub fn apply_date_filter(
    result: &TabularResult,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> TabularResult {
    if from.is_none() && to.is_none() {
        return result.clone();
    }
    let date_columns: Vec<usize> = result
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| is_date_column_name(name))
        .map(|(i, _)| i)
        .collect();
    if date_columns.is_empty() {
        return result.clone();
    }

    result.filter_rows(|row| {
        date_columns.iter().all(|&idx| {
            let Some(date) = row.get(idx).and_then(coerce_date).map(|dt| dt.date()) else {
                return false;
            };
            from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
        })
    })
}

/// Keep rows whose `column` contains `term`, ignoring case.
///
/// An unknown column or an empty term leaves the result unchanged.
pub fn apply_column_search(result: &TabularResult, column: &str, term: &str) -> TabularResult {
    let term = term.trim();
    let Some(idx) = result.column_index(column) else {
        return result.clone();
    };
    if term.is_empty() {
        return result.clone();
    }
    let needle = term.to_lowercase();
    result.filter_rows(|row| {
        row.get(idx)
            .map(|v| v.to_plain_text().to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

/// Keep rows whose `column` equals one of `allowed`.
///
/// An unknown column or an empty `allowed` list leaves the result unchanged.
pub fn retain_values(result: &TabularResult, column: &str, allowed: &[String]) -> TabularResult {
    let Some(idx) = result.column_index(column) else {
        return result.clone();
    };
    if allowed.is_empty() {
        return result.clone();
    }
    result.filter_rows(|row| match row.get(idx) {
        Some(Value::Null) | None => false,
        Some(v) => {
            let text = v.to_plain_text();
            allowed.iter().any(|a| a == &text)
        }
    })
}

/// The dashboard's row filters, applied together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Raw-material category; [`ALL_MATERIALS`] or `None` disables it
    pub raw_material: Option<String>,
    pub suppliers: Vec<String>,
    /// `(column, term)` substring search
    pub search: Option<(String, String)>,
}

impl RowFilters {
    pub fn apply(&self, result: &TabularResult) -> TabularResult {
        let mut out = apply_date_filter(result, self.date_from, self.date_to);
        if let Some(material) = self
            .raw_material
            .as_deref()
            .filter(|m| !m.is_empty() && *m != ALL_MATERIALS)
        {
            out = retain_values(&out, RAW_MATERIAL_COLUMN, &[material.to_string()]);
        }
        out = retain_values(&out, SUPPLIER_COLUMN, &self.suppliers);
        if let Some((column, term)) = &self.search {
            out = apply_column_search(&out, column, term);
        }
        tracing::debug!(
            rows_in = result.row_count(),
            rows_out = out.row_count(),
            "Applied row filters"
        );
        out
    }
}
