//! Locale-aware display formatting

use crate::classify::{ClassifiedTable, ColumnKind};
use crate::coerce::{ParsedNumber, coerce_number, normalize_name, parse_number};
use crate::types::{TabularResult, Value};

/// Format an amount with thousands separators and two decimals
/// (`1234.5` → `1,234.50`).
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value.is_sign_negative() && value != 0.0 {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Summary-style display of a single value.
///
/// Percent text is kept verbatim, anything numeric gets
/// [`format_amount`], NULL becomes empty, and everything else is shown as its
/// plain text.
pub fn format_value(value: &Value) -> String {
    if let Value::Text(s) = value {
        if matches!(parse_number(s), Some(ParsedNumber::Percent(_))) {
            return s.clone();
        }
    }
    match coerce_number(value) {
        Some(v) => format_amount(v),
        None => value.to_plain_text(),
    }
}

/// Display a number without separators, trimming a redundant fraction
/// (`"1,200.0"` → `"1200"`, `12.50` → `"12.5"`).
///
/// Used for cheque and reference-number columns where grouping digits would
/// be misleading.
pub fn plain_number(value: &Value) -> String {
    let Some(v) = coerce_number(value) else {
        return value.to_plain_text();
    };
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let s = format!("{}", v);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Columns whose numbers are references rather than quantities
pub fn is_plain_number_column(name: &str) -> bool {
    let normalized = normalize_name(name);
    normalized.contains("شيك")
        || (normalized.contains("رقم") && normalized.contains("فاتورة"))
        || ["cheque", "checkno", "checknumber", "invoiceno", "invoicenumber"]
            .iter()
            .any(|m| normalized.contains(m))
}

/// Display text for one cell given its column's kind
pub fn display_text(value: &Value, kind: ColumnKind, plain_numbers: bool) -> String {
    match (kind, value) {
        (_, Value::Null) => String::new(),
        (ColumnKind::Numeric, _) if plain_numbers => plain_number(value),
        (ColumnKind::Numeric, _) => format_value(value),
        _ => value.to_plain_text(),
    }
}

/// A copy of the table where every cell is replaced by its display text.
///
/// Numeric columns get thousands separators (reference-number columns are
/// shown plain); other columns keep their plain text.
pub fn format_for_display(table: &ClassifiedTable<'_>) -> TabularResult {
    let result = table.result();
    let mut out = result.clone();
    for (idx, name) in result.columns().iter().enumerate() {
        let kind = table.kind(idx);
        let plain = is_plain_number_column(name);
        out = out.map_column(idx, |v| match v {
            Value::Null => Value::Null,
            other => Value::Text(display_text(other, kind, plain)),
        });
    }
    out
}
