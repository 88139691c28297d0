//! Column classification
//!
//! Each column is tagged exactly once, before any rendering, with the kind
//! that drives how every renderer writes its cells. The tag is a pure
//! function of the column name and the set of its non-blank values, so it
//! never depends on row order.

use serde::{Deserialize, Serialize};

use crate::coerce::{coerce_date, is_number_like, normalize_name};
use crate::types::{TabularResult, Value};

/// Semantic kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Surrogate keys; never totalled and normally hidden before export
    Identifier,
    /// Hyperlinks
    Url,
    /// Uniformly date-like values
    Date,
    /// Uniformly numeric values
    Numeric,
    /// Anything else
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Identifier => "identifier",
            ColumnKind::Url => "url",
            ColumnKind::Date => "date",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latin tokens that mark a surrogate key column
const IDENTIFIER_TOKENS: &[&str] = &["id", "uuid", "guid", "pk"];

/// Arabic fragments that mark a surrogate key column (matched on the
/// normalised name)
const IDENTIFIER_MARKERS: &[&str] = &["معرف", "تعريفي"];

/// Latin tokens that mark a hyperlink column
const LINK_TOKENS: &[&str] = &["link", "links", "url", "urls", "href", "hyperlink"];

/// Arabic fragment that marks a hyperlink column
const LINK_MARKER: &str = "رابط";

/// Whether a column name denotes an identifier.
///
/// Latin names are split into tokens on punctuation, whitespace and
/// camelCase boundaries so that `supplier_id`, `Supplier ID` and `supplierId`
/// match while `Paid Amount` does not.
pub fn is_identifier_name(name: &str) -> bool {
    if name_tokens(name)
        .iter()
        .any(|t| IDENTIFIER_TOKENS.contains(&t.as_str()))
    {
        return true;
    }
    let normalized = normalize_name(name);
    IDENTIFIER_MARKERS.iter().any(|m| normalized.contains(m))
}

/// Whether a column name carries a link marker.
///
/// Latin markers must be whole tokens, so `Hourly Rate` is not a link
/// column even though its letters contain `url`.
pub fn is_link_name(name: &str) -> bool {
    if name_tokens(name)
        .iter()
        .any(|t| LINK_TOKENS.contains(&t.as_str()))
    {
        return true;
    }
    normalize_name(name).contains(LINK_MARKER)
}

/// Whether a cell holds an http(s) URL
pub fn is_url_value(value: &Value) -> bool {
    match value {
        Value::Text(s) => {
            let s = s.trim_start();
            starts_with_ignore_case(s, "http://") || starts_with_ignore_case(s, "https://")
        }
        _ => false,
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Classify one column from its name and all of its values.
///
/// Priority is fixed: identifier, url, date, numeric, text. Blank cells
/// (NULL or whitespace-only text) are ignored; a column with no remaining
/// values is text unless its name already decided it.
pub fn classify_column<'a>(name: &str, values: impl IntoIterator<Item = &'a Value>) -> ColumnKind {
    if is_identifier_name(name) {
        return ColumnKind::Identifier;
    }

    let present: Vec<&Value> = values.into_iter().filter(|v| !v.is_blank()).collect();

    if is_link_name(name) || present.iter().any(|v| is_url_value(v)) {
        return ColumnKind::Url;
    }
    if present.is_empty() {
        return ColumnKind::Text;
    }
    if present.iter().all(|v| coerce_date(v).is_some()) {
        return ColumnKind::Date;
    }
    if present.iter().all(|v| is_number_like(v)) {
        return ColumnKind::Numeric;
    }
    ColumnKind::Text
}

/// Classify every column of a result, in header order
pub fn classify_columns(result: &TabularResult) -> Vec<ColumnKind> {
    result
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| classify_column(name, result.column_values(idx)))
        .collect()
}

/// A result paired with its column kinds.
///
/// Renderers take this so classification happens once per export rather
/// than once per renderer or per cell.
#[derive(Debug, Clone)]
pub struct ClassifiedTable<'a> {
    result: &'a TabularResult,
    kinds: Vec<ColumnKind>,
}

impl<'a> ClassifiedTable<'a> {
    pub fn new(result: &'a TabularResult) -> Self {
        let kinds = classify_columns(result);
        tracing::debug!(
            columns = result.column_count(),
            rows = result.row_count(),
            kinds = ?kinds,
            "Classified columns"
        );
        Self { result, kinds }
    }

    pub fn result(&self) -> &'a TabularResult {
        self.result
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Kind of one column; out-of-range indices read as text
    pub fn kind(&self, column: usize) -> ColumnKind {
        self.kinds.get(column).copied().unwrap_or(ColumnKind::Text)
    }
}
