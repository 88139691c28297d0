//! Workbook content planning
//!
//! Decides what goes into every cell of the exported sheet (typed body
//! cells, the totals row, the row-count row) and how wide each column is.
//! The plan carries no writer state, so the xlsx writer only maps it onto
//! worksheet calls.

use chrono::NaiveDateTime;
use hisab_core::{
    ClassifiedTable, ColumnKind, SheetWidthPolicy, Value, coerce_date, coerce_number,
    is_identifier_name, is_url_value, longest_text_len, normalize_name,
};

use crate::settings::ExportLabels;

/// Name fragments that keep a column out of the totals row
const TOTAL_EXCLUDED_MARKERS: &[&str] = &[
    "رقم", "تاريخ", "date", "code", "كود", "بنك", "bank", "نوع", "type", "رابط", "مورد", "مواد",
];

/// Sums at or below this magnitude are left blank
const NEGLIGIBLE_TOTAL: f64 = 0.001;

/// Typed content of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Blank,
    Text(String),
    /// Written with the thousands-separator, two-decimal format
    Number(f64),
    /// Written as a native date with the `yyyy-mm-dd` format
    Date(NaiveDateTime),
    /// Clickable link showing a fixed caption
    Link { url: String, label: String },
    /// Summary-row caption, styled like the header
    Label(String),
    /// The row count, written as a plain integer
    Count(usize),
}

impl SheetCell {
    /// Raw text written when the typed write fails
    pub fn fallback_text(&self) -> String {
        match self {
            SheetCell::Blank => String::new(),
            SheetCell::Text(s) | SheetCell::Label(s) => s.clone(),
            SheetCell::Number(v) => v.to_string(),
            SheetCell::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            SheetCell::Link { url, .. } => url.clone(),
            SheetCell::Count(n) => n.to_string(),
        }
    }
}

/// Scaling of the logo banner across the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoBanner {
    /// Uniform image scale, aspect ratio preserved
    pub scale: f64,
    /// Height of the banner row in points
    pub row_height: f64,
}

/// Everything the sheet shows, in row order
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub title: String,
    pub headers: Vec<String>,
    pub body: Vec<Vec<SheetCell>>,
    pub totals: Vec<SheetCell>,
    pub count: Vec<SheetCell>,
    /// Column widths in characters
    pub widths: Vec<f64>,
}

impl SheetLayout {
    pub fn plan(
        table: &ClassifiedTable<'_>,
        title: &str,
        labels: &ExportLabels,
        policy: &SheetWidthPolicy,
    ) -> Self {
        let result = table.result();
        let headers = result
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if name.trim().is_empty() {
                    format!("Column{}", idx + 1)
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>();

        let body = result
            .rows()
            .iter()
            .map(|row| {
                row.values()
                    .iter()
                    .enumerate()
                    .map(|(idx, value)| body_cell(value, table.kind(idx), labels))
                    .collect()
            })
            .collect();

        let widths = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let longest = longest_text_len(
                    header,
                    result.column_values(idx).map(Value::to_plain_text),
                );
                policy.column_chars(longest)
            })
            .collect();

        Self {
            title: title.to_string(),
            totals: totals_row(table, labels),
            count: count_row(result.column_count(), result.row_count(), labels),
            headers,
            body,
            widths,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Banner scale for an image of the given pixel size, stretched to the
    /// estimated table width
    pub fn logo_banner(
        &self,
        image_width: u32,
        image_height: u32,
        policy: &SheetWidthPolicy,
    ) -> LogoBanner {
        let table_px = policy.table_pixels(&self.widths);
        let image_width = if image_width == 0 { 1000 } else { image_width };
        let scale = (table_px / image_width as f64).max(0.1);
        LogoBanner {
            scale,
            row_height: image_height as f64 * scale * 0.75,
        }
    }
}

fn body_cell(value: &Value, kind: ColumnKind, labels: &ExportLabels) -> SheetCell {
    if value.is_blank() {
        return SheetCell::Blank;
    }
    let typed = match kind {
        ColumnKind::Url if is_url_value(value) => Some(SheetCell::Link {
            url: value.to_plain_text().trim().to_string(),
            label: labels.open_link.clone(),
        }),
        ColumnKind::Date => coerce_date(value).map(SheetCell::Date),
        ColumnKind::Numeric => coerce_number(value).map(SheetCell::Number),
        _ => None,
    };
    typed.unwrap_or_else(|| SheetCell::Text(value.to_plain_text()))
}

/// Whether a column is left out of the totals row
pub fn is_total_excluded(name: &str, kind: ColumnKind) -> bool {
    if kind == ColumnKind::Identifier || is_identifier_name(name) {
        return true;
    }
    let normalized = normalize_name(name);
    TOTAL_EXCLUDED_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Sum of every value in a column that coerces to a plain number.
///
/// Returns `None` when nothing coerces or the sum is negligible.
pub fn column_total<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<f64> {
    let mut seen = false;
    let mut sum = 0.0;
    for v in values.into_iter().filter_map(coerce_number) {
        seen = true;
        sum += v;
    }
    (seen && sum.abs() > NEGLIGIBLE_TOTAL).then_some(sum)
}

fn totals_row(table: &ClassifiedTable<'_>, labels: &ExportLabels) -> Vec<SheetCell> {
    let result = table.result();
    result
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == 0 {
                return SheetCell::Label(labels.total.clone());
            }
            if is_total_excluded(name, table.kind(idx)) {
                return SheetCell::Blank;
            }
            column_total(result.column_values(idx))
                .map(SheetCell::Number)
                .unwrap_or(SheetCell::Blank)
        })
        .collect()
}

fn count_row(columns: usize, rows: usize, labels: &ExportLabels) -> Vec<SheetCell> {
    match columns {
        0 => Vec::new(),
        1 => vec![SheetCell::Label(format!("{}: {}", labels.row_count, rows))],
        n => {
            let mut cells = vec![
                SheetCell::Label(labels.row_count.clone()),
                SheetCell::Count(rows),
            ];
            cells.resize(n, SheetCell::Blank);
            cells
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisab_core::TabularResult;
    use pretty_assertions::assert_eq;

    fn plan(result: &TabularResult) -> SheetLayout {
        let table = ClassifiedTable::new(result);
        SheetLayout::plan(
            &table,
            "Report",
            &ExportLabels::english(),
            &SheetWidthPolicy::default(),
        )
    }

    fn invoice_links() -> TabularResult {
        TabularResult::new(
            vec!["Name".into(), "Amount".into(), "Invoice Link".into()],
            vec![
                vec![
                    Value::from("A"),
                    Value::Number(100.5),
                    Value::from("https://ex/1"),
                ],
                vec![Value::from("B"), Value::Number(200.0), Value::from("")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_links_totals_and_count() {
        let layout = plan(&invoice_links());
        assert_eq!(
            layout.body[0][2],
            SheetCell::Link {
                url: "https://ex/1".into(),
                label: "Open Link".into()
            }
        );
        assert_eq!(layout.body[1][2], SheetCell::Blank);
        assert_eq!(
            layout.totals,
            vec![
                SheetCell::Label("Total".into()),
                SheetCell::Number(300.5),
                SheetCell::Blank
            ]
        );
        assert_eq!(
            layout.count,
            vec![
                SheetCell::Label("Row Count".into()),
                SheetCell::Count(2),
                SheetCell::Blank
            ]
        );
    }

    #[test]
    fn test_totals_skip_nulls_and_excluded_columns() {
        let result = TabularResult::new(
            vec!["Label".into(), "Amount".into(), "Posting Date".into()],
            vec![
                vec![Value::from("a"), Value::Number(10.0), Value::from("20240101")],
                vec![Value::from("b"), Value::Number(20.0), Value::from("20240102")],
                vec![Value::from("c"), Value::Null, Value::from("20240103")],
            ],
        )
        .unwrap();
        let layout = plan(&result);
        assert_eq!(layout.totals[1], SheetCell::Number(30.0));
        assert_eq!(layout.totals[2], SheetCell::Blank);
    }

    #[test]
    fn test_identifier_like_names_are_not_totalled() {
        assert!(is_total_excluded("supplier_id", ColumnKind::Identifier));
        assert!(is_total_excluded("رقم الفاتورة", ColumnKind::Numeric));
        assert!(is_total_excluded("Bank Code", ColumnKind::Numeric));
        assert!(!is_total_excluded("Paid Amount", ColumnKind::Numeric));
        assert!(!is_total_excluded("المبلغ", ColumnKind::Numeric));
    }

    #[test]
    fn test_negligible_and_percent_totals_are_blank() {
        let values = vec![Value::Number(0.0004), Value::Null];
        assert_eq!(column_total(&values), None);
        let percents = vec![Value::from("10%"), Value::from("20%")];
        assert_eq!(column_total(&percents), None);
        let mixed = vec![Value::from("1,000"), Value::from("x"), Value::Number(0.5)];
        assert_eq!(column_total(&mixed), Some(1000.5));
    }

    #[test]
    fn test_cells_fall_back_to_text() {
        let result = TabularResult::new(
            vec!["Share".into(), "Ref Link".into()],
            vec![vec![Value::from("12%"), Value::from("report.pdf")]],
        )
        .unwrap();
        let layout = plan(&result);
        assert_eq!(layout.body[0][0], SheetCell::Text("12%".into()));
        assert_eq!(layout.body[0][1], SheetCell::Text("report.pdf".into()));
    }

    #[test]
    fn test_empty_result_still_has_summary_rows() {
        let result = TabularResult::empty(vec!["Name".into(), "Amount".into()]).unwrap();
        let layout = plan(&result);
        assert!(layout.body.is_empty());
        assert_eq!(
            layout.totals,
            vec![SheetCell::Label("Total".into()), SheetCell::Blank]
        );
        assert_eq!(
            layout.count,
            vec![SheetCell::Label("Row Count".into()), SheetCell::Count(0)]
        );
    }

    #[test]
    fn test_single_column_count_label() {
        let result = TabularResult::new(
            vec!["Name".into()],
            vec![vec![Value::from("a")], vec![Value::from("b")]],
        )
        .unwrap();
        let layout = plan(&result);
        assert_eq!(layout.count, vec![SheetCell::Label("Row Count: 2".into())]);
    }

    #[test]
    fn test_widths_and_logo_banner() {
        let layout = plan(&invoice_links());
        // "Invoice Link" (12) vs "https://ex/1" (12), plus padding
        assert_eq!(layout.widths, vec![8.0, 10.0, 16.0]);

        let banner = layout.logo_banner(306, 49, &SheetWidthPolicy::default());
        assert!((banner.scale - 0.8).abs() < 1e-9);
        assert!((banner.row_height - 29.4).abs() < 1e-9);
    }
}
