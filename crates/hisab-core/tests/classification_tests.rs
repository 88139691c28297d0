//! Integration tests for column classification and display preparation
//!
//! Exercises the public API the renderers depend on: one tag per column,
//! identifier hiding, and filters that keep row order.

use chrono::NaiveDate;
use hisab_core::{
    ClassifiedTable, ColumnKind, ExportContext, ReportKind, RowFilters, TabularResult, Value,
    classify_columns, prepare_for_display,
};
use pretty_assertions::assert_eq;

fn supplier_payments() -> TabularResult {
    TabularResult::from_json_str(
        r#"{
            "columns": ["id", "Name", "Amount", "Date", "Link", "Share"],
            "rows": [
                [1, "A", 100.5, "2024-01-01", "https://x/1", "10%"],
                [2, "B", "200", "2024-02-01", null, "15%"],
                [3, "C", null, "", "https://x/3", null]
            ]
        }"#,
    )
    .expect("valid table")
}

// ============ classification Tests ============

#[test]
fn every_column_gets_exactly_one_kind() {
    let result = supplier_payments();
    let kinds = classify_columns(&result);
    assert_eq!(
        kinds,
        vec![
            ColumnKind::Identifier,
            ColumnKind::Text,
            ColumnKind::Numeric,
            ColumnKind::Date,
            ColumnKind::Url,
            ColumnKind::Numeric,
        ]
    );
}

#[test]
fn classification_ignores_row_order() {
    let result = supplier_payments();
    let expected = classify_columns(&result);

    let reversed_rows: Vec<Vec<Value>> = result
        .rows()
        .iter()
        .rev()
        .map(|r| r.values().to_vec())
        .collect();
    let reversed = TabularResult::new(result.columns().to_vec(), reversed_rows).unwrap();
    assert_eq!(classify_columns(&reversed), expected);
}

#[test]
fn classified_table_reads_out_of_range_as_text() {
    let result = supplier_payments();
    let table = ClassifiedTable::new(&result);
    assert_eq!(table.kinds().len(), result.column_count());
    assert_eq!(table.kind(99), ColumnKind::Text);
}

// ============ preparation Tests ============

#[test]
fn prepared_invoices_hide_identifiers_and_keep_rows() {
    let result = TabularResult::from_json_str(
        r#"[
            {"invoice_id": 7, "المبلغ": 1500, "اسم المورد": "مورد أ", "ملاحظات": null},
            {"invoice_id": 8, "المبلغ": 300, "اسم المورد": "مورد ب", "ملاحظات": null}
        ]"#,
    )
    .unwrap();

    let prepared = prepare_for_display(&result, Some(ReportKind::Invoices));
    assert_eq!(prepared.columns(), &["اسم المورد", "المبلغ"]);
    assert_eq!(prepared.cell(0, 1), Some(&Value::Number(1500.0)));
    assert_eq!(prepared.cell(1, 0), Some(&Value::from("مورد ب")));
}

#[test]
fn filters_and_context_describe_the_same_period() {
    let from = NaiveDate::from_ymd_opt(2024, 1, 15);
    let filters = RowFilters {
        date_from: from,
        ..Default::default()
    };
    let filtered = filters.apply(&supplier_payments());
    assert_eq!(filtered.row_count(), 1);
    assert_eq!(filtered.cell(0, 1), Some(&Value::from("B")));

    let context = ExportContext::new("HGAD", "P1").with_dates(from, None);
    assert!(context.title().ends_with("الفترة: 2024-01-15 ← —"));
}

#[test]
fn missing_search_column_is_reported() {
    let result = supplier_payments();
    assert_eq!(result.require_column("Amount").unwrap(), 2);
    let err = result.require_column("Nope").unwrap_err();
    assert_eq!(err.to_string(), "Column not found: Nope");
}
