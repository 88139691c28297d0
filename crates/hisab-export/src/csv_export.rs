//! Delimited text export
//!
//! Every cell is written as its plain text form, with no classification
//! applied, so parsing the output back yields exactly the values that went
//! in. The payload starts with a UTF-8 byte-order mark so spreadsheet tools
//! pick the right encoding for Arabic text.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use hisab_core::TabularResult;

use crate::error::{ExportError, Result};

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render a result as BOM-prefixed, comma-separated UTF-8.
///
/// A result with no columns produces only the byte-order mark.
pub fn render_delimited(result: &TabularResult) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(UTF8_BOM.len() + result.row_count() * 32);
    buf.extend_from_slice(UTF8_BOM);
    if result.column_count() == 0 {
        return Ok(buf);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(buf);

    writer.write_record(result.columns())?;
    for row in result.rows() {
        writer.write_record(row.values().iter().map(|v| v.to_plain_text()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    tracing::debug!(
        rows = result.row_count(),
        bytes = bytes.len(),
        "Rendered delimited export"
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisab_core::Value;
    use pretty_assertions::assert_eq;

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        let body = bytes.strip_prefix(UTF8_BOM).expect("starts with BOM");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(body);
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_only() {
        let result = TabularResult::empty(vec!["Name".into(), "Amount".into()]).unwrap();
        let bytes = render_delimited(&result).unwrap();
        assert_eq!(bytes, b"\xEF\xBB\xBFName,Amount\r\n".to_vec());
    }

    #[test]
    fn test_no_columns_is_bom_only() {
        let bytes = render_delimited(&TabularResult::default()).unwrap();
        assert_eq!(bytes, UTF8_BOM.to_vec());
    }

    #[test]
    fn test_round_trip_with_awkward_text() {
        let result = TabularResult::new(
            vec!["الاسم".into(), "Note".into(), "Amount".into()],
            vec![
                vec![
                    Value::from("مورد, أ"),
                    Value::from("said \"hi\"\nthen left"),
                    Value::Number(100.5),
                ],
                vec![Value::Null, Value::from(""), Value::Number(200.0)],
            ],
        )
        .unwrap();

        let rows = read_back(&render_delimited(&result).unwrap());
        assert_eq!(
            rows,
            vec![
                vec!["الاسم", "Note", "Amount"],
                vec!["مورد, أ", "said \"hi\"\nthen left", "100.5"],
                vec!["", "", "200"],
            ]
        );
    }

    #[test]
    fn test_single_empty_cell_survives() {
        let result = TabularResult::new(vec!["Only".into()], vec![vec![Value::Null]]).unwrap();
        let rows = read_back(&render_delimited(&result).unwrap());
        assert_eq!(rows, vec![vec!["Only"], vec![""]]);
    }
}
