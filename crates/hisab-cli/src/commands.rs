//! Subcommand implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use hisab_core::{
    ClassifiedTable, ExportContext, RowFilters, TabularResult, format_for_display,
    prepare_for_display,
};
use hisab_export::{ExportSettings, RenderedDocument, ReportExporter};

use crate::input::load_table;
use crate::{ClassifyArgs, ExportArgs};

pub fn export(args: ExportArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    let exporter = ReportExporter::new(settings);

    let loaded = load_table(&args.input)?;
    let table = select_rows(&loaded, &args)?;

    let context = ExportContext::new(args.company.clone(), args.project.clone())
        .with_dates(args.from, args.to);
    let context = match args.kind {
        Some(kind) => context.with_kind(kind),
        None => context,
    };

    let formats = if args.format.is_empty() {
        exporter.available_formats()
    } else {
        args.format.clone()
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for format in formats {
        match exporter
            .export(&table, &context, format)
            .with_context(|| format!("rendering {}", format))?
        {
            Some(document) => {
                let path = write_document(&args.out_dir, &document)?;
                println!("{}", path.display());
            }
            None => eprintln!("skipped {}: not available in this build", format),
        }
    }
    Ok(())
}

fn load_settings(args: &ExportArgs) -> Result<ExportSettings> {
    let mut settings = match &args.config {
        Some(path) => ExportSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => ExportSettings::load_or_default().context("loading default settings")?,
    };
    if let Some(locale) = args.locale {
        settings.locale = locale;
        settings.labels = None;
    }
    if args.no_logo {
        settings.include_logo = false;
    }
    if let Some(dir) = &args.assets {
        settings.assets.search_dirs.insert(0, dir.clone());
    }
    Ok(settings)
}

/// Filters first, then display preparation, so filters can still see
/// columns that preparation hides
fn select_rows(loaded: &TabularResult, args: &ExportArgs) -> Result<TabularResult> {
    if let Some(column) = &args.search_column {
        loaded.require_column(column)?;
    }
    let filters = RowFilters {
        date_from: args.from,
        date_to: args.to,
        raw_material: args.material.clone(),
        suppliers: args.suppliers.clone(),
        search: args.search_column.clone().zip(args.search.clone()),
    };
    let filtered = filters.apply(loaded);
    if args.raw {
        return Ok(filtered);
    }
    Ok(prepare_for_display(&filtered, args.kind))
}

fn write_document(dir: &Path, document: &RenderedDocument) -> Result<PathBuf> {
    let path = dir.join(document.filename());
    std::fs::write(&path, document.bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        mime = document.mime_type(),
        bytes = document.len(),
        "Wrote export"
    );
    Ok(path)
}

pub fn classify(args: ClassifyArgs) -> Result<()> {
    let result = load_table(&args.input)?;
    let table = ClassifiedTable::new(&result);

    if args.json {
        let columns: Vec<serde_json::Value> = result
            .columns()
            .iter()
            .zip(table.kinds())
            .map(|(name, kind)| serde_json::json!({ "column": name, "kind": kind }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }

    println!("{}", kinds_table(&table));
    if let Some(limit) = args.preview {
        println!("{}", preview_table(&table, limit));
    }
    Ok(())
}

fn kinds_table(table: &ClassifiedTable<'_>) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Column").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
        ]);
    for (name, kind) in table.result().columns().iter().zip(table.kinds()) {
        out.add_row(vec![Cell::new(name), Cell::new(kind.as_str())]);
    }
    out
}

/// The first `limit` rows with their display formatting applied
fn preview_table(table: &ClassifiedTable<'_>, limit: usize) -> Table {
    let display = format_for_display(table);
    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            display
                .columns()
                .iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
        );
    for row in display.rows().iter().take(limit) {
        out.add_row(row.values().iter().map(|v| v.to_plain_text()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisab_core::Value;
    use hisab_export::ExportFormat;
    use pretty_assertions::assert_eq;

    fn args(input: PathBuf, out_dir: PathBuf) -> ExportArgs {
        ExportArgs {
            input,
            format: vec![ExportFormat::Csv],
            out_dir,
            company: "Acme".into(),
            project: "Tower".into(),
            kind: None,
            from: None,
            to: None,
            material: None,
            suppliers: Vec::new(),
            search_column: None,
            search: None,
            raw: false,
            locale: None,
            no_logo: true,
            config: None,
            assets: None,
        }
    }

    #[test]
    fn test_select_rows_filters_then_prepares() {
        let loaded = TabularResult::new(
            vec!["id".into(), "Name".into(), "Amount".into()],
            vec![
                vec![Value::Number(1.0), Value::from("Alpha"), Value::Number(5.0)],
                vec![Value::Number(2.0), Value::from("Beta"), Value::Number(7.0)],
            ],
        )
        .unwrap();
        let mut a = args(PathBuf::from("in.json"), PathBuf::from("."));
        a.search_column = Some("Name".into());
        a.search = Some("alp".into());

        let selected = select_rows(&loaded, &a).unwrap();
        assert_eq!(selected.columns(), &["Name".to_string(), "Amount".to_string()]);
        assert_eq!(selected.row_count(), 1);

        a.raw = true;
        assert_eq!(select_rows(&loaded, &a).unwrap().column_count(), 3);
    }

    #[test]
    fn test_unknown_search_column_is_an_error() {
        let loaded = TabularResult::empty(vec!["Name".into()]).unwrap();
        let mut a = args(PathBuf::from("in.json"), PathBuf::from("."));
        a.search_column = Some("Nope".into());
        a.search = Some("x".into());
        assert!(select_rows(&loaded, &a).is_err());
    }

    #[test]
    fn test_export_writes_named_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("table.json");
        std::fs::write(
            &input,
            r#"{"columns": ["Name", "Amount"], "rows": [["A", 1], ["B", 2]]}"#,
        )
        .unwrap();
        let out_dir = dir.path().join("out");

        export(args(input, out_dir.clone())).unwrap();

        let written = std::fs::read(out_dir.join("export_Acme_Tower.csv")).unwrap();
        assert!(written.starts_with(b"\xEF\xBB\xBFName,Amount\r\n"));
    }
}
