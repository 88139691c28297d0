//! Shared fixtures for export integration tests

#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::path::Path;

use hisab_core::{TabularResult, Value};
use hisab_export::{AssetResolver, ExportSettings, ReportExporter};
use tempfile::TempDir;

/// Names, amounts and one invoice link, with a blank link in the second row
pub fn invoice_links() -> TabularResult {
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
    .expect("valid table")
}

/// A supplier ledger with Arabic headers and values
pub fn arabic_ledger() -> TabularResult {
    TabularResult::new(
        vec![
            "اسم المورد".into(),
            "رقم الفاتورة".into(),
            "تاريخ الفاتورة".into(),
            "المبلغ".into(),
            "رابط نسخة الفاتورة".into(),
        ],
        vec![
            vec![
                Value::from("شركة الأمل"),
                Value::from("INV-001"),
                Value::from("2024-03-01"),
                Value::Number(1500.0),
                Value::from("https://files.example/1.pdf"),
            ],
            vec![
                Value::from("مؤسسة النور"),
                Value::from("INV-002"),
                Value::from("2024-03-05"),
                Value::from("2,250.75"),
                Value::Null,
            ],
        ],
    )
    .expect("valid table")
}

pub fn header_only() -> TabularResult {
    TabularResult::empty(vec!["Name".into(), "Amount".into()]).expect("valid table")
}

/// An asset directory holding only a generated banner logo
pub fn asset_dir_with_logo() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    write_banner(&dir.path().join("logo_wide.png"));
    dir
}

pub fn write_banner(path: &Path) {
    let banner = image::RgbImage::from_fn(120, 24, |x, _| {
        if x % 2 == 0 {
            image::Rgb([30, 58, 138])
        } else {
            image::Rgb([245, 245, 245])
        }
    });
    banner.save(path).expect("write png");
}

/// Exporter that only looks for assets in `dir`
pub fn exporter_in(dir: &Path) -> ReportExporter {
    ReportExporter::new(ExportSettings::default()).with_resolver(AssetResolver::in_dir(dir))
}

/// One XML part of a rendered workbook, e.g. `xl/worksheets/sheet1.xml`
pub fn workbook_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("xlsx is a zip");
    let mut part = archive.by_name(name).expect("workbook part");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("utf-8 xml");
    xml
}
