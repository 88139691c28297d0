//! Hisab Export - Spreadsheet, PDF and CSV renderers for tabular results
//!
//! Each renderer turns a classified result into a finished payload:
//!
//! ```text
//! TabularResult → ClassifiedTable ─┬─ SheetLayout    → xlsx bytes
//!                                  ├─ DocumentLayout → pdf bytes
//!                                  └─ plain text     → csv bytes
//! ```
//!
//! Layout planning ([`SheetLayout`], [`DocumentLayout`]) is kept apart from
//! the writers so it can be inspected without decoding the output.
//!
//! # Example
//!
//! ```rust,ignore
//! let exporter = ReportExporter::new(ExportSettings::load_or_default()?);
//! let context = ExportContext::new("Acme", "Tower").with_kind(ReportKind::Invoices);
//! if let Some(doc) = exporter.export(&result, &context, ExportFormat::Pdf)? {
//!     std::fs::write(doc.filename(), doc.bytes())?;
//! }
//! ```

mod assets;
mod csv_export;
mod error;
mod exporter;
mod output;
mod pdf_export;
mod pdf_layout;
mod settings;
mod shaping;
mod sheet_layout;
mod xlsx_export;

pub use assets::{AssetKind, AssetResolver, BrandingAssets, FontAsset, LogoImage, first_existing};
pub use csv_export::{UTF8_BOM, render_delimited};
pub use error::{ExportError, Result};
pub use exporter::ReportExporter;
pub use output::{ExportFormat, RenderedDocument};
pub use pdf_export::render_document;
pub use pdf_layout::{
    Align, BuiltinFace, CellBox, DocumentLayout, EmbeddedFace, ImageBox, PAGE_HEIGHT, PAGE_WIDTH,
    PageLayout, PlacedRow, RowStyle, TextLine, Typeface, wrap_text,
};
pub use settings::{
    AssetSettings, DocumentSettings, ExportLabels, ExportSettings, LabelLocale, SheetSettings,
};
pub use shaping::{reshape_arabic, shape_for_display, visual_order};
pub use sheet_layout::{LogoBanner, SheetCell, SheetLayout, column_total, is_total_excluded};
pub use xlsx_export::{render_spreadsheet, sheet_name, spreadsheet_available};
