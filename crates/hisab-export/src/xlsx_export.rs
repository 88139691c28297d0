//! Spreadsheet export
//!
//! Writes a [`SheetLayout`] into a single-sheet workbook: optional logo
//! banner, merged title, blank spacer row, then the header, body, totals and
//! row-count rows registered as one banded table with a frozen header.

use hisab_core::ClassifiedTable;

use crate::assets::BrandingAssets;
use crate::error::Result;
use crate::settings::ExportSettings;
use crate::sheet_layout::SheetLayout;

/// Whether this build can write spreadsheets
pub fn spreadsheet_available() -> bool {
    cfg!(feature = "xlsx")
}

/// Render the classified table as an xlsx workbook.
///
/// Returns `Ok(None)` when the build has no spreadsheet writer; callers
/// should then not offer the format. Cells whose typed write fails are
/// written as text instead.
#[cfg(feature = "xlsx")]
pub fn render_spreadsheet(
    table: &ClassifiedTable<'_>,
    title: &str,
    include_logo: bool,
    branding: &BrandingAssets,
    settings: &ExportSettings,
) -> Result<Option<Vec<u8>>> {
    let layout = SheetLayout::plan(
        table,
        title,
        &settings.labels(),
        &settings.sheet.widths,
    );
    let bytes = writer::write_workbook(&layout, include_logo, branding, settings)?;
    tracing::debug!(
        columns = layout.column_count(),
        rows = layout.body.len(),
        bytes = bytes.len(),
        "Rendered spreadsheet"
    );
    Ok(Some(bytes))
}

#[cfg(not(feature = "xlsx"))]
pub fn render_spreadsheet(
    table: &ClassifiedTable<'_>,
    _title: &str,
    _include_logo: bool,
    _branding: &BrandingAssets,
    _settings: &ExportSettings,
) -> Result<Option<Vec<u8>>> {
    tracing::warn!(
        columns = table.result().column_count(),
        "Spreadsheet export unavailable in this build"
    );
    Ok(None)
}

/// Excel's limit on sheet names
const MAX_SHEET_NAME_CHARS: usize = 31;

/// A worksheet name Excel accepts: no `[]:*?/\`, at most 31 characters,
/// never empty
pub fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '-',
            other => other,
        })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

#[cfg(feature = "xlsx")]
mod writer {
    use chrono::{Datelike, NaiveDateTime, Timelike};
    use rust_xlsxwriter::{
        Color, ExcelDateTime, Format, FormatAlign, FormatUnderline, Image, Table, TableColumn,
        TableStyle, Url, Workbook, Worksheet, XlsxError,
    };

    use super::sheet_name;
    use crate::assets::{BrandingAssets, LogoImage};
    use crate::error::Result;
    use crate::settings::ExportSettings;
    use crate::sheet_layout::{SheetCell, SheetLayout};

    const HEADER_BACKGROUND: u32 = 0x1E3A8A;
    const TITLE_BACKGROUND: u32 = 0xF0F0F0;

    struct Formats {
        title: Format,
        header: Format,
        text: Format,
        number: Format,
        date: Format,
        link: Format,
    }

    impl Formats {
        fn new(title_font_size: f64) -> Self {
            let right = Format::new().set_align(FormatAlign::Right);
            Self {
                title: Format::new()
                    .set_bold()
                    .set_align(FormatAlign::Center)
                    .set_align(FormatAlign::VerticalCenter)
                    .set_font_size(title_font_size)
                    .set_background_color(Color::RGB(TITLE_BACKGROUND)),
                header: right
                    .clone()
                    .set_bold()
                    .set_background_color(Color::RGB(HEADER_BACKGROUND))
                    .set_font_color(Color::White),
                number: right.clone().set_num_format("#,##0.00"),
                date: right.clone().set_num_format("yyyy-mm-dd"),
                link: right
                    .clone()
                    .set_font_color(Color::Blue)
                    .set_underline(FormatUnderline::Single),
                text: right,
            }
        }
    }

    pub(super) fn write_workbook(
        layout: &SheetLayout,
        include_logo: bool,
        branding: &BrandingAssets,
        settings: &ExportSettings,
    ) -> Result<Vec<u8>> {
        let sheet = &settings.sheet;
        let formats = Formats::new(sheet.title_font_size);
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(&sheet.name))?;

        let mut row: u32 = 0;
        if include_logo {
            if let Some(logo) = &branding.wide_logo {
                if insert_logo(worksheet, layout, logo, settings) {
                    row += 1;
                }
            }
        }

        let last_col = layout.column_count().saturating_sub(1) as u16;
        if last_col > 0 {
            worksheet.merge_range(row, 0, row, last_col, &layout.title, &formats.title)?;
        } else {
            worksheet.write_string_with_format(row, 0, &layout.title, &formats.title)?;
        }
        worksheet.set_row_height(row, sheet.title_row_height)?;
        row += 1;
        worksheet.set_row_height(row, sheet.spacer_row_height)?;
        row += 1;

        if layout.column_count() > 0 {
            write_table(worksheet, layout, row, &formats);
            for (col, width) in layout.widths.iter().enumerate() {
                worksheet.set_column_width(col as u16, *width)?;
            }
            worksheet.set_freeze_panes(row + 1, 0)?;
        }

        let [left, right, top, bottom] = sheet.margins;
        worksheet.set_zoom(sheet.zoom);
        worksheet.set_margins(left, right, top, bottom, 0.3, 0.3);

        Ok(workbook.save_to_buffer()?)
    }

    fn insert_logo(
        worksheet: &mut Worksheet,
        layout: &SheetLayout,
        logo: &LogoImage,
        settings: &ExportSettings,
    ) -> bool {
        let banner = layout.logo_banner(logo.width, logo.height, &settings.sheet.widths);
        let inserted = Image::new_from_buffer(&logo.bytes).and_then(|image| {
            let image = image
                .set_scale_width(banner.scale)
                .set_scale_height(banner.scale);
            worksheet.insert_image(0, 0, &image)?;
            worksheet.set_row_height(0, banner.row_height)?;
            Ok(())
        });
        match inserted {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %logo.path.display(), error = %e, "Skipping logo banner");
                false
            }
        }
    }

    /// Header row at `header_row`, then body, totals and count rows
    fn write_table(
        worksheet: &mut Worksheet,
        layout: &SheetLayout,
        header_row: u32,
        formats: &Formats,
    ) {
        let last_col = (layout.column_count() - 1) as u16;
        let body_rows = layout.body.len() as u32;
        let totals_row = header_row + 1 + body_rows;
        let count_row = totals_row + 1;

        let columns: Vec<TableColumn> = layout
            .headers
            .iter()
            .map(|h| TableColumn::new().set_header(h))
            .collect();
        let table = Table::new()
            .set_style(TableStyle::Medium9)
            .set_columns(&columns);
        if let Err(e) = worksheet.add_table(header_row, 0, count_row, last_col, &table) {
            tracing::warn!(error = %e, "Writing sheet without table styling");
        }

        // Written after the table so the header format wins over the table's
        // default header cells.
        for (col, header) in layout.headers.iter().enumerate() {
            write_cell(
                worksheet,
                header_row,
                col as u16,
                &SheetCell::Label(header.clone()),
                formats,
            );
        }
        for (i, cells) in layout.body.iter().enumerate() {
            let row = header_row + 1 + i as u32;
            for (col, cell) in cells.iter().enumerate() {
                write_cell(worksheet, row, col as u16, cell, formats);
            }
        }
        for (col, cell) in layout.totals.iter().enumerate() {
            write_cell(worksheet, totals_row, col as u16, cell, formats);
        }
        for (col, cell) in layout.count.iter().enumerate() {
            write_cell(worksheet, count_row, col as u16, cell, formats);
        }
    }

    /// Write one cell with its typed writer, falling back to plain text
    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &SheetCell,
        formats: &Formats,
    ) {
        if let Err(e) = write_typed(worksheet, row, col, cell, formats) {
            tracing::warn!(row, col, error = %e, "Cell written as text");
            let text = cell.fallback_text();
            if let Err(e) = worksheet.write_string_with_format(row, col, &text, &formats.text) {
                tracing::warn!(row, col, error = %e, "Cell left blank");
            }
        }
    }

    fn write_typed(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &SheetCell,
        formats: &Formats,
    ) -> std::result::Result<(), XlsxError> {
        match cell {
            SheetCell::Blank => worksheet.write_blank(row, col, &formats.text)?,
            SheetCell::Text(s) => worksheet.write_string_with_format(row, col, s, &formats.text)?,
            SheetCell::Label(s) => {
                worksheet.write_string_with_format(row, col, s, &formats.header)?
            }
            SheetCell::Number(v) => {
                worksheet.write_number_with_format(row, col, *v, &formats.number)?
            }
            SheetCell::Count(n) => {
                worksheet.write_number_with_format(row, col, *n as f64, &formats.text)?
            }
            SheetCell::Date(dt) => {
                let date = excel_datetime(dt)?;
                worksheet.write_datetime_with_format(row, col, &date, &formats.date)?
            }
            SheetCell::Link { url, label } => worksheet.write_url_with_format(
                row,
                col,
                Url::new(url).set_text(label),
                &formats.link,
            )?,
        };
        Ok(())
    }

    /// Excel serial dates start at 1900; earlier or later values are errors
    fn excel_datetime(dt: &NaiveDateTime) -> std::result::Result<ExcelDateTime, XlsxError> {
        let year = u16::try_from(dt.year()).map_err(|_| {
            XlsxError::DateTimeRangeError(format!("Year: '{}' outside Excel range", dt.year()))
        })?;
        ExcelDateTime::from_ymd(year, dt.month() as u8, dt.day() as u8)?.and_hms(
            dt.hour() as u16,
            dt.minute() as u8,
            dt.second(),
        )
    }
}
