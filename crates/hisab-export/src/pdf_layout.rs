//! Page layout for the PDF export
//!
//! Positions everything on landscape A4 pages: optional logo, centred
//! title, then the table with its header row repeated at the top of every
//! page. Coordinates are in points measured from the top-left corner; the
//! writer flips them into PDF space.

use hisab_core::{
    ClassifiedTable, ColumnKind, DensityTier, Value, display_text, document_column_widths,
    is_plain_number_column, is_url_value, looks_arabic,
};

use crate::error::{ExportError, Result};
use crate::settings::{DocumentSettings, ExportLabels};
use crate::shaping::shape_for_display;

/// A4 landscape in points
pub const PAGE_WIDTH: f32 = 841.89;
pub const PAGE_HEIGHT: f32 = 595.28;

const CELL_PAD_X: f32 = 3.0;
const CELL_PAD_TOP: f32 = 2.0;
const CELL_PAD_BOTTOM: f32 = 2.0;
/// Vertical gap after the logo and after the title
const BLOCK_GAP: f32 = 8.0;
const HEADER_FONT_BUMP: f32 = 0.6;
const HEADER_LEADING: f32 = 1.8;
const CELL_LEADING: f32 = 1.5;
const TITLE_LEADING: f32 = 3.0;

/// How a typeface turns logical text into drawable text and measures it
pub trait Typeface {
    /// Text as it will be drawn, left to right
    fn prepare(&self, text: &str) -> String;

    /// Advance width of already prepared text, in points
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// A TrueType font embedded in the document.
///
/// Arabic text is shaped and reordered; widths come from the font's
/// horizontal advances.
pub struct EmbeddedFace<'a> {
    face: ttf_parser::Face<'a>,
}

impl<'a> EmbeddedFace<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let face =
            ttf_parser::Face::parse(data, 0).map_err(|e| ExportError::Font(e.to_string()))?;
        Ok(Self { face })
    }
}

impl Typeface for EmbeddedFace<'_> {
    fn prepare(&self, text: &str) -> String {
        shape_for_display(text)
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units_per_em = self.face.units_per_em().max(1) as f32;
        let units: f32 = text
            .chars()
            .map(|c| {
                self.face
                    .glyph_index(c)
                    .and_then(|id| self.face.glyph_hor_advance(id))
                    .map(|advance| advance as f32)
                    .unwrap_or(units_per_em * 0.5)
            })
            .sum();
        units / units_per_em * font_size
    }
}

/// The PDF base-14 Helvetica.
///
/// It cannot draw Arabic, so anything outside printable ASCII is replaced
/// with `?` and no shaping happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFace;

impl Typeface for BuiltinFace {
    fn prepare(&self, text: &str) -> String {
        text.chars()
            .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
            .collect()
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|c| match c {
                ' ' | 'i' | 'l' | 'j' | '.' | ',' | '\'' | '|' => 0.278,
                'm' | 'w' | 'M' | 'W' | '@' => 0.833,
                c if c.is_ascii_uppercase() => 0.667,
                _ => 0.556,
            })
            .sum::<f32>()
            * font_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One drawn line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Header,
    Plain,
    Shaded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellBox {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<TextLine>,
    /// Target of a clickable link covering the cell
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub style: RowStyle,
    pub top: f32,
    pub height: f32,
    pub cells: Vec<CellBox>,
}

impl PlacedRow {
    fn moved_to(mut self, top: f32) -> Self {
        let dy = top - self.top;
        self.top = top;
        for cell in &mut self.cells {
            cell.top += dy;
            for line in &mut cell.lines {
                line.baseline += dy;
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub logo: Option<ImageBox>,
    pub title: Vec<TextLine>,
    /// Header row first, then data rows
    pub rows: Vec<PlacedRow>,
}

impl PageLayout {
    /// Data rows on this page, header excluded
    pub fn data_rows(&self) -> impl Iterator<Item = &PlacedRow> {
        self.rows.iter().filter(|r| r.style != RowStyle::Header)
    }
}

/// What one table cell shows before layout
#[derive(Debug, Clone, PartialEq)]
struct CellContent {
    text: String,
    align: Align,
    link: Option<String>,
}

fn cell_content(
    value: &Value,
    kind: ColumnKind,
    plain: bool,
    labels: &ExportLabels,
) -> CellContent {
    if kind == ColumnKind::Url && is_url_value(value) {
        return CellContent {
            text: labels.open_link.clone(),
            align: Align::Right,
            link: Some(value.to_plain_text().trim().to_string()),
        };
    }
    let text = display_text(value, kind, plain);
    let align = if looks_arabic(&text) {
        Align::Right
    } else {
        Align::Left
    };
    CellContent {
        text,
        align,
        link: None,
    }
}

/// Greedy word wrap of logical text; words wider than the line are broken
/// between characters
pub fn wrap_text(text: &str, face: &dyn Typeface, font_size: f32, max_width: f32) -> Vec<String> {
    let fits = |s: &str| face.text_width(&face.prepare(s), font_size) <= max_width;
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
        lines.push(current);
    }
    lines
}

/// Document geometry shared by the layout steps
struct Frame<'a> {
    face: &'a dyn Typeface,
    left: f32,
    top: f32,
    bottom: f32,
    available: f32,
}

impl Frame<'_> {
    fn place_line(
        &self,
        text: &str,
        x: f32,
        width: f32,
        align: Align,
        baseline: f32,
        size: f32,
    ) -> TextLine {
        let drawn = self.face.prepare(text);
        let text_width = self.face.text_width(&drawn, size);
        let x = match align {
            Align::Left => x + CELL_PAD_X,
            Align::Center => x + (width - text_width) / 2.0,
            Align::Right => x + width - CELL_PAD_X - text_width,
        };
        TextLine {
            text: drawn,
            x,
            baseline,
            font_size: size,
        }
    }

    /// A row laid out at `top = 0`
    fn build_row(
        &self,
        cells: &[CellContent],
        columns: &[(f32, f32)],
        style: RowStyle,
        size: f32,
        leading: f32,
    ) -> PlacedRow {
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(columns)
            .map(|(cell, (_, width))| {
                wrap_text(&cell.text, self.face, size, (width - 2.0 * CELL_PAD_X).max(1.0))
            })
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = CELL_PAD_TOP + line_count as f32 * leading + CELL_PAD_BOTTOM;

        let cells = cells
            .iter()
            .zip(columns)
            .zip(wrapped)
            .map(|((cell, &(x, width)), lines)| CellBox {
                x,
                top: 0.0,
                width,
                height,
                lines: lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        let baseline = CELL_PAD_TOP + i as f32 * leading + size;
                        self.place_line(line, x, width, cell.align, baseline, size)
                    })
                    .collect(),
                link: cell.link.clone(),
            })
            .collect();

        PlacedRow {
            style,
            top: 0.0,
            height,
            cells,
        }
    }
}

/// The complete document, page by page
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub tier: DensityTier,
    pub column_widths: Vec<f32>,
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    /// Lay out a classified table.
    ///
    /// `logo` is the pixel size of the banner image, if one is drawn.
    pub fn plan(
        table: &ClassifiedTable<'_>,
        title: &str,
        logo: Option<(u32, u32)>,
        face: &dyn Typeface,
        settings: &DocumentSettings,
        labels: &ExportLabels,
    ) -> Self {
        let frame = Frame {
            face,
            left: settings.margin_left,
            top: settings.margin_top,
            bottom: PAGE_HEIGHT - settings.margin_bottom,
            available: PAGE_WIDTH - settings.margin_left - settings.margin_right,
        };
        let result = table.result();
        let tier = DensityTier::for_columns(result.column_count());

        let mut page = PageLayout::default();
        let mut y = frame.top;

        if let Some((w, h)) = logo {
            let logo_box = logo_box(w, h, &frame, settings);
            y += logo_box.height + BLOCK_GAP;
            page.logo = Some(logo_box);
        }

        if !title.trim().is_empty() {
            let size = settings.title_font_size;
            let leading = size + TITLE_LEADING;
            for line in wrap_text(title, face, size, frame.available) {
                page.title.push(frame.place_line(
                    &line,
                    frame.left,
                    frame.available,
                    Align::Center,
                    y + size,
                    size,
                ));
                y += leading;
            }
            y += BLOCK_GAP;
        }

        if result.column_count() == 0 {
            return Self {
                width: PAGE_WIDTH,
                height: PAGE_HEIGHT,
                tier,
                column_widths: Vec::new(),
                pages: vec![page],
            };
        }

        let size = tier.base_font_size();
        let headers: Vec<CellContent> = result
            .columns()
            .iter()
            .map(|name| CellContent {
                text: name.clone(),
                align: Align::Center,
                link: None,
            })
            .collect();
        let plain: Vec<bool> = result
            .columns()
            .iter()
            .map(|name| is_plain_number_column(name))
            .collect();
        let body: Vec<Vec<CellContent>> = result
            .rows()
            .iter()
            .map(|row| {
                row.values()
                    .iter()
                    .enumerate()
                    .map(|(idx, value)| cell_content(value, table.kind(idx), plain[idx], labels))
                    .collect()
            })
            .collect();

        let longest: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                body.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.text.chars().count())
                    .fold(header.text.chars().count(), usize::max)
            })
            .collect();
        let column_widths =
            document_column_widths(&longest, settings.char_width, tier, frame.available);
        let mut x = frame.left;
        let columns: Vec<(f32, f32)> = column_widths
            .iter()
            .map(|&w| {
                let column = (x, w);
                x += w;
                column
            })
            .collect();

        let header = frame.build_row(
            &headers,
            &columns,
            RowStyle::Header,
            size + HEADER_FONT_BUMP,
            size + HEADER_LEADING,
        );

        let mut pages = Vec::new();
        page.rows.push(header.clone().moved_to(y));
        y += header.height;

        for (i, cells) in body.iter().enumerate() {
            let style = if i % 2 == 0 {
                RowStyle::Plain
            } else {
                RowStyle::Shaded
            };
            let row = frame.build_row(cells, &columns, style, size, size + CELL_LEADING);
            let has_data = page.rows.len() > 1;
            if y + row.height > frame.bottom && has_data {
                pages.push(std::mem::take(&mut page));
                y = frame.top;
                page.rows.push(header.clone().moved_to(y));
                y += header.height;
            }
            let height = row.height;
            page.rows.push(row.moved_to(y));
            y += height;
        }
        pages.push(page);

        tracing::debug!(
            columns = column_widths.len(),
            rows = body.len(),
            pages = pages.len(),
            tier = ?tier,
            "Laid out document"
        );

        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            tier,
            column_widths,
            pages,
        }
    }
}

/// Banner box: aspect ratio kept, height clamped, centred and never wider
/// than the text block
fn logo_box(
    width_px: u32,
    height_px: u32,
    frame: &Frame<'_>,
    settings: &DocumentSettings,
) -> ImageBox {
    let ratio = if width_px == 0 {
        0.2
    } else {
        height_px as f32 / width_px as f32
    };
    let mut height = (frame.available * ratio * settings.logo_height_factor)
        .max(settings.min_logo_height)
        .min(settings.max_logo_height.max(settings.min_logo_height));
    let mut width = if ratio > 0.0 {
        height / ratio
    } else {
        frame.available
    };
    if width > frame.available {
        width = frame.available;
        height = width * ratio;
    }
    ImageBox {
        x: frame.left + (frame.available - width) / 2.0,
        top: frame.top,
        width,
        height,
    }
}

#[cfg(test)]
mod tests;
