//! PDF export
//!
//! Draws a [`DocumentLayout`] with printpdf. The Arabic font from the
//! branding assets is embedded when it loads; otherwise the document falls
//! back to the built-in Helvetica and the layout is redone with its
//! metrics.

use std::io::Cursor;

use hisab_core::ClassifiedTable;
use printpdf::image_crate::{self, DynamicImage};
use printpdf::path::PaintMode;
use printpdf::{
    Actions, BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, LinkAnnotation, Mm,
    PdfDocument, PdfLayerReference, Rect, Rgb,
};

use crate::assets::{BrandingAssets, LogoImage};
use crate::error::{ExportError, Result};
use crate::pdf_layout::{
    BuiltinFace, DocumentLayout, EmbeddedFace, ImageBox, PageLayout, PlacedRow, RowStyle,
    TextLine, Typeface,
};
use crate::settings::ExportSettings;

const TITLE_COLOR: (u8, u8, u8) = (0x1b, 0x1b, 0x1b);
const TEXT_COLOR: (u8, u8, u8) = (0x11, 0x18, 0x27);
const HEADER_BACKGROUND: (u8, u8, u8) = (0x1E, 0x3A, 0x8A);
/// whitesmoke
const HEADER_TEXT: (u8, u8, u8) = (0xF5, 0xF5, 0xF5);
const GRID_COLOR: (u8, u8, u8) = (0xcb, 0xd5, 0xe1);
const SHADED_BACKGROUND: (u8, u8, u8) = (0xf7, 0xfa, 0xfc);
const LINK_COLOR: (u8, u8, u8) = (0x1a, 0x56, 0xdb);
const GRID_THICKNESS: f32 = 0.35;
const LAYER_NAME: &str = "Table";

/// Which font the document embeds
enum FontSource<'a> {
    Embedded(&'a [u8]),
    Builtin,
}

/// Render the classified table as a landscape A4 PDF.
///
/// Never fails for lack of branding: a missing or unreadable font falls back
/// to Helvetica and a missing or undecodable logo is skipped.
pub fn render_document(
    table: &ClassifiedTable<'_>,
    title: &str,
    branding: &BrandingAssets,
    settings: &ExportSettings,
) -> Result<Vec<u8>> {
    let logo = branding.wide_logo.as_ref().and_then(decode_logo);

    if let Some(font) = &branding.font {
        let embedded = EmbeddedFace::parse(&font.bytes).and_then(|face| {
            draw(
                table,
                title,
                logo.as_ref(),
                &face,
                FontSource::Embedded(&font.bytes),
                settings,
            )
        });
        match embedded {
            Ok(bytes) => return Ok(bytes),
            Err(e) => tracing::warn!(
                path = %font.path.display(),
                error = %e,
                "Falling back to built-in font"
            ),
        }
    }

    draw(
        table,
        title,
        logo.as_ref(),
        &BuiltinFace,
        FontSource::Builtin,
        settings,
    )
}

/// A logo ready to embed
struct DecodedLogo {
    image: DynamicImage,
    width: u32,
    height: u32,
}

fn decode_logo(logo: &LogoImage) -> Option<DecodedLogo> {
    match image_crate::load_from_memory(&logo.bytes) {
        // Alpha channels are flattened; the document has no soft masks.
        Ok(img) => {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            Some(DecodedLogo {
                image: DynamicImage::ImageRgb8(rgb),
                width,
                height,
            })
        }
        Err(e) => {
            tracing::warn!(path = %logo.path.display(), error = %e, "Skipping logo");
            None
        }
    }
}

fn draw(
    table: &ClassifiedTable<'_>,
    title: &str,
    logo: Option<&DecodedLogo>,
    face: &dyn Typeface,
    source: FontSource<'_>,
    settings: &ExportSettings,
) -> Result<Vec<u8>> {
    let logo_size = logo.map(|l| (l.width, l.height));
    let layout = DocumentLayout::plan(
        table,
        title,
        logo_size,
        face,
        &settings.document,
        &settings.labels(),
    );

    let doc_title = if title.trim().is_empty() {
        "Export"
    } else {
        title
    };
    let (doc, first_page, first_layer) = PdfDocument::new(
        doc_title,
        mm(layout.width),
        mm(layout.height),
        LAYER_NAME,
    );
    let font = match source {
        FontSource::Embedded(bytes) => doc.add_external_font(Cursor::new(bytes)),
        FontSource::Builtin => doc.add_builtin_font(BuiltinFont::Helvetica),
    }
    .map_err(pdf_error)?;

    let canvas = Canvas {
        height: layout.height,
        font: &font,
    };
    for (idx, page) in layout.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) =
                doc.add_page(mm(layout.width), mm(layout.height), LAYER_NAME);
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        canvas.draw_page(&layer, page, logo);
    }

    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    tracing::debug!(
        pages = layout.pages.len(),
        tier = ?layout.tier,
        bytes = bytes.len(),
        "Rendered document"
    );
    Ok(bytes)
}

fn pdf_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// Points to printpdf millimetres
fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Converts top-down layout coordinates into PDF space while drawing
struct Canvas<'a> {
    height: f32,
    font: &'a IndirectFontRef,
}

impl Canvas<'_> {
    fn draw_page(
        &self,
        layer: &PdfLayerReference,
        page: &PageLayout,
        logo: Option<&DecodedLogo>,
    ) {
        if let (Some(logo), Some(placement)) = (logo, page.logo) {
            self.draw_logo(layer, logo, placement);
        }

        layer.set_fill_color(rgb(TITLE_COLOR));
        for line in &page.title {
            self.draw_text(layer, line);
        }

        layer.set_outline_color(rgb(GRID_COLOR));
        layer.set_outline_thickness(GRID_THICKNESS);
        for row in &page.rows {
            self.draw_row(layer, row);
        }
    }

    fn draw_logo(&self, layer: &PdfLayerReference, logo: &DecodedLogo, placement: ImageBox) {
        let (width_px, height_px) = (logo.width.max(1), logo.height.max(1));
        Image::from_dynamic_image(&logo.image).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(mm(placement.x)),
                translate_y: Some(mm(self.height - placement.top - placement.height)),
                scale_x: Some(placement.width / width_px as f32),
                scale_y: Some(placement.height / height_px as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
    }

    fn draw_row(&self, layer: &PdfLayerReference, row: &PlacedRow) {
        let background = match row.style {
            RowStyle::Header => Some(HEADER_BACKGROUND),
            RowStyle::Shaded => Some(SHADED_BACKGROUND),
            RowStyle::Plain => None,
        };
        for cell in &row.cells {
            let rect = self.rect(cell.x, cell.top, cell.width, cell.height);
            if let Some(color) = background {
                layer.set_fill_color(rgb(color));
                layer.add_rect(rect.clone().with_mode(PaintMode::Fill));
            }
            layer.add_rect(rect.clone().with_mode(PaintMode::Stroke));

            let text_color = match (row.style, &cell.link) {
                (RowStyle::Header, _) => HEADER_TEXT,
                (_, Some(_)) => LINK_COLOR,
                _ => TEXT_COLOR,
            };
            layer.set_fill_color(rgb(text_color));
            for line in &cell.lines {
                self.draw_text(layer, line);
            }

            if let Some(url) = &cell.link {
                layer.add_link_annotation(LinkAnnotation::new(
                    rect,
                    None,
                    None,
                    Actions::uri(url.clone()),
                    None,
                ));
            }
        }
    }

    fn draw_text(&self, layer: &PdfLayerReference, line: &TextLine) {
        layer.use_text(
            line.text.as_str(),
            line.font_size,
            mm(line.x),
            mm(self.height - line.baseline),
            self.font,
        );
    }

    /// Rectangle from a top-down box
    fn rect(&self, x: f32, top: f32, width: f32, height: f32) -> Rect {
        let bottom = self.height - top - height;
        Rect::new(mm(x), mm(bottom), mm(x + width), mm(bottom + height))
    }
}
