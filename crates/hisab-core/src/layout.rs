//! Column width estimation shared by the spreadsheet and document renderers
//!
//! Both renderers size a column from the longest text it has to show
//! (header included). They differ only in the units and caps they apply on
//! top of that length.

use serde::{Deserialize, Serialize};

/// Length in characters of the longest of `header` and `cells`
pub fn longest_text_len<S: AsRef<str>>(header: &str, cells: impl IntoIterator<Item = S>) -> usize {
    cells
        .into_iter()
        .map(|c| c.as_ref().chars().count())
        .fold(header.chars().count(), usize::max)
}

/// Character-count sizing for spreadsheet columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetWidthPolicy {
    /// Characters added to the longest text
    pub padding_chars: f64,
    /// Upper bound on a column width, in characters
    pub max_chars: f64,
    /// Approximate rendered width of one character
    pub px_per_char: f64,
}

impl Default for SheetWidthPolicy {
    fn default() -> Self {
        Self {
            padding_chars: 4.0,
            max_chars: 60.0,
            px_per_char: 7.2,
        }
    }
}

impl SheetWidthPolicy {
    /// Column width in characters for a column whose longest text is `longest`
    pub fn column_chars(&self, longest: usize) -> f64 {
        (longest as f64 + self.padding_chars).min(self.max_chars)
    }

    pub fn chars_to_pixels(&self, chars: f64) -> f64 {
        chars * self.px_per_char
    }

    /// Total table width in pixels, used to stretch the logo banner
    pub fn table_pixels(&self, widths_chars: &[f64]) -> f64 {
        self.chars_to_pixels(widths_chars.iter().sum())
    }
}

/// Three-step density policy for document tables.
///
/// Wide tables get a narrower per-column cap and a smaller base font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityTier {
    /// Fewer than 9 columns
    Regular,
    /// 9 to 11 columns
    Dense,
    /// 12 or more columns
    Compact,
}

impl DensityTier {
    pub fn for_columns(count: usize) -> Self {
        match count {
            c if c >= 12 => DensityTier::Compact,
            c if c >= 9 => DensityTier::Dense,
            _ => DensityTier::Regular,
        }
    }

    /// Maximum column width in points
    pub fn max_column_width(&self) -> f32 {
        match self {
            DensityTier::Regular => 150.0,
            DensityTier::Dense => 125.0,
            DensityTier::Compact => 110.0,
        }
    }

    /// Base cell font size in points
    pub fn base_font_size(&self) -> f32 {
        match self {
            DensityTier::Regular => 8.0,
            DensityTier::Dense => 7.5,
            DensityTier::Compact => 7.0,
        }
    }
}

/// Estimate document column widths in points.
///
/// Each width is `longest × char_width` capped at the tier maximum. When
/// the sum exceeds `available`, every width is scaled by the same factor so
/// the table fits exactly.
pub fn document_column_widths(
    longest: &[usize],
    char_width: f32,
    tier: DensityTier,
    available: f32,
) -> Vec<f32> {
    let cap = tier.max_column_width();
    let mut widths: Vec<f32> = longest
        .iter()
        .map(|&len| (len.max(1) as f32 * char_width).min(cap))
        .collect();
    fit_to_width(&mut widths, available);
    widths
}

/// Scale all widths uniformly down so their sum equals `available`.
/// Widths that already fit are left alone.
pub fn fit_to_width(widths: &mut [f32], available: f32) {
    let total: f32 = widths.iter().sum();
    if total > available && total > 0.0 {
        let factor = available / total;
        for w in widths.iter_mut() {
            *w *= factor;
        }
    }
}
