//! Export settings
//!
//! Presentation constants, label presets and asset search paths. Settings
//! live in `export.toml` under the user's config directory; every field has
//! a default, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use hisab_core::SheetWidthPolicy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Language of the fixed labels written into exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLocale {
    #[default]
    English,
    Arabic,
}

impl std::str::FromStr for LabelLocale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(LabelLocale::English),
            "ar" | "arabic" => Ok(LabelLocale::Arabic),
            other => Err(format!("unknown label locale: {}", other)),
        }
    }
}

/// Fixed captions for the summary rows and link cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLabels {
    pub total: String,
    pub row_count: String,
    pub open_link: String,
}

impl ExportLabels {
    pub fn english() -> Self {
        Self {
            total: "Total".to_string(),
            row_count: "Row Count".to_string(),
            open_link: "Open Link".to_string(),
        }
    }

    pub fn arabic() -> Self {
        Self {
            total: "المجموع".to_string(),
            row_count: "عدد الصفوف".to_string(),
            open_link: "فتح الرابط".to_string(),
        }
    }

    pub fn for_locale(locale: LabelLocale) -> Self {
        match locale {
            LabelLocale::English => Self::english(),
            LabelLocale::Arabic => Self::arabic(),
        }
    }
}

impl Default for ExportLabels {
    fn default() -> Self {
        Self::english()
    }
}

/// Workbook presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    /// Worksheet name; truncated to 31 characters when written
    pub name: String,
    pub zoom: u16,
    pub widths: SheetWidthPolicy,
    pub title_font_size: f64,
    /// Title row height in points
    pub title_row_height: f64,
    /// Height of the blank row between title and table
    pub spacer_row_height: f64,
    /// Page margins in inches: left, right, top, bottom
    pub margins: [f64; 4],
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            name: "Data".to_string(),
            zoom: 115,
            widths: SheetWidthPolicy::default(),
            title_font_size: 16.0,
            title_row_height: 28.0,
            spacer_row_height: 16.0,
            margins: [0.3, 0.3, 0.5, 0.5],
        }
    }
}

/// PDF presentation, all lengths in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Width of one character in the column width estimate
    pub char_width: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub title_font_size: f32,
    /// Logo height as a fraction of its aspect-preserving height at full width
    pub logo_height_factor: f32,
    pub min_logo_height: f32,
    pub max_logo_height: f32,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            char_width: 6.4,
            margin_left: 14.0,
            margin_right: 14.0,
            margin_top: 18.0,
            margin_bottom: 14.0,
            title_font_size: 14.0,
            logo_height_factor: 0.55,
            min_logo_height: 22.0,
            max_logo_height: 120.0,
        }
    }
}

/// Where branding assets are looked up, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directories searched for every relative candidate name
    pub search_dirs: Vec<PathBuf>,
    pub logo: Vec<String>,
    pub wide_logo: Vec<String>,
    pub font: Vec<String>,
    /// Absolute font paths tried after the search directories
    pub system_fonts: Vec<PathBuf>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        let mut search_dirs = vec![PathBuf::from("assets")];
        if let Some(config) = dirs::config_dir() {
            search_dirs.push(config.join("hisab").join("assets"));
        }
        Self {
            search_dirs,
            logo: vec!["logo.png".to_string()],
            wide_logo: vec![
                "logo_wide.png".to_string(),
                "logo_wide.jpg".to_string(),
                "logo_wide.jpeg".to_string(),
            ],
            font: vec![
                "Cairo-Regular.ttf".to_string(),
                "Amiri-Regular.ttf".to_string(),
            ],
            system_fonts: vec![PathBuf::from(
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            )],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub locale: LabelLocale,
    /// Explicit labels; when absent the locale preset is used
    pub labels: Option<ExportLabels>,
    /// Whether the spreadsheet gets the logo banner
    pub include_logo: bool,
    pub sheet: SheetSettings,
    pub document: DocumentSettings,
    pub assets: AssetSettings,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            locale: LabelLocale::default(),
            labels: None,
            include_logo: true,
            sheet: SheetSettings::default(),
            document: DocumentSettings::default(),
            assets: AssetSettings::default(),
        }
    }
}

impl ExportSettings {
    /// Labels in effect
    pub fn labels(&self) -> ExportLabels {
        self.labels
            .clone()
            .unwrap_or_else(|| ExportLabels::for_locale(self.locale))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded export settings");
        Ok(settings)
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists there
    pub fn load_or_default() -> Result<Self> {
        match Self::settings_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/hisab/export.toml`
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hisab").join("export.toml"))
    }
}
