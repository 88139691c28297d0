//! Branding asset lookup
//!
//! Assets are resolved from an ordered candidate list per kind; the first
//! regular, non-empty file wins. Lookup only reads the filesystem, so it is
//! repeated on every export call instead of being cached.

use std::path::{Path, PathBuf};

use crate::settings::AssetSettings;

/// The asset kinds an export can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Square site logo
    Logo,
    /// Banner logo drawn across the top of exports
    WideLogo,
    /// TrueType font with Arabic coverage
    ArabicFont,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::WideLogo => "wide_logo",
            AssetKind::ArabicFont => "arabic_font",
        }
    }
}

/// Resolves asset kinds to files on disk
#[derive(Debug, Clone)]
pub struct AssetResolver {
    settings: AssetSettings,
}

impl AssetResolver {
    pub fn new(settings: AssetSettings) -> Self {
        Self { settings }
    }

    /// Look only in one directory, with the default candidate names and no
    /// system fonts
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(AssetSettings {
            search_dirs: vec![dir.into()],
            system_fonts: Vec::new(),
            ..AssetSettings::default()
        })
    }

    /// Every path tried for `kind`, in order
    pub fn candidates(&self, kind: AssetKind) -> Vec<PathBuf> {
        let names = match kind {
            AssetKind::Logo => &self.settings.logo,
            AssetKind::WideLogo => &self.settings.wide_logo,
            AssetKind::ArabicFont => &self.settings.font,
        };
        let mut paths: Vec<PathBuf> = self
            .settings
            .search_dirs
            .iter()
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .collect();
        if kind == AssetKind::ArabicFont {
            paths.extend(self.settings.system_fonts.iter().cloned());
        }
        paths
    }

    pub fn resolve(&self, kind: AssetKind) -> Option<PathBuf> {
        let found = first_existing(self.candidates(kind));
        match &found {
            Some(path) => {
                tracing::debug!(asset = kind.as_str(), path = %path.display(), "Resolved asset")
            }
            None => tracing::debug!(asset = kind.as_str(), "Asset not found"),
        }
        found
    }

    /// Resolve and load everything an export may draw
    pub fn branding(&self) -> BrandingAssets {
        BrandingAssets {
            wide_logo: self
                .resolve(AssetKind::WideLogo)
                .and_then(|path| LogoImage::load(&path)),
            font: self
                .resolve(AssetKind::ArabicFont)
                .and_then(|path| FontAsset::load(&path)),
        }
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new(AssetSettings::default())
    }
}

/// First path that is a regular file with a non-zero size
pub fn first_existing<I, P>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().find_map(|p| {
        let path = p.as_ref();
        let meta = std::fs::metadata(path).ok()?;
        (meta.is_file() && meta.len() > 0).then(|| path.to_path_buf())
    })
}

/// Image bytes with their pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl LogoImage {
    /// Read and measure an image; unreadable or undecodable files are
    /// skipped with a warning
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read logo");
                return None;
            }
        };
        let (width, height) = match image::image_dimensions(path) {
            Ok(dims) => dims,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to decode logo");
                return None;
            }
        };
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            bytes,
            width,
            height,
        })
    }
}

/// Raw font file contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl FontAsset {
    pub fn load(path: &Path) -> Option<Self> {
        match std::fs::read(path) {
            Ok(bytes) => Some(Self {
                path: path.to_path_buf(),
                bytes,
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read font");
                None
            }
        }
    }
}

/// Assets resolved for a single export call
#[derive(Debug, Clone, Default)]
pub struct BrandingAssets {
    pub wide_logo: Option<LogoImage>,
    pub font: Option<FontAsset>,
}

impl BrandingAssets {
    /// No logo and the built-in typeface
    pub fn none() -> Self {
        Self::default()
    }
}
