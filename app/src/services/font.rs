//! Label font discovery and loading.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use rand::Rng;

const VALID_EXTENSIONS: &[&str] = &[".ttf", ".otf"];

/// Selection value meaning "pick any installed font".
pub const RANDOM_FONT: &str = "random";

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Invalid font data in {0}")]
    InvalidFont(PathBuf),
    #[error("No usable font found (add .ttf/.otf files to the fonts directory or install system fonts)")]
    NoFontAvailable,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which font labels are drawn with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSelection {
    Random,
    Named(String),
}

impl FontSelection {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case(RANDOM_FONT) {
            Self::Random
        } else {
            Self::Named(value.to_string())
        }
    }
}

impl fmt::Display for FontSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str(RANDOM_FONT),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A parsed font ready for drawing.
pub struct LoadedFont {
    pub name: String,
    pub font: FontVec,
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont").field("name", &self.name).finish()
    }
}

/// Fonts found in the fonts directory, keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    fonts: BTreeMap<String, PathBuf>,
}

impl FontLibrary {
    /// Enumerate `.ttf`/`.otf` files in `dir`. A missing directory gives an
    /// empty library.
    pub fn scan(dir: &Path) -> Self {
        let mut fonts = BTreeMap::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Fonts directory {} not readable: {e}", dir.display());
                return Self { fonts };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !has_font_extension(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                fonts.insert(stem.to_string(), path);
            }
        }
        tracing::debug!(count = fonts.len(), dir = %dir.display(), "Scanned fonts");
        Self { fonts }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Load the selected font. Falls back to a system font when the library
    /// is empty, the named font is not installed, or the font file cannot be
    /// read or parsed.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        selection: &FontSelection,
        rng: &mut R,
    ) -> Result<LoadedFont, FontError> {
        let chosen = match selection {
            FontSelection::Random if !self.fonts.is_empty() => {
                let idx = rng.gen_range(0..self.fonts.len());
                self.fonts.iter().nth(idx)
            }
            FontSelection::Random => None,
            FontSelection::Named(name) => {
                let found = self
                    .fonts
                    .iter()
                    .find(|(stem, _)| stem.eq_ignore_ascii_case(name));
                if found.is_none() {
                    tracing::warn!("Font '{name}' not found, falling back to a system font");
                }
                found
            }
        };

        let Some((name, path)) = chosen else {
            return load_system_font();
        };
        load_font(name, path).or_else(|e| {
            tracing::warn!("Font '{name}' unusable ({e}), falling back to a system font");
            load_system_font()
        })
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .is_some_and(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
}

fn load_font(name: &str, path: &Path) -> Result<LoadedFont, FontError> {
    let data = std::fs::read(path)?;
    let font = FontVec::try_from_vec(data).map_err(|_| FontError::InvalidFont(path.to_path_buf()))?;
    tracing::debug!(font = name, "Loaded label font");
    Ok(LoadedFont {
        name: name.to_string(),
        font,
    })
}

/// First readable font among well-known system locations.
pub fn load_system_font() -> Result<LoadedFont, FontError> {
    for path in system_font_candidates() {
        let path = Path::new(path);
        let Ok(data) = std::fs::read(path) else {
            continue;
        };
        if let Ok(font) = FontVec::try_from_vec(data) {
            tracing::info!(path = %path.display(), "Using system font for labels");
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("system")
                .to_string();
            return Ok(LoadedFont { name, font });
        }
    }
    Err(FontError::NoFontAvailable)
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\arial.ttf",
            "C:\\Windows\\Fonts\\segoeui.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ]
    }
}
