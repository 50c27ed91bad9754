//! Background color palette persisted as a JSON array of `[r, g, b]`.

use std::path::{Path, PathBuf};

/// An RGB triple as stored in the palette file.
pub type RgbColor = [u8; 3];

/// File name of the palette inside the data directory.
pub const PALETTE_FILE: &str = "background_palette.json";

/// Palette used when nothing is stored yet: beige, light blue, navy, light green.
pub const DEFAULT_PALETTE: [RgbColor; 4] = [
    [245, 245, 220],
    [173, 216, 230],
    [25, 25, 112],
    [144, 238, 144],
];

#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("Palette must keep at least one color")]
    LastColor,
    #[error("No palette color at index {0}")]
    IndexOutOfRange(usize),
    #[error("Invalid palette file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load-once / save-on-mutate storage for the palette.
pub trait PaletteRepository {
    fn load(&self) -> Result<Vec<RgbColor>, PaletteError>;
    fn save(&self, colors: &[RgbColor]) -> Result<(), PaletteError>;
}

/// Palette stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonPaletteRepository {
    path: PathBuf,
}

impl JsonPaletteRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Repository at `<data_dir>/background_palette.json`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PALETTE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PaletteRepository for JsonPaletteRepository {
    /// A missing file yields [`DEFAULT_PALETTE`].
    fn load(&self) -> Result<Vec<RgbColor>, PaletteError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No palette at {}, using defaults", self.path.display());
                Ok(DEFAULT_PALETTE.to_vec())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, colors: &[RgbColor]) -> Result<(), PaletteError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(colors)?)?;
        tracing::info!(count = colors.len(), "Background palette saved");
        Ok(())
    }
}

/// Append a color and persist.
pub fn add_color(
    repo: &dyn PaletteRepository,
    color: RgbColor,
) -> Result<Vec<RgbColor>, PaletteError> {
    let mut colors = repo.load()?;
    colors.push(color);
    repo.save(&colors)?;
    Ok(colors)
}

/// Overwrite the color at `index` and persist.
pub fn replace_color(
    repo: &dyn PaletteRepository,
    index: usize,
    color: RgbColor,
) -> Result<Vec<RgbColor>, PaletteError> {
    let mut colors = repo.load()?;
    let slot = colors
        .get_mut(index)
        .ok_or(PaletteError::IndexOutOfRange(index))?;
    *slot = color;
    repo.save(&colors)?;
    Ok(colors)
}

/// Remove the color at `index` and persist. The last color cannot be removed.
pub fn remove_color(
    repo: &dyn PaletteRepository,
    index: usize,
) -> Result<Vec<RgbColor>, PaletteError> {
    let mut colors = repo.load()?;
    if index >= colors.len() {
        return Err(PaletteError::IndexOutOfRange(index));
    }
    if colors.len() == 1 {
        return Err(PaletteError::LastColor);
    }
    colors.remove(index);
    repo.save(&colors)?;
    Ok(colors)
}
