//! Configuration management: defaults, validation, loading from the
//! settings file + environment + command line.

pub mod app_config;
pub mod defaults;
pub mod validation;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use app_config::{AppConfig, GenerationConfig, WatermarkConfig};

/// Errors that stop a batch before any image is produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidSetting { key: String, message: String },

    #[error("Failed to read settings file {path}: {source}")]
    SettingsFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Output directory {path} is not usable: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Category '{0}' has no images")]
    EmptyCategory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encoded file format of generated images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(format!("unsupported output format: {other} (expected png or jpg)")),
        }
    }
}

/// Parse `"r,g,b"` into a color triple.
pub fn parse_rgb(value: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let &[r, g, b] = parts.as_slice() else {
        return Err("must be three comma-separated values (r,g,b)".into());
    };
    let channel = |s: &str| {
        s.parse::<u8>()
            .map_err(|_| format!("color channel '{s}' must be 0-255"))
    };
    Ok([channel(r)?, channel(g)?, channel(b)?])
}
