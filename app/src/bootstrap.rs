use std::path::PathBuf;

use crate::config::AppConfig;

/// Load `.env`, create the data directory and read the configuration.
pub fn init_foundation() -> Result<(AppConfig, PathBuf), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let config = AppConfig::load(&dir)?;
    tracing::info!(
        "Settings loaded (data_dir={}, output={})",
        dir.display(),
        config.output_dir.display()
    );
    Ok((config, dir))
}

/// Determine the data directory for the application.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OUTFIT_GENERATOR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".outfit-generator")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
