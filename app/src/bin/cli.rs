//! Command-line front end for the outfit generator.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use outfit_generator_lib::config::AppConfig;
use outfit_generator_lib::config::defaults::DEFAULT_FONT_COLORS;
use outfit_generator_lib::services::palette::{
    JsonPaletteRepository, PaletteRepository, add_color, remove_color, replace_color,
};
use outfit_generator_lib::services::{BatchRunner, FontLibrary};

#[derive(Parser, Debug)]
#[command(name = "outfit-generator", version, about = "Compose outfit images from category folders")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of outfit images.
    Generate(GenerateArgs),
    /// Show or edit the background color palette.
    Palette {
        #[command(subcommand)]
        action: PaletteAction,
    },
    /// List fonts and default colors available for labels.
    Fonts,
}

#[derive(Subcommand, Debug)]
enum PaletteAction {
    /// Print every color with its index.
    List,
    /// Append a color.
    Add { r: u8, g: u8, b: u8 },
    /// Overwrite the color at INDEX.
    Replace { index: usize, r: u8, g: u8, b: u8 },
    /// Remove the color at INDEX (the last color is kept).
    Remove { index: usize },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Number of images to generate.
    #[arg(long)]
    quantity: Option<u32>,

    /// Output directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory containing one folder per category.
    #[arg(long)]
    photos: Option<PathBuf>,

    /// Directory scanned for label fonts.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Seed for reproducible batches.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the batch report as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output format: png or jpg.
    #[arg(long)]
    format: Option<String>,

    /// Draw item names under each item.
    #[arg(long, default_value_t = false)]
    show_names: bool,

    /// Label font name, or "random".
    #[arg(long)]
    font: Option<String>,

    /// Label color as r,g,b.
    #[arg(long)]
    font_color: Option<String>,

    /// Watermark image; enables the watermark.
    #[arg(long)]
    watermark: Option<PathBuf>,

    /// Watermark position: above or below.
    #[arg(long)]
    watermark_position: Option<String>,

    /// Background blur (0-10).
    #[arg(long)]
    blur: Option<u32>,

    /// Background brightness (-100..100).
    #[arg(long, allow_hyphen_values = true)]
    brightness: Option<i32>,

    /// Gap between shirt and pants (0-100).
    #[arg(long)]
    garment_spacing: Option<u32>,

    /// Minimum gap between items (0-100).
    #[arg(long)]
    object_spacing: Option<u32>,

    /// Garment scale in percent (50-200).
    #[arg(long)]
    main_scale: Option<u32>,

    /// Accessory scale in percent (50-200).
    #[arg(long)]
    accessory_scale: Option<u32>,

    /// Accessories per image (at least 2).
    #[arg(long)]
    accessory_count: Option<u32>,

    /// Pick a random accessory count for every image.
    #[arg(long, default_value_t = false)]
    random_accessory_count: bool,
}

impl GenerateArgs {
    /// Flags given on the command line as setting key/value pairs.
    fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                out.push((key, value));
            }
        };
        push("QUANTITY", self.quantity.map(|v| v.to_string()));
        push("OUTPUT_DIR", self.output.as_ref().map(|p| p.display().to_string()));
        push("PHOTOS_DIR", self.photos.as_ref().map(|p| p.display().to_string()));
        push("FONTS_DIR", self.fonts_dir.as_ref().map(|p| p.display().to_string()));
        push("OUTPUT_FORMAT", self.format.clone());
        push("SHOW_NAMES", self.show_names.then(|| "true".to_string()));
        push("FONT", self.font.clone());
        push("FONT_COLOR", self.font_color.clone());
        push("WATERMARK_PATH", self.watermark.as_ref().map(|p| p.display().to_string()));
        push("WATERMARK_ENABLED", self.watermark.as_ref().map(|_| "true".to_string()));
        push("WATERMARK_POSITION", self.watermark_position.clone());
        push("BLUR", self.blur.map(|v| v.to_string()));
        push("BRIGHTNESS", self.brightness.map(|v| v.to_string()));
        push("GARMENT_SPACING", self.garment_spacing.map(|v| v.to_string()));
        push("OBJECT_SPACING", self.object_spacing.map(|v| v.to_string()));
        push("MAIN_SCALE", self.main_scale.map(|v| v.to_string()));
        push("ACCESSORY_SCALE", self.accessory_scale.map(|v| v.to_string()));
        push("ACCESSORY_COUNT", self.accessory_count.map(|v| v.to_string()));
        push(
            "RANDOM_ACCESSORY_COUNT",
            self.random_accessory_count.then(|| "true".to_string()),
        );
        out
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (config, data_dir) = outfit_generator_lib::init_foundation()?;
    let palette_repo = JsonPaletteRepository::in_data_dir(&data_dir);

    match cli.cmd {
        Command::Generate(args) => cmd_generate(config, &palette_repo, args),
        Command::Palette { action } => cmd_palette(&palette_repo, action),
        Command::Fonts => cmd_fonts(&config),
    }
}

fn cmd_generate(
    mut config: AppConfig,
    palette_repo: &JsonPaletteRepository,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    for (key, value) in args.overrides() {
        config.set(key, &value)?;
    }

    let runner = BatchRunner::prepare(config.generation(), palette_repo)
        .context("batch configuration is invalid")?;
    let report = match args.seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded generator");
            runner.run_with_rng(&mut StdRng::seed_from_u64(seed))
        }
        None => runner.run(),
    };

    for warning in report.warnings() {
        tracing::warn!("{warning}");
    }
    for failure in &report.failures {
        tracing::error!("Image {} failed: {}", failure.index, failure.error);
    }
    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }
    if report.is_total_failure() {
        anyhow::bail!("no image could be generated ({} failures)", report.failures.len());
    }
    println!(
        "Generated {} of {} image(s) in {}",
        report.written(),
        report.requested,
        runner.config().output_dir.display()
    );
    Ok(())
}

fn cmd_palette(repo: &JsonPaletteRepository, action: PaletteAction) -> anyhow::Result<()> {
    let colors = match action {
        PaletteAction::List => repo.load()?,
        PaletteAction::Add { r, g, b } => add_color(repo, [r, g, b])?,
        PaletteAction::Replace { index, r, g, b } => replace_color(repo, index, [r, g, b])?,
        PaletteAction::Remove { index } => remove_color(repo, index)?,
    };
    for (index, [r, g, b]) in colors.iter().enumerate() {
        println!("{index}: {r},{g},{b}");
    }
    Ok(())
}

fn cmd_fonts(config: &AppConfig) -> anyhow::Result<()> {
    let library = FontLibrary::scan(&config.fonts_dir);
    if library.is_empty() {
        println!(
            "No fonts in {} (a system font is used for labels)",
            config.fonts_dir.display()
        );
    }
    for name in library.names() {
        println!("{name}");
    }
    let colors: Vec<String> = DEFAULT_FONT_COLORS
        .iter()
        .map(|[r, g, b]| format!("{r},{g},{b}"))
        .collect();
    println!("Label colors: {}", colors.join("  "));
    Ok(())
}
