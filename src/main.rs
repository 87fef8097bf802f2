use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use glance_core::{Appearance, Config, ConfigError, WidgetError};
use glance_render::{encode, OutputFormat, WidgetView};

/// Render a home-screen widget to an image file.
#[derive(Parser)]
#[command(
    name = "glance",
    version,
    about = "Pollen and mobile data widgets rendered to SVG or PNG"
)]
struct Cli {
    #[command(subcommand)]
    widget: WidgetKind,

    /// Configuration file (default: <config dir>/glance/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Output file; `.svg` writes SVG, anything else PNG (default: <widget>.png)
    #[arg(long, short, value_name = "PATH", global = true)]
    output: Option<PathBuf>,

    /// Use the dark appearance
    #[arg(long, global = true)]
    dark: bool,

    /// Pixel scale for PNG output
    #[arg(long, default_value_t = 1.0, global = true)]
    scale: f32,
}

#[derive(Subcommand, Clone, Copy)]
enum WidgetKind {
    /// Today's pollen level for the current location
    Pollen,
    /// Remaining mobile data allowance
    MobileData,
}

impl WidgetKind {
    fn name(self) -> &'static str {
        match self {
            WidgetKind::Pollen => "pollen",
            WidgetKind::MobileData => "mobile-data",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    glance_core::init()?;
    let cli = Cli::parse();

    let view = match load_config(&cli) {
        Ok(config) => {
            let now = Local::now();
            tracing::info!("Rendering {} widget", cli.widget.name());
            match cli.widget {
                WidgetKind::Pollen => glance_pollen::render(&config, now).await,
                WidgetKind::MobileData => glance_mobile::render(&config, now).await,
            }
        }
        Err(e) => {
            tracing::error!("Could not render widget: {:#}", e);
            config_error_view(&e, appearance(cli.dark))
        }
    };

    if let Some(url) = &view.url {
        tracing::info!("Tap URL: {}", url);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", cli.widget.name())));
    write_view(&view, &output, cli.scale, appearance(cli.dark))?;

    Ok(())
}

fn appearance(dark: bool) -> Appearance {
    if dark {
        Appearance::Dark
    } else {
        Appearance::Light
    }
}

/// Error view for a configuration that could not be loaded, showing the
/// whole cause chain.
fn config_error_view(e: &anyhow::Error, appearance: Appearance) -> WidgetView {
    WidgetView::error(format!("{:#}", e), appearance)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.dark {
        config.appearance = Appearance::Dark;
    }

    let validation = config.validate();
    for warning in &validation.warnings {
        tracing::warn!("Config: {}", warning);
    }
    if !validation.is_valid() {
        return Err(ConfigError::Invalid(validation.error_summary()).into());
    }

    Ok(config)
}

fn write_view(view: &WidgetView, path: &Path, scale: f32, appearance: Appearance) -> Result<()> {
    let format = OutputFormat::from_path(path);
    let bytes = match encode(view, format, scale) {
        Ok(bytes) => bytes,
        Err(e) => {
            let e = WidgetError::from(e);
            tracing::error!("Could not render widget: {}", e);
            let fallback = WidgetView::failure(&e, appearance);
            encode(&fallback, format, scale).context("Failed to encode widget")?
        }
    };

    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write widget to {}", path.display()))?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}
