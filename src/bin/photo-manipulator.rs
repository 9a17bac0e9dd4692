use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "photo-manipulator", version)]
struct Cli {
    /// Configuration JSON (cache, fonts and assets directories).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the output directory from the configuration.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw styled text onto a background image.
    Text(TextArgs),
    /// Draw an image onto a background image.
    Overlay(OverlayArgs),
}

#[derive(Parser, Debug)]
struct TextArgs {
    /// Background image: path, `file://`, `asset://`, `http(s)://` or `data:` URI.
    #[arg(long)]
    background: String,

    /// Text styles as a JSON array (or a single object).
    #[arg(long, conflicts_with = "styles_file", required_unless_present = "styles_file")]
    styles: Option<String>,

    /// Read the text styles JSON from a file.
    #[arg(long)]
    styles_file: Option<PathBuf>,

    /// Output mime type (`image/png` or `image/jpeg`).
    #[arg(long)]
    mime: Option<String>,
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Background image.
    #[arg(long)]
    background: String,

    /// Image drawn on top.
    #[arg(long)]
    overlay: String,

    /// Left edge of the overlay in background pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    x: f64,

    /// Top edge of the overlay in background pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    y: f64,

    /// Output mime type (`image/png` or `image/jpeg`).
    #[arg(long)]
    mime: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }
    let ctx = photo_manipulator::PhotoContext::new(config)?;

    let out = match cli.cmd {
        Command::Text(args) => cmd_text(&ctx, args)?,
        Command::Overlay(args) => cmd_overlay(&ctx, args)?,
    };
    println!("{}", out.display());
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<photo_manipulator::PhotoConfig> {
    match path {
        Some(p) => Ok(photo_manipulator::PhotoConfig::from_path(p)?),
        None => Ok(photo_manipulator::PhotoConfig::default()),
    }
}

fn cmd_text(ctx: &photo_manipulator::PhotoContext, args: TextArgs) -> anyhow::Result<PathBuf> {
    let raw = match (args.styles, args.styles_file) {
        (Some(s), _) => s,
        (None, Some(p)) => std::fs::read_to_string(&p)
            .with_context(|| format!("read styles '{}'", p.display()))?,
        (None, None) => anyhow::bail!("either --styles or --styles-file is required"),
    };
    let value: serde_json::Value = serde_json::from_str(&raw).context("parse styles JSON")?;
    let styles = photo_manipulator::styles_from_json(value)?;
    Ok(ctx.render_text(&args.background, &styles, args.mime.as_deref())?)
}

fn cmd_overlay(ctx: &photo_manipulator::PhotoContext, args: OverlayArgs) -> anyhow::Result<PathBuf> {
    Ok(ctx.composite_overlay(
        &args.background,
        &args.overlay,
        photo_manipulator::Anchor::new(args.x, args.y),
        args.mime.as_deref(),
    )?)
}
