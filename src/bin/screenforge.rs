use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use screenforge::{
    DEVICE_SIZES, RenderSurface, Renderer, Screenshot, export_all_as_zip, export_image,
};

#[derive(Parser, Debug)]
#[command(name = "screenforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one screenshot config as a PNG.
    Render(RenderArgs),
    /// Render a project (a JSON list of screenshot configs) as a ZIP archive.
    Export(ExportArgs),
    /// List the built-in output device sizes.
    Devices,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input screenshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output device id (unknown ids fall back to the first catalog entry).
    #[arg(long, default_value = "iphone-6.9")]
    device: String,

    /// Screenshot image to composite: a file path or a `data:` URI.
    /// Overrides the config's own `imageData`.
    #[arg(long)]
    image: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project JSON: a list of screenshot configs.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output device id (unknown ids fall back to the first catalog entry).
    #[arg(long, default_value = "iphone-6.9")]
    device: String,

    /// Output ZIP path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
        Command::Devices => cmd_devices(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut screenshot: Screenshot = read_json(&args.in_path)?;
    if args.image.is_some() {
        screenshot.image_data = args.image;
    }

    let mut renderer = Renderer::new();
    let mut surface = RenderSurface::new(1, 1)?;
    let png = export_image(&mut renderer, &mut surface, &screenshot, &args.device)?;

    write_output(&args.out, &png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let screenshots: Vec<Screenshot> = read_json(&args.in_path)?;

    let mut renderer = Renderer::new();
    let archive = export_all_as_zip(&mut renderer, &screenshots, &args.device)?;

    write_output(&args.out, &archive)?;
    eprintln!(
        "wrote {} ({} screenshots)",
        args.out.display(),
        screenshots.len()
    );
    Ok(())
}

fn cmd_devices() -> anyhow::Result<()> {
    for d in DEVICE_SIZES {
        println!("{:<16} {:>4}x{:<4} {}", d.id, d.width, d.height, d.name);
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse '{}'", path.display()))
}

fn write_output(path: &PathBuf, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
