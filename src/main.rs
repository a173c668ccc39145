//! glyphgrid CLI - interactive image to ASCII art shell

use clap::Parser;
use glyphgrid::config::Settings;
use glyphgrid::shell::Shell;
use glyphgrid::AsciiArtError;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glyphgrid", about = "Convert images to ASCII art interactively")]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Image loaded at startup
    #[arg(short, long)]
    image: Option<PathBuf>,
    /// Initial resolution (sub-image rows)
    #[arg(short, long)]
    resolution: Option<u32>,
    /// Initial charset
    #[arg(long)]
    charset: Option<String>,
    /// TrueType font used to derive glyph brightness
    #[arg(short, long)]
    font: Option<PathBuf>,
    /// Path written by `output html`
    #[arg(long)]
    html: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), AsciiArtError> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();

    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(image) = args.image {
        settings.image = image;
    }
    if let Some(resolution) = args.resolution {
        settings.resolution = resolution;
    }
    if let Some(charset) = args.charset {
        settings.charset = charset;
    }
    if let Some(font) = args.font {
        settings.font = Some(font);
    }
    if let Some(html) = args.html {
        settings.html_path = html;
    }
    log::debug!("{settings:?}");

    let mut shell = Shell::new(&settings)?;
    let stdin = std::io::stdin();
    shell.run(stdin.lock(), &mut std::io::stdout())?;
    Ok(())
}
