//! Interactive command loop driving the converter.

use crate::config::Settings;
use crate::matcher::PRINTABLE;
use crate::output::{AsciiOutput, ConsoleOutput, HtmlOutput, OutputKind};
use crate::{
    step_resolution, AsciiArtAlgorithm, AsciiArtError, BrightnessMatcher, BuiltinGlyphs,
    FontGlyphs, GlyphSource, RasterImage, ResolutionStep,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

const PROMPT: &str = ">>> ";

/// Recoverable command failures; the Display text is what the user sees.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Did not execute due to incorrect command.")]
    IncorrectCommand,
    #[error("Did not change resolution due to incorrect format.")]
    ResolutionFormat,
    #[error("Did not change resolution due to exceeding boundaries.")]
    ResolutionBounds,
    #[error("Did not add due to incorrect format.")]
    AddFormat,
    #[error("Did not remove due to incorrect format.")]
    RemoveFormat,
    #[error("Did not change output method due to incorrect format.")]
    OutputFormat,
    #[error("Did not execute. Charset is empty.")]
    EmptyCharset,
    #[error("Did not execute due to problem with image file")]
    Image,
    #[error("Did not execute. Resolution {0} does not fit the image.")]
    ResolutionMismatch(u32),
    #[error("Did not execute: {0}")]
    Other(AsciiArtError),
}

impl From<AsciiArtError> for ShellError {
    fn from(e: AsciiArtError) -> Self {
        match e {
            AsciiArtError::EmptyCharset => Self::EmptyCharset,
            AsciiArtError::InvalidResolution { .. } => Self::ResolutionBounds,
            AsciiArtError::Decode { .. }
            | AsciiArtError::Encode { .. }
            | AsciiArtError::IndexOutOfRange { .. }
            | AsciiArtError::PixelCount { .. } => Self::Image,
            other => Self::Other(other),
        }
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Exit,
    Chars,
    Add(char, char),
    Remove(char, char),
    Res(ResolutionStep),
    Image(PathBuf),
    Output(OutputKind),
    AsciiArt,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ShellError> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();
        match name {
            "exit" => Ok(Self::Exit),
            "chars" => Ok(Self::Chars),
            "add" => {
                let (a, b) = arg.and_then(char_range).ok_or(ShellError::AddFormat)?;
                Ok(Self::Add(a, b))
            }
            "remove" => {
                let (a, b) = arg.and_then(char_range).ok_or(ShellError::RemoveFormat)?;
                Ok(Self::Remove(a, b))
            }
            "res" => match arg {
                Some("up") => Ok(Self::Res(ResolutionStep::Up)),
                Some("down") => Ok(Self::Res(ResolutionStep::Down)),
                _ => Err(ShellError::ResolutionFormat),
            },
            "image" => arg.map(|p| Self::Image(PathBuf::from(p))).ok_or(ShellError::Image),
            "output" => arg
                .and_then(|a| a.parse().ok())
                .map(Self::Output)
                .ok_or(ShellError::OutputFormat),
            "asciiArt" => Ok(Self::AsciiArt),
            _ => Err(ShellError::IncorrectCommand),
        }
    }
}

/// `all`, `space`, a single character, or `a-b`; ends in ascending order.
fn char_range(arg: &str) -> Option<(char, char)> {
    match arg {
        "all" => return Some(PRINTABLE),
        "space" => return Some((' ', ' ')),
        _ => {}
    }
    let chars: Vec<char> = arg.chars().collect();
    match chars.as_slice() {
        &[c] => Some((c, c)),
        &[a, '-', b] => Some((a.min(b), a.max(b))),
        _ => None,
    }
}

pub struct Shell {
    matcher: BrightnessMatcher,
    image: Option<RasterImage>,
    resolution: u32,
    output: Box<dyn AsciiOutput>,
    html_path: PathBuf,
    html_font: String,
}

impl Shell {
    /// Build from settings. A missing startup image is not fatal.
    pub fn new(settings: &Settings) -> crate::Result<Self> {
        let glyphs: Box<dyn GlyphSource> = match &settings.font {
            Some(path) => Box::new(FontGlyphs::from_file(path)?),
            None => Box::new(BuiltinGlyphs),
        };
        let matcher = BrightnessMatcher::boxed(glyphs, settings.charset.chars());
        let image = match RasterImage::open(&settings.image) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        };
        Ok(Self::with_parts(matcher, image, settings))
    }

    pub fn with_parts(matcher: BrightnessMatcher, image: Option<RasterImage>, settings: &Settings) -> Self {
        Self {
            matcher,
            image,
            resolution: settings.resolution,
            output: Box::new(ConsoleOutput),
            html_path: settings.html_path.clone(),
            html_font: settings.html_font.clone(),
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn matcher(&self) -> &BrightnessMatcher {
        &self.matcher
    }

    /// Read commands until `exit` or end of input, reporting failures to `out`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        if self.image.is_none() {
            writeln!(out, "{}", ShellError::Image)?;
        }
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next().transpose()? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            log::debug!("command: {line}");
            match self.execute(line, out) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    log::debug!("command failed: {e:?}");
                    writeln!(out, "{e}")?;
                }
            }
        }
        Ok(())
    }

    /// Run one command line. Returns `false` when the loop should stop.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<bool, ShellError> {
        match Command::parse(line)? {
            Command::Exit => return Ok(false),
            Command::Chars => {
                let chars: Vec<String> =
                    self.matcher.list_chars().iter().map(char::to_string).collect();
                writeln!(out, "{}", chars.join(" ")).map_err(io_error)?;
            }
            Command::Add(a, b) => self.matcher.add_range(a, b),
            Command::Remove(a, b) => self.matcher.remove_range(a, b),
            Command::Res(step) => {
                let image = self.image.as_ref().ok_or(ShellError::Image)?;
                self.resolution =
                    step_resolution(self.resolution, step, image.width(), image.height())?;
                writeln!(out, "Resolution set to {}.", self.resolution).map_err(io_error)?;
            }
            Command::Image(path) => {
                let image = RasterImage::open(&path).map_err(|e| {
                    log::warn!("{e}");
                    ShellError::Image
                })?;
                log::info!("loaded {} ({}x{})", path.display(), image.width(), image.height());
                self.image = Some(image);
            }
            Command::Output(kind) => {
                self.output = match kind {
                    OutputKind::Console => Box::new(ConsoleOutput),
                    OutputKind::Html => {
                        Box::new(HtmlOutput::new(self.html_path.clone(), self.html_font.clone()))
                    }
                };
            }
            Command::AsciiArt => {
                if self.matcher.is_empty() {
                    return Err(ShellError::EmptyCharset);
                }
                let image = self.image.as_ref().ok_or(ShellError::Image)?;
                let grid = AsciiArtAlgorithm::new(image, self.resolution)
                    .run(&mut self.matcher)
                    .map_err(|e| match e {
                        AsciiArtError::InvalidResolution { resolution, .. } => {
                            ShellError::ResolutionMismatch(resolution)
                        }
                        other => other.into(),
                    })?;
                self.output.out(&grid, out)?;
            }
        }
        Ok(true)
    }
}

fn io_error(e: io::Error) -> ShellError {
    ShellError::Other(AsciiArtError::Io(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::WHITE;

    fn shell(width: u32, height: u32) -> Shell {
        let settings = Settings::default();
        let matcher = BrightnessMatcher::new(BuiltinGlyphs, settings.charset.chars());
        Shell::with_parts(matcher, Some(RasterImage::filled(width, height, WHITE)), &settings)
    }

    fn exec(shell: &mut Shell, line: &str) -> (Result<bool, ShellError>, String) {
        let mut out = Vec::new();
        let result = shell.execute(line, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_char_arguments() {
        assert_eq!(Command::parse("add all").unwrap(), Command::Add(' ', '~'));
        assert_eq!(Command::parse("add space").unwrap(), Command::Add(' ', ' '));
        assert_eq!(Command::parse("remove x").unwrap(), Command::Remove('x', 'x'));
        assert_eq!(Command::parse("add m-a").unwrap(), Command::Add('a', 'm'));
        assert_eq!(Command::parse("add -").unwrap(), Command::Add('-', '-'));
        assert!(matches!(Command::parse("add ab"), Err(ShellError::AddFormat)));
        assert!(matches!(Command::parse("remove"), Err(ShellError::RemoveFormat)));
    }

    #[test]
    fn parses_other_commands() {
        assert_eq!(Command::parse("res up").unwrap(), Command::Res(ResolutionStep::Up));
        assert!(matches!(Command::parse("res sideways"), Err(ShellError::ResolutionFormat)));
        assert_eq!(Command::parse("output html").unwrap(), Command::Output(OutputKind::Html));
        assert!(matches!(Command::parse("output pdf"), Err(ShellError::OutputFormat)));
        assert!(matches!(Command::parse("draw"), Err(ShellError::IncorrectCommand)));
    }

    #[test]
    fn chars_lists_sorted_charset() {
        let mut sh = shell(16, 16);
        assert!(exec(&mut sh, "remove 2-9").0.is_ok());
        assert!(exec(&mut sh, "add #").0.is_ok());
        let (_, out) = exec(&mut sh, "chars");
        assert_eq!(out, "# 0 1\n");
    }

    #[test]
    fn res_up_beyond_width_is_rejected() {
        let mut sh = shell(130, 100);
        let (result, _) = exec(&mut sh, "res up");
        assert!(matches!(result, Err(ShellError::ResolutionBounds)));
        assert_eq!(sh.resolution(), 128);
        let (result, out) = exec(&mut sh, "res down");
        assert!(result.is_ok());
        assert_eq!(out, "Resolution set to 64.\n");
    }

    #[test]
    fn render_with_empty_charset_fails() {
        let mut sh = shell(16, 16);
        assert!(exec(&mut sh, "remove all").0.is_ok());
        let (result, _) = exec(&mut sh, "asciiArt");
        assert!(matches!(result, Err(ShellError::EmptyCharset)));
    }

    #[test]
    fn render_without_image_fails() {
        let settings = Settings::default();
        let matcher = BrightnessMatcher::new(BuiltinGlyphs, settings.charset.chars());
        let mut sh = Shell::with_parts(matcher, None, &settings);
        assert!(matches!(exec(&mut sh, "asciiArt").0, Err(ShellError::Image)));
        assert!(matches!(exec(&mut sh, "res up").0, Err(ShellError::Image)));
        assert!(matches!(exec(&mut sh, "image nowhere.png").0, Err(ShellError::Image)));
    }

    #[test]
    fn render_reports_resolution_that_no_longer_fits() {
        // 50x50 pads to 64x64, which 128 rows cannot divide
        let mut sh = shell(50, 50);
        let (result, _) = exec(&mut sh, "asciiArt");
        let err = result.unwrap_err();
        assert!(matches!(err, ShellError::ResolutionMismatch(128)));
        assert_eq!(err.to_string(), "Did not execute. Resolution 128 does not fit the image.");
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut sh = shell(16, 16);
        assert!(!exec(&mut sh, "exit").0.unwrap());
    }
}
