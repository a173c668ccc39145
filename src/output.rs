//! Output renderers for a finished character grid.

use crate::{CharGrid, Result};
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

pub trait AsciiOutput {
    /// Emit `grid`. Console output goes to `sink`; file outputs may ignore it.
    fn out(&self, grid: &CharGrid, sink: &mut dyn Write) -> Result<()>;
}

/// Plain text, one line per row, cells separated by a space.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOutput;

impl AsciiOutput for ConsoleOutput {
    fn out(&self, grid: &CharGrid, sink: &mut dyn Write) -> Result<()> {
        for row in grid {
            let line: Vec<String> = row.iter().map(char::to_string).collect();
            writeln!(sink, "{}", line.join(" "))?;
        }
        sink.flush()?;
        Ok(())
    }
}

/// HTML document with one `<p>` per row in a monospace font.
#[derive(Debug, Clone)]
pub struct HtmlOutput {
    pub path: PathBuf,
    pub font: String,
}

impl HtmlOutput {
    pub fn new(path: impl Into<PathBuf>, font: impl Into<String>) -> Self {
        Self { path: path.into(), font: font.into() }
    }

    pub fn render(&self, grid: &CharGrid) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<title>ASCII Art</title>\n</head>\n");
        html.push_str("<body style=\"background-color:white\">\n");
        let _ = writeln!(
            html,
            "<div style=\"font-family:'{}',monospace;font-size:8px;line-height:1;letter-spacing:2px\">",
            escape(&self.font)
        );
        for row in grid {
            html.push_str("<p style=\"margin:0\">");
            for &c in row {
                match c {
                    ' ' => html.push_str("&nbsp;"),
                    c => html.push_str(&escape_char(c)),
                }
            }
            html.push_str("</p>\n");
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

impl AsciiOutput for HtmlOutput {
    fn out(&self, grid: &CharGrid, _sink: &mut dyn Write) -> Result<()> {
        std::fs::write(&self.path, self.render(grid))?;
        log::info!("wrote {} rows to {}", grid.len(), self.path.display());
        Ok(())
    }
}

fn escape(s: &str) -> String {
    s.chars().map(escape_char).collect()
}

fn escape_char(c: char) -> String {
    match c {
        '&' => "&amp;".into(),
        '<' => "&lt;".into(),
        '>' => "&gt;".into(),
        '"' => "&quot;".into(),
        '\'' => "&#39;".into(),
        c => c.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Console,
    Html,
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "console" => Ok(Self::Console),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown output '{other}'")),
        }
    }
}
