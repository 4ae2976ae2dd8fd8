//! Output formatting for scan results.
//!
//! Writes a [`BookSummary`] either as JSON (compact or pretty) or as a short
//! human-readable text block.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::BookSummary;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Title, author, cover and summary as plain text
    #[default]
    Text,
    /// Single JSON object
    Json,
}

/// A writer that renders summaries as text or JSON.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects JSON output.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write one scan result.
    pub fn write_summary(&mut self, summary: &BookSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(summary),
            OutputFormat::Text => self.write_text(summary),
        }
    }

    /// Write any serializable value as JSON, regardless of format.
    pub fn write_json<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    fn write_text(&mut self, summary: &BookSummary) -> io::Result<()> {
        writeln!(self.writer, "Title:  {}", summary.title())?;
        writeln!(self.writer, "Author: {}", summary.author())?;
        if let Some(cover) = summary.cover_url() {
            writeln!(self.writer, "Cover:  {cover}")?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", summary.summary.trim_end())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookMetadata;

    fn summary(cover: Option<&str>) -> BookSummary {
        BookMetadata {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            cover_url: cover.map(String::from),
            description: None,
        }
        .with_summary("Paul Atreides arrives on Arrakis.\n".to_string())
    }

    fn render(format: OutputFormat, pretty: bool, item: &BookSummary) -> String {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, format, pretty)
            .write_summary(item)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_json_is_flat() {
        let output = render(OutputFormat::Json, false, &summary(Some("http://x/c.jpg")));
        assert!(output.contains("\"title\":\"Dune\""));
        assert!(output.contains("\"cover_url\":\"http://x/c.jpg\""));
        assert!(output.contains("\"summary\":"));
        assert!(!output.contains("\"metadata\""));
        assert!(!output.contains("description"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_write_pretty_json() {
        let output = render(OutputFormat::Json, true, &summary(None));
        assert!(output.lines().count() > 1);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["author"], "Frank Herbert");
    }

    #[test]
    fn test_write_text() {
        let output = render(OutputFormat::Text, false, &summary(Some("http://x/c.jpg")));
        assert!(output.starts_with("Title:  Dune\nAuthor: Frank Herbert\nCover:  http://x/c.jpg\n"));
        assert!(output.ends_with("Paul Atreides arrives on Arrakis.\n"));
    }

    #[test]
    fn test_write_text_without_cover() {
        let output = render(OutputFormat::Text, false, &summary(None));
        assert!(!output.contains("Cover:"));
    }
}
