//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use dbplane_store::Page;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay + ?Sized,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay + ?Sized,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// One line of a listing.
pub trait Row {
    /// Column headers.
    const HEADERS: &'static [&'static str];

    /// Cell values, one per header.
    fn cells(&self) -> Vec<String>;
}

/// Write rows under a header, padding every column to its widest cell.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_rows<W: Write, R: Row>(writer: &mut W, rows: &[R]) -> Result<(), CliError> {
    let cells: Vec<Vec<String>> = rows.iter().map(Row::cells).collect();
    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let headers: Vec<String> = R::HEADERS.iter().map(ToString::to_string).collect();
    write_line(writer, &headers, &widths)?;
    for row in &cells {
        write_line(writer, row, &widths)?;
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, cells: &[String], widths: &[usize]) -> Result<(), CliError> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("   ");
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

impl<T: Row> TableDisplay for Vec<T> {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        write_rows(writer, self)
    }
}

impl<T: Row> TableDisplay for Page<T> {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        write_rows(writer, &self.results)?;
        if let Some(total) = self.total_count {
            if total > self.results.len() as u64 {
                writeln!(writer)?;
                writeln!(writer, "Showing {} of {total}", self.results.len())?;
            }
        }
        Ok(())
    }
}

/// Implement [`TableDisplay`] for single values as a one-row table.
#[macro_export]
macro_rules! single_row {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::output::TableDisplay for $ty {
                fn write_table<W: ::std::io::Write>(&self, writer: &mut W) -> Result<(), $crate::error::CliError> {
                    $crate::output::write_rows(writer, ::std::slice::from_ref(self))
                }
            }
        )+
    };
}

/// Simple message output.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
    /// Whether this is a success message.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
}

impl Message {
    /// Create a success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.success {
            writeln!(writer, "✓ {}", self.message)?;
        } else {
            writeln!(writer, "{}", self.message)?;
        }
        Ok(())
    }
}

/// Render an optional cell.
#[must_use]
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Truncate a string to a maximum number of characters.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Item {
        id: &'static str,
        state: Option<&'static str>,
    }

    impl Row for Item {
        const HEADERS: &'static [&'static str] = &["ID", "STATE"];

        fn cells(&self) -> Vec<String> {
            vec![self.id.to_string(), cell(self.state)]
        }
    }

    #[test]
    fn output_format_default_is_table() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt.format(), Format::Table);
        assert!(!fmt.is_json());
    }

    #[test]
    fn rows_are_aligned() {
        let items = vec![
            Item { id: "a", state: Some("IDLE") },
            Item { id: "long-id", state: None },
        ];
        let output = OutputFormat::default().to_string(&items).expect("should format");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "ID        STATE");
        assert_eq!(lines[1], "a         IDLE");
        assert_eq!(lines[2], "long-id   -");
    }

    #[test]
    fn page_reports_partial_results() {
        let page = Page {
            results: vec![Item { id: "a", state: None }],
            total_count: Some(5),
            links: Vec::new(),
        };
        let output = OutputFormat::default().to_string(&page).expect("should format");
        assert!(output.contains("Showing 1 of 5"));
    }

    #[test]
    fn json_page_keeps_wire_shape() {
        let page = Page {
            results: vec![Item { id: "a", state: Some("IDLE") }],
            total_count: Some(1),
            links: Vec::new(),
        };
        let output = OutputFormat::new(Format::Json).to_string(&page).expect("should format");
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed["totalCount"], 1);
        assert_eq!(parsed["results"][0]["id"], "a");
    }

    #[test]
    fn message_success() {
        let output = OutputFormat::default()
            .to_string(&Message::success("Cluster 'c0' paused"))
            .expect("should format");
        assert_eq!(output, "✓ Cluster 'c0' paused\n");
    }

    #[test]
    fn message_info_json() {
        let output = OutputFormat::new(Format::Json)
            .to_string(&Message::info("Nothing to do"))
            .expect("should format");
        assert!(output.contains("\"message\": \"Nothing to do\""));
        assert!(!output.contains("success"));
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "hel");
    }
}
