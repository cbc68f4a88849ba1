//! Delimited output of crawl records

use crate::crawler::PageRecord;
use crate::output::traits::{OutputError, OutputResult};
use csv::{Terminator, WriterBuilder};
use std::path::{Path, PathBuf};

/// Column names, in output order
const COLUMNS: [&str; 3] = ["url", "depth", "rank"];

/// Output format selected on the command line
///
/// The format name doubles as the file extension (`output.<name>`). `csv`
/// is comma-delimited; every other name is tab-delimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    name: String,
    delimiter: u8,
}

impl OutputFormat {
    /// Parses a format name
    ///
    /// # Returns
    ///
    /// * `Ok(OutputFormat)` - The format
    /// * `Err(OutputError::Format)` - The name is empty or would escape the
    ///   output directory
    pub fn parse(name: &str) -> OutputResult<Self> {
        if name.is_empty() {
            return Err(OutputError::Format("format name cannot be empty".to_string()));
        }

        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(OutputError::Format(format!(
                "format name '{}' is not a valid file extension",
                name
            )));
        }

        let delimiter = if name == "csv" { b',' } else { b'\t' };
        Ok(Self {
            name: name.to_string(),
            delimiter,
        })
    }

    /// Comma-separated format
    pub fn csv() -> Self {
        Self {
            name: "csv".to_string(),
            delimiter: b',',
        }
    }

    /// Returns the format name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field delimiter
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Returns the output file name, `output.<name>`
    pub fn file_name(&self) -> String {
        format!("output.{}", self.name)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::csv()
    }
}

/// Renders records as delimited text
///
/// A header row followed by one row per record, rows separated by `\n`
/// with no trailing newline. A field is quoted only when it contains the
/// delimiter, a quote or a line break.
pub fn format_records(records: &[PageRecord], format: &OutputFormat) -> OutputResult<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(format.delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record([
            record.url.clone(),
            record.depth.to_string(),
            record.rank.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.error().to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| OutputError::Write(e.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// Writes records to `<directory>/output.<format>`
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - The records could not be rendered or written
pub fn write_records(
    records: &[PageRecord],
    format: &OutputFormat,
    directory: &Path,
) -> OutputResult<PathBuf> {
    let path = directory.join(format.file_name());
    std::fs::write(&path, format_records(records, format)?)?;
    tracing::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}
