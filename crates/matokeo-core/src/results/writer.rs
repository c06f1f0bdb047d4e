use super::flatten::header;
use super::types::FlattenedRow;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Field separator of the results file
const SEPARATOR: &str = ", ";

/// How field values are escaped when written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Write values verbatim; a comma or newline inside a value corrupts the line
    #[default]
    Never,
    /// Wrap values containing a separator, quote or line break in double quotes
    Necessary,
}

impl QuoteStyle {
    fn apply<'a>(&self, field: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            QuoteStyle::Never => field.into(),
            QuoteStyle::Necessary => {
                if field.contains([',', '"', '\r', '\n']) {
                    format!("\"{}\"", field.replace('"', "\"\"")).into()
                } else {
                    field.into()
                }
            }
        }
    }
}

/// Join fields into one newline-terminated line
pub fn format_line<S: AsRef<str>>(fields: &[S], quote: QuoteStyle) -> String {
    let mut line = fields
        .iter()
        .map(|field| quote.apply(field.as_ref()))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    line.push('\n');
    line
}

/// Append-only writer for the results file
///
/// The header is written on creation and every row is flushed as soon as it
/// is appended, so rows already on disk survive a later failure.
pub struct ResultsWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    quote: QuoteStyle,
    rows_written: usize,
}

impl ResultsWriter {
    /// Create (or truncate) `path` and write the header line
    pub fn create(path: &Path, quote: QuoteStyle) -> Result<Self> {
        tracing::debug!("Creating results file: {}", path.display());

        let file = File::create(path)?;
        let mut writer = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            quote,
            rows_written: 0,
        };
        writer.write_line(&header())?;

        Ok(writer)
    }

    /// Append one school's row
    pub fn append(&mut self, row: &FlattenedRow) -> Result<()> {
        self.write_line(row.fields())?;
        self.rows_written += 1;

        tracing::debug!(
            "Appended row {} ({}) to {}",
            self.rows_written,
            row.school_name(),
            self.path.display()
        );

        Ok(())
    }

    fn write_line<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        self.writer
            .write_all(format_line(fields, self.quote).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Number of school rows appended so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}
