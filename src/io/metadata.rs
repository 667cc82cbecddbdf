//! Metadata table persistence as delimited text
//!
//! Tables are written through a temporary file in the destination directory
//! and renamed into place, so a failed write never leaves a truncated table.

use crate::io::configuration::{DEFAULT_DELIMITER, DEFAULT_QUOTE, FILE_COLUMN};
use crate::io::error::{CollectionError, Result, WithContext, invalid_parameter};
use crate::model::{MetadataTable, Record, TraitAssignment};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Delimiter and quoting used for metadata tables and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    delimiter: u8,
    quote: u8,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            quote: DEFAULT_QUOTE as u8,
        }
    }
}

impl TableFormat {
    /// Create a format from single ASCII characters
    ///
    /// # Errors
    ///
    /// Returns an error if either character is not ASCII, is a line break,
    /// or both are the same character
    pub fn new(delimiter: char, quote: char) -> Result<Self> {
        let delimiter_byte = ascii_byte("delimiter", delimiter)?;
        let quote_byte = ascii_byte("quote", quote)?;
        if delimiter_byte == quote_byte {
            return Err(invalid_parameter(
                "quote",
                &quote,
                &"must differ from the delimiter",
            ));
        }
        Ok(Self {
            delimiter: delimiter_byte,
            quote: quote_byte,
        })
    }

    /// Field delimiter byte
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Quote byte
    pub const fn quote(&self) -> u8 {
        self.quote
    }

    /// CSV writer configuration; fields are quoted only when necessary
    pub fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true);
        builder
    }

    /// CSV reader configuration; column counts are checked per row by the caller
    pub fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(false)
            .flexible(true);
        builder
    }
}

fn ascii_byte(parameter: &'static str, c: char) -> Result<u8> {
    if !c.is_ascii() || c == '\n' || c == '\r' {
        return Err(invalid_parameter(
            parameter,
            &c.escape_default(),
            &"must be a single ASCII character other than a line break",
        ));
    }
    Ok(c as u8)
}

/// Write a file by streaming into a temporary sibling and renaming it over `path`
///
/// # Errors
///
/// Returns a file system error if the temporary file cannot be created or
/// renamed, or any error produced by `write`
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).with_path(parent, "create directory")?;

    let mut temp = NamedTempFile::new_in(parent).with_path(parent, "create temporary file")?;
    {
        let mut buffered = BufWriter::new(temp.as_file_mut());
        write(&mut buffered)?;
        buffered.flush().with_path(path, "write")?;
    }
    temp.as_file().sync_all().with_path(path, "sync")?;

    temp.persist(path)
        .map_err(|e| CollectionError::FileSystem {
            path: path.to_path_buf(),
            operation: "persist",
            source: e.error,
        })?;
    Ok(())
}

/// Write the header and every record of `table` to `out`
///
/// # Errors
///
/// Returns a CSV error if a row cannot be written
pub fn write_table(table: &MetadataTable, format: TableFormat, out: &mut dyn Write) -> Result<()> {
    let mut writer = format.writer_builder().from_writer(out);
    writer.write_record(table.header())?;
    for record in table.records() {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// Persist a metadata table at `path`, replacing any previous table
///
/// # Errors
///
/// Returns a storage error if the table cannot be written or moved into place
pub fn write_metadata(table: &MetadataTable, path: &Path, format: TableFormat) -> Result<()> {
    write_atomically(path, |out| write_table(table, format, out))?;
    log::debug!(
        "Wrote {} records to '{}'",
        table.records().len(),
        path.display()
    );
    Ok(())
}

/// Streaming reader that yields each data row as its own result
pub struct MetadataReader {
    path: PathBuf,
    trait_names: Vec<String>,
    rows: csv::StringRecordsIntoIter<File>,
}

impl MetadataReader {
    /// Open a table and read its header
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read, or `MalformedHeader`
    /// if the first row is missing, does not start with the identifier column,
    /// or names no trait columns
    pub fn open(path: &Path, format: TableFormat) -> Result<Self> {
        let reader = format
            .reader_builder()
            .from_path(path)
            .with_path(path, "open table")?;
        let mut rows = reader.into_records();

        let header = rows
            .next()
            .transpose()
            .with_path(path, "read header")?
            .ok_or_else(|| CollectionError::MalformedHeader {
                path: path.to_path_buf(),
                reason: "table is empty".to_string(),
            })?;

        let mut columns = header.iter();
        if columns.next() != Some(FILE_COLUMN) {
            return Err(CollectionError::MalformedHeader {
                path: path.to_path_buf(),
                reason: format!("first column must be '{FILE_COLUMN}'"),
            });
        }
        let trait_names: Vec<String> = columns.map(str::to_string).collect();
        if trait_names.is_empty() {
            return Err(CollectionError::MalformedHeader {
                path: path.to_path_buf(),
                reason: "no trait columns".to_string(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            trait_names,
            rows,
        })
    }

    /// Trait column names from the header
    pub fn trait_names(&self) -> &[String] {
        &self.trait_names
    }

    fn to_record(&self, row: &StringRecord) -> Result<Record> {
        let expected = self.trait_names.len() + 1;
        if row.len() != expected {
            return Err(CollectionError::MalformedRecord {
                path: self.path.clone(),
                line: row.position().map_or(0, csv::Position::line),
                expected,
                found: row.len(),
            });
        }

        let mut fields = row.iter();
        let file = fields.next().unwrap_or_default();
        Ok(Record::new(file, fields.collect::<TraitAssignment>()))
    }
}

impl Iterator for MetadataReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(
            row.with_path(&self.path, "read row")
                .and_then(|row| self.to_record(&row)),
        )
    }
}

/// Read a whole metadata table, failing on the first malformed row
///
/// # Errors
///
/// Returns the errors of [`MetadataReader::open`] and the first row error
pub fn read_metadata(path: &Path, format: TableFormat) -> Result<MetadataTable> {
    let mut reader = MetadataReader::open(path, format)?;
    let trait_names = reader.trait_names().to_vec();
    let records = reader.by_ref().collect::<Result<Vec<_>>>()?;
    Ok(MetadataTable::new(trait_names, records))
}
