//! File I/O utilities for the flat expenses file
//!
//! Records are comma-separated with no header and no quoting. Writes go to a
//! temp file that is renamed over the target, so a failed save leaves the
//! previous contents in place.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use csv::{ByteRecord, QuoteStyle, ReaderBuilder, WriterBuilder};

use crate::error::ExpenseError;

/// One line read from a delimited file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number in the file
    pub line_number: u64,
    /// The fields of the line, or the encoding error if it is not UTF-8
    pub fields: Result<Vec<String>, std::str::Utf8Error>,
}

/// Create an empty file if it does not exist
///
/// Returns `true` when the file was created.
pub fn ensure_file<P: AsRef<Path>>(path: P) -> Result<bool, ExpenseError> {
    let path = path.as_ref();

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ExpenseError::Storage(format!(
            "Failed to create {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Read every line of a delimited file, returning `None` if it doesn't exist
///
/// Lines may have any number of fields; checking the count is up to the
/// caller. An I/O failure part-way through aborts the whole read.
pub fn read_delimited<P: AsRef<Path>>(
    path: P,
    delimiter: char,
) -> Result<Option<Vec<RawLine>>, ExpenseError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .map_err(|e| ExpenseError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter_byte(delimiter)?)
        .from_reader(file);

    let mut lines = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        let more = reader.read_byte_record(&mut record).map_err(|e| {
            ExpenseError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if !more {
            break;
        }

        let line_number = record
            .position()
            .map(|p| p.line())
            .unwrap_or(lines.len() as u64 + 1);
        let fields = record
            .iter()
            .map(|field| std::str::from_utf8(field).map(str::to_string))
            .collect();

        lines.push(RawLine {
            line_number,
            fields,
        });
    }

    Ok(Some(lines))
}

/// Write records to a delimited file atomically (write to temp, then rename)
///
/// Fields are written verbatim; nothing is quoted or escaped.
pub fn write_delimited_atomic<P, I, R>(path: P, delimiter: char, records: I) -> Result<(), ExpenseError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ExpenseError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory keeps the rename atomic
    let temp_path = path.with_extension("csv.tmp");

    let result = write_records(&temp_path, delimiter, records).and_then(|()| {
        fs::rename(&temp_path, path)
            .map_err(|e| ExpenseError::Storage(format!("Failed to rename temp file: {}", e)))
    });

    // A failed save never leaves a partial temp file behind
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn write_records<I, R>(temp_path: &Path, delimiter: char, records: I) -> Result<(), ExpenseError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let file = File::create(temp_path)
        .map_err(|e| ExpenseError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .delimiter(delimiter_byte(delimiter)?)
        .from_writer(file);

    for record in records {
        writer
            .write_record(record)
            .map_err(|e| ExpenseError::Storage(format!("Failed to write record: {}", e)))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| ExpenseError::Storage(format!("Failed to flush data: {}", e)))?;

    file.sync_all()
        .map_err(|e| ExpenseError::Storage(format!("Failed to sync data: {}", e)))
}

fn delimiter_byte(delimiter: char) -> Result<u8, ExpenseError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ExpenseError::Config(format!("Unsupported delimiter '{}'", delimiter)))
}
