//! Results classification for tabular result files.
//!
//! JMeter writes one CSV row per sample into its `.jtl` results file, with
//! a `success` column. A JMeter run can exit 0 while samples failed, so the
//! results file is the authority on functional failure.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Name of the column holding the per-sample verdict.
pub const SUCCESS_COLUMN: &str = "success";

/// Errors that prevent classification.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Failed to open results file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Results file has no header row")]
    EmptyFile,

    #[error("Column '{SUCCESS_COLUMN}' not found in results header")]
    MissingSuccessColumn,

    #[error("Malformed results file: {0}")]
    Csv(#[from] csv::Error),
}

/// Whether any sample in the results file at `path` failed.
///
/// Reads the file as a stream; it is never loaded whole.
///
/// # Errors
///
/// Returns [`ClassifyError`] if the file cannot be opened, has no header,
/// lacks a `success` column, or is not valid CSV.
pub fn has_failures(path: &Path) -> Result<bool, ClassifyError> {
    let file = File::open(path).map_err(|source| ClassifyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    scan(BufReader::new(file))
}

/// Classify results read from any source. See [`has_failures`].
pub fn scan<R: Read>(reader: R) -> Result<bool, ClassifyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let header = records.next().ok_or(ClassifyError::EmptyFile)??;
    let success_index = header
        .iter()
        .position(|field| field.trim().eq_ignore_ascii_case(SUCCESS_COLUMN))
        .ok_or(ClassifyError::MissingSuccessColumn)?;

    for record in records {
        let record = record?;
        // Short rows carry no verdict.
        let Some(value) = record.get(success_index) else {
            continue;
        };
        if value.trim().eq_ignore_ascii_case("false") {
            return Ok(true);
        }
    }

    Ok(false)
}
