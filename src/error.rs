//! Error types for the docs2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Docs2MdError`] — **Fatal**: the batch cannot proceed at all (input
//!   path is not a directory, no matching files, output cannot be written).
//!   Returned as `Err(Docs2MdError)` from the driver entry points.
//!
//! * [`ConvertError`] — **Non-fatal**: a single document failed (corrupt
//!   archive, malformed XML, unreadable PDF) but the remaining files are
//!   fine. The drivers catch it, log it with the offending file name, and
//!   continue; the outcome is recorded in the batch report.
//!
//! The separation keeps the continue-on-per-item-failure policy explicit:
//! anything typed `ConvertError` can never abort a batch.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docs2md library.
///
/// Per-document failures use [`ConvertError`] and are recorded in
/// [`crate::batch::FileOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Docs2MdError {
    /// The input path does not exist or is not a directory.
    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// The input directory contains no matching files.
    #[error("no .{extension} files found in '{dir}'")]
    NoFilesFound { dir: PathBuf, extension: String },

    /// Could not create or write an output file or directory.
    #[error("failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every source document failed to load, so there is nothing to compose.
    #[error("none of the {total} documents could be loaded.\nFirst error: {first_error}")]
    NothingToCompose { total: usize, first_error: String },

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Docs2MdError {
    /// Wrap an I/O error from writing `path`.
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Docs2MdError::OutputWriteFailed {
            path: path.into(),
            source,
        }
    }
}

/// A non-fatal error for a single document.
///
/// Caught by the batch/merge/compose drivers, which log it and move on to
/// the next file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The file could not be read.
    #[error("read failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The file is not a readable ZIP archive (corrupt or a lock file).
    #[error("not a valid DOCX archive: {detail}")]
    BadArchive { detail: String },

    /// A required package part is missing from the archive.
    #[error("missing package part '{part}'")]
    MissingPart { part: String },

    /// The document XML could not be parsed.
    #[error("malformed XML in '{part}': {detail}")]
    BadXml { part: String, detail: String },

    /// The docx-rs reader rejected the document.
    #[error("document load failed: {detail}")]
    DocxRead { detail: String },

    /// PDF text extraction failed.
    #[error("PDF extraction failed: {detail}")]
    Pdf { detail: String },

    /// An extracted image could not be written.
    #[error("failed to write image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
