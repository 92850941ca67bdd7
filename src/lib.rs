//! # docs2md
//!
//! Batch-convert DOCX and PDF documents to Markdown, merge the results
//! into one file, or compose several Word documents into a single one.
//!
//! ## Why this crate?
//!
//! Folders full of meeting notes and reports are useless to text tooling
//! (search, diffing, LLM ingestion) while they stay in binary office
//! formats. This crate walks a directory once, converts every document it
//! finds, and writes plain UTF-8 Markdown — per file, or merged into one
//! artifact with a generated table-of-origin header. DOCX content is read
//! straight out of the OOXML package (ZIP + streaming XML) so nothing
//! heavier than a ZIP reader is needed.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory
//!  │
//!  ├─ 1. Collect   list *.docx / *.pdf, drop ~$ lock files, sort by name
//!  ├─ 2. Convert   DOCX (zip + XML walk) or PDF (text extraction) → Markdown
//!  ├─ 3. Polish    collapse blank lines, trim whitespace
//!  └─ 4. Output    one .md per file · merged .md with header · composed .docx
//! ```
//!
//! Conversion is sequential and single-threaded: each file either
//! converts and is written, or fails, is logged, and the batch moves on.
//! Per-file failures never abort a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docs2md::{convert_directory, convert_docx_to_markdown, ImageMode, NoopProgress};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let images = ImageMode::Inline;
//!     let report = convert_directory(
//!         Path::new("./documents"),
//!         "docx",
//!         Path::new("./documents_md"),
//!         &NoopProgress,
//!         |path| convert_docx_to_markdown(path, &images),
//!     )?;
//!     eprintln!("{}/{} converted", report.converted, report.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the four binaries (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docs2md = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod collect;
pub mod compose;
pub mod config;
pub mod docx;
pub mod error;
pub mod merge;
pub mod pdf;
pub mod postprocess;
pub mod progress;

mod images;

#[cfg(feature = "cli")]
pub mod cli;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_directory, convert_each, BatchReport, FileFailure, FileOutcome};
pub use collect::{collect_files, stem};
pub use compose::{compose_directory, compose_files, ComposeReport};
pub use config::{ImageMode, DEFAULT_SEPARATOR, LOCK_FILE_PREFIX};
pub use docx::convert_docx_to_markdown;
pub use error::{ConvertError, Docs2MdError};
pub use merge::{merge_directory, MergeReport};
pub use pdf::convert_pdf_to_markdown;
pub use postprocess::clean_markdown;
pub use progress::{BatchProgress, NoopProgress};
