//! Document composer: concatenate several `.docx` files into one,
//! preserving their native content instead of converting to Markdown.
//!
//! Each source document is loaded with the docx-rs reader and its body
//! blocks (paragraphs and tables) are appended to a single output
//! document, with a page break between consecutive sources. A source that
//! fails to load is logged and skipped; only when *every* source fails is
//! there nothing to save, which is fatal.

use crate::batch::{display_name, FileFailure};
use crate::collect::collect_files;
use crate::error::{ConvertError, Docs2MdError};
use crate::progress::BatchProgress;
use docx_rs::{read_docx, BreakType, Docx, DocumentChild, Paragraph, Run};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Summary of a composition run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeReport {
    /// Files discovered by the collector.
    pub total: usize,
    /// Source documents whose content made it into the output.
    pub composed: usize,
    /// The failures, in input order.
    pub failures: Vec<FileFailure>,
    /// Where the composed document was written.
    pub output: PathBuf,
}

/// Compose every `.docx` in `input_dir` (sorted, lock files excluded) into
/// a single document at `output_file`.
pub fn compose_directory(
    input_dir: &Path,
    output_file: &Path,
    progress: &dyn BatchProgress,
) -> Result<ComposeReport, Docs2MdError> {
    let files = collect_files(input_dir, "docx")?;
    info!(
        "composing {} documents from {} into {}",
        files.len(),
        input_dir.display(),
        output_file.display()
    );
    compose_files(&files, output_file, progress)
}

/// Compose an explicit file list, in the given order.
///
/// # Errors
/// Fatal when the output cannot be written, or when no source document
/// loads at all ([`Docs2MdError::NothingToCompose`]).
pub fn compose_files(
    files: &[PathBuf],
    output_file: &Path,
    progress: &dyn BatchProgress,
) -> Result<ComposeReport, Docs2MdError> {
    let total = files.len();
    progress.on_batch_start(total);

    let mut out = Docx::new();
    let mut composed = 0usize;
    let mut failures: Vec<FileFailure> = Vec::new();
    let mut first_error: Option<String> = None;

    for (i, file) in files.iter().enumerate() {
        let index = i + 1;
        let name = display_name(file);
        progress.on_file_start(index, total, &name);

        match load_body(file) {
            Ok(children) => {
                if composed > 0 {
                    out = out.add_paragraph(page_break());
                }
                let mut appended = 0usize;
                for child in children {
                    match child {
                        DocumentChild::Paragraph(p) => {
                            out = out.add_paragraph(*p);
                            appended += 1;
                        }
                        DocumentChild::Table(t) => {
                            out = out.add_table(*t);
                            appended += 1;
                        }
                        // Bookmarks, comments, and section marks carry no
                        // standalone content.
                        _ => {}
                    }
                }
                composed += 1;
                progress.on_file_complete(index, total, &name, appended);
            }
            Err(e) => {
                warn!("skipping {name}: {e}");
                let reason = e.to_string();
                first_error.get_or_insert_with(|| reason.clone());
                progress.on_file_error(index, total, &name, &reason);
                failures.push(FileFailure { file: name, reason });
            }
        }
    }

    progress.on_batch_complete(total, composed);

    if composed == 0 {
        return Err(Docs2MdError::NothingToCompose {
            total,
            first_error: first_error.unwrap_or_else(|| "no documents found".to_string()),
        });
    }

    if let Some(parent) = output_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Docs2MdError::write(parent, e))?;
        }
    }
    let file = File::create(output_file).map_err(|e| Docs2MdError::write(output_file, e))?;
    out.build().pack(file).map_err(|e| {
        Docs2MdError::Internal(format!("failed to pack '{}': {e}", output_file.display()))
    })?;

    info!("composed {composed}/{total} documents");
    Ok(ComposeReport {
        total,
        composed,
        failures,
        output: output_file.to_path_buf(),
    })
}

fn load_body(path: &Path) -> Result<Vec<DocumentChild>, ConvertError> {
    let bytes = std::fs::read(path)?;
    let docx = read_docx(&bytes).map_err(|e| ConvertError::DocxRead {
        detail: e.to_string(),
    })?;
    Ok(docx.document.children)
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;

    #[test]
    fn empty_file_list_is_nothing_to_compose() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("merged.docx");
        let err = compose_files(&[], &out, &NoopProgress).unwrap_err();
        assert!(matches!(err, Docs2MdError::NothingToCompose { total: 0, .. }));
        assert!(!out.exists());
    }

    #[test]
    fn unreadable_sources_are_recorded_not_fatal_while_one_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("good.docx");
        let bad = tmp.path().join("bad.docx");
        std::fs::write(&bad, b"not a zip archive").unwrap();

        // A minimal but valid document, produced by the same writer the
        // composer saves with.
        let file = File::create(&good).unwrap();
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("hello")))
            .build()
            .pack(file)
            .unwrap();

        let out = tmp.path().join("merged.docx");
        let report =
            compose_files(&[bad.clone(), good.clone()], &out, &NoopProgress).unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.composed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "bad.docx");
        assert!(out.exists());
    }
}
