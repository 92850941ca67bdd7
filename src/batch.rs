//! Batch driver: run a converter over a collected file list, one file per
//! output, continuing past per-file failures.
//!
//! Every file ends up as a [`FileOutcome`] — converted with its content, or
//! failed with a message — so the continue-on-failure policy is data, not
//! control flow, and the final report falls out of the outcome list.

use crate::collect::{collect_files, stem};
use crate::error::{ConvertError, Docs2MdError};
use crate::progress::BatchProgress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The result of one file's conversion attempt.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file converted; `markdown` holds the produced content.
    Converted { source: PathBuf, markdown: String },
    /// The file failed; the batch continued without it.
    Failed { source: PathBuf, reason: String },
}

impl FileOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, FileOutcome::Converted { .. })
    }

    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Converted { source, .. } | FileOutcome::Failed { source, .. } => source,
        }
    }
}

/// One failed file, as recorded in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    /// File name (not the full path) of the failing input.
    pub file: String,
    /// Human-readable reason, from the underlying [`ConvertError`].
    pub reason: String,
}

/// Summary of a per-file batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Files discovered by the collector.
    pub total: usize,
    /// Files converted and written.
    pub converted: usize,
    /// The failures, in input order.
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub(crate) fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let failures = outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { source, reason } => Some(FileFailure {
                    file: display_name(source),
                    reason: reason.clone(),
                }),
                FileOutcome::Converted { .. } => None,
            })
            .collect::<Vec<_>>();
        Self {
            total: outcomes.len(),
            converted: outcomes.len() - failures.len(),
            failures,
        }
    }
}

/// Run `convert` over `files` in order, reporting progress per file.
///
/// Never fails: each file's error is caught, logged with the file name,
/// and recorded as a [`FileOutcome::Failed`].
pub fn convert_each<F>(
    files: &[PathBuf],
    progress: &dyn BatchProgress,
    mut convert: F,
) -> Vec<FileOutcome>
where
    F: FnMut(&Path) -> Result<String, ConvertError>,
{
    let total = files.len();
    progress.on_batch_start(total);

    let mut outcomes = Vec::with_capacity(total);
    for (i, file) in files.iter().enumerate() {
        let index = i + 1;
        let name = display_name(file);
        progress.on_file_start(index, total, &name);

        match convert(file) {
            Ok(markdown) => {
                progress.on_file_complete(index, total, &name, markdown.len());
                outcomes.push(FileOutcome::Converted {
                    source: file.clone(),
                    markdown,
                });
            }
            Err(e) => {
                warn!("conversion failed for {name}: {e}");
                progress.on_file_error(index, total, &name, &e.to_string());
                outcomes.push(FileOutcome::Failed {
                    source: file.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_converted()).count();
    progress.on_batch_complete(total, succeeded);
    outcomes
}

/// Convert every matching file in `input_dir`, writing one
/// `{output_dir}/{stem}.md` per successful conversion.
///
/// A file's output is written only after its conversion succeeded; a write
/// failure counts as that file's failure and the batch continues.
///
/// # Errors
/// Fatal only for collection failures (bad directory, no matching files)
/// and an uncreatable output directory. Per-file failures are recorded in
/// the returned [`BatchReport`].
pub fn convert_directory<F>(
    input_dir: &Path,
    extension: &str,
    output_dir: &Path,
    progress: &dyn BatchProgress,
    mut convert: F,
) -> Result<BatchReport, Docs2MdError>
where
    F: FnMut(&Path) -> Result<String, ConvertError>,
{
    let files = collect_files(input_dir, extension)?;
    std::fs::create_dir_all(output_dir).map_err(|e| Docs2MdError::write(output_dir, e))?;

    info!(
        "converting {} .{} files from {} into {}",
        files.len(),
        extension,
        input_dir.display(),
        output_dir.display()
    );

    let outcomes = convert_each(&files, progress, |file| {
        let markdown = convert(file)?;
        let out_path = output_dir.join(format!("{}.md", stem(file)));
        std::fs::write(&out_path, &markdown)?;
        Ok(markdown)
    });

    let report = BatchReport::from_outcomes(&outcomes);
    info!("converted {}/{} files", report.converted, report.total);
    Ok(report)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;

    fn fake_convert(path: &Path) -> Result<String, ConvertError> {
        let name = display_name(path);
        if name.starts_with("bad") {
            Err(ConvertError::BadArchive {
                detail: "truncated".into(),
            })
        } else {
            Ok(format!("content of {name}"))
        }
    }

    #[test]
    fn convert_each_records_both_outcomes_in_order() {
        let files = vec![
            PathBuf::from("a.docx"),
            PathBuf::from("bad.docx"),
            PathBuf::from("c.docx"),
        ];
        let outcomes = convert_each(&files, &NoopProgress, fake_convert);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_converted());
        assert!(!outcomes[1].is_converted());
        assert!(outcomes[2].is_converted());
        assert_eq!(outcomes[1].source(), Path::new("bad.docx"));
    }

    #[test]
    fn report_counts_and_failure_names() {
        let files = vec![PathBuf::from("a.docx"), PathBuf::from("bad.docx")];
        let outcomes = convert_each(&files, &NoopProgress, fake_convert);
        let report = BatchReport::from_outcomes(&outcomes);

        assert_eq!(report.total, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "bad.docx");
        assert!(report.failures[0].reason.contains("truncated"));
    }

    #[test]
    fn report_serialises_to_json() {
        let report = BatchReport {
            total: 2,
            converted: 1,
            failures: vec![FileFailure {
                file: "bad.docx".into(),
                reason: "truncated".into(),
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"converted\":1"));
        assert!(json.contains("bad.docx"));
    }

    #[test]
    fn convert_directory_requires_matching_files() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let err = convert_directory(tmp.path(), "docx", &out, &NoopProgress, fake_convert)
            .unwrap_err();
        assert!(matches!(err, Docs2MdError::NoFilesFound { .. }));
        assert!(!out.exists(), "no output directory before validation passes");
    }
}
