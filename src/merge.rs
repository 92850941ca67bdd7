//! Merge driver: convert every document in a directory and join the
//! results into one Markdown file.
//!
//! Each successful conversion becomes a section — a level-1 heading named
//! after the file's stem, then the content — and sections are joined with
//! a configurable separator. A generated comment block at the top records
//! when the file was produced, from where, and how many sections made it
//! in. Failed conversions are logged and simply absent from the output, so
//! the recorded count is the count of sections actually present.

use crate::batch::{convert_each, BatchReport, FileFailure, FileOutcome};
use crate::collect::{collect_files, stem};
use crate::error::{ConvertError, Docs2MdError};
use crate::progress::BatchProgress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of a merge run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    /// Files discovered by the collector.
    pub total: usize,
    /// Sections included in the merged output.
    pub merged: usize,
    /// The failures, in input order.
    pub failures: Vec<FileFailure>,
    /// Where the merged Markdown was written.
    pub output: PathBuf,
}

/// Convert every matching file in `input_dir` and write one merged
/// Markdown file to `output_file`, creating parent directories as needed.
///
/// # Errors
/// Fatal for collection failures and for an unwritable output path.
/// Per-file conversion failures shrink the output instead.
pub fn merge_directory<F>(
    input_dir: &Path,
    extension: &str,
    output_file: &Path,
    separator: &str,
    progress: &dyn BatchProgress,
    convert: F,
) -> Result<MergeReport, Docs2MdError>
where
    F: FnMut(&Path) -> Result<String, ConvertError>,
{
    let files = collect_files(input_dir, extension)?;
    info!(
        "merging {} .{} files from {} into {}",
        files.len(),
        extension,
        input_dir.display(),
        output_file.display()
    );

    let outcomes = convert_each(&files, progress, convert);

    let sections: Vec<String> = outcomes
        .iter()
        .filter_map(|o| match o {
            FileOutcome::Converted { source, markdown } => {
                Some(format!("# {}\n\n{}", stem(source), markdown))
            }
            FileOutcome::Failed { .. } => None,
        })
        .collect();

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let header = merge_header(&timestamp, input_dir, sections.len());
    let body = sections.join(&format!("\n\n{separator}\n\n"));

    if let Some(parent) = output_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Docs2MdError::write(parent, e))?;
        }
    }
    std::fs::write(output_file, format!("{header}{body}"))
        .map_err(|e| Docs2MdError::write(output_file, e))?;

    let batch = BatchReport::from_outcomes(&outcomes);
    info!("merged {}/{} files", batch.converted, batch.total);
    Ok(MergeReport {
        total: batch.total,
        merged: batch.converted,
        failures: batch.failures,
        output: output_file.to_path_buf(),
    })
}

/// The generated comment block prefixed to merged output.
fn merge_header(timestamp: &str, input_dir: &Path, section_count: usize) -> String {
    format!(
        "<!--\n  generated: {timestamp}\n  source directory: {}\n  documents: {section_count}\n-->\n\n",
        input_dir.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_records_timestamp_source_and_count() {
        let header = merge_header("2026-08-04 09:30:00", Path::new("./docs"), 4);
        assert!(header.starts_with("<!--\n"));
        assert!(header.contains("generated: 2026-08-04 09:30:00"));
        assert!(header.contains("source directory: ./docs"));
        assert!(header.contains("documents: 4"));
        assert!(header.ends_with("-->\n\n"));
    }

    #[test]
    fn header_count_can_be_zero() {
        let header = merge_header("2026-08-04 09:30:00", Path::new("docs"), 0);
        assert!(header.contains("documents: 0"));
    }
}
