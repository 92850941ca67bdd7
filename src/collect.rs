//! File collection: enumerate the documents a batch will process.
//!
//! Collection is the one place where input-validation failures are fatal:
//! a missing directory or an empty match set means the run can do no useful
//! work, so the typed error surfaces before any output is touched.

use crate::config::LOCK_FILE_PREFIX;
use crate::error::Docs2MdError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect the files in `dir` whose extension matches `extension`
/// (case-insensitive, without the leading dot), sorted by file name.
///
/// Office lock files (names starting with `~$`) are excluded even when the
/// extension matches.
///
/// # Errors
/// * [`Docs2MdError::NotADirectory`] when `dir` does not exist or is not a
///   directory.
/// * [`Docs2MdError::NoFilesFound`] when nothing matches.
pub fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Docs2MdError> {
    if !dir.is_dir() {
        return Err(Docs2MdError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Docs2MdError::NotADirectory {
            path: dir.to_path_buf(),
        },
        _ => Docs2MdError::Internal(format!("failed to read '{}': {e}", dir.display())),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| has_extension(path, extension))
        .filter(|path| !is_lock_file(path))
        .collect();

    // Lexicographic by file name, matching the order sections appear in
    // merged output.
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    if files.is_empty() {
        return Err(Docs2MdError::NoFilesFound {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    debug!("collected {} .{} files from {}", files.len(), extension, dir.display());
    Ok(files)
}

/// File name without its extension, used for output names and image
/// prefixes. Non-UTF-8 names are converted lossily.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with(LOCK_FILE_PREFIX))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"stub").unwrap();
    }

    #[test]
    fn collects_sorted_by_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "b.docx");
        touch(tmp.path(), "a.docx");
        touch(tmp.path(), "c.docx");

        let files = collect_files(tmp.path(), "docx").unwrap();
        let names: Vec<String> = files.iter().map(|p| stem(p)).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn excludes_lock_files_and_other_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.docx");
        touch(tmp.path(), "b.docx");
        touch(tmp.path(), "~$b.docx");
        touch(tmp.path(), "notes.txt");

        let files = collect_files(tmp.path(), "docx").unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.docx", "b.docx"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "UPPER.DOCX");

        let files = collect_files(tmp.path(), "docx").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = collect_files(tmp.path(), "docx").unwrap_err();
        assert!(matches!(err, Docs2MdError::NoFilesFound { .. }));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = collect_files(&missing, "docx").unwrap_err();
        assert!(matches!(err, Docs2MdError::NotADirectory { .. }));
    }

    #[test]
    fn file_path_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.docx");
        let err = collect_files(&tmp.path().join("a.docx"), "docx").unwrap_err();
        assert!(matches!(err, Docs2MdError::NotADirectory { .. }));
    }

    #[test]
    fn stem_strips_extension_only() {
        assert_eq!(stem(Path::new("/tmp/weekly report.docx")), "weekly report");
        assert_eq!(stem(Path::new("archive.tar.gz")), "archive.tar");
    }
}
