//! Configuration types shared by the conversion drivers.
//!
//! The original scripts expose three knobs: where extracted images go, how
//! merged sections are separated, and which extension is collected. Those
//! knobs live here so every driver and binary agrees on defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reserved prefix Office uses for owner/lock files (`~$report.docx`).
///
/// Files with this prefix are never collected, even when the extension
/// matches.
pub const LOCK_FILE_PREFIX: &str = "~$";

/// Default separator inserted between merged sections.
pub const DEFAULT_SEPARATOR: &str = "---";

/// How embedded images are handled during conversion.
///
/// The DOCX path defaults to [`ImageMode::Inline`] (images survive as data
/// URIs even without an image directory); the PDF path defaults to
/// [`ImageMode::Skip`] because inlining page-extracted rasters routinely
/// produces multi-megabyte Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMode {
    /// Write each image to this directory as `{stem}_img{NNN}.{ext}` and
    /// reference it by path. The directory is created on first use.
    Extract(PathBuf),
    /// Embed images as `data:` base64 URIs.
    #[default]
    Inline,
    /// Drop images entirely.
    Skip,
}

impl ImageMode {
    /// Build the mode the binaries use: a directory if one was given,
    /// otherwise the supplied fallback.
    pub fn from_option(images_dir: Option<PathBuf>, fallback: ImageMode) -> Self {
        match images_dir {
            Some(dir) => ImageMode::Extract(dir),
            None => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mode_from_option_prefers_directory() {
        let mode = ImageMode::from_option(Some(PathBuf::from("imgs")), ImageMode::Skip);
        assert_eq!(mode, ImageMode::Extract(PathBuf::from("imgs")));
    }

    #[test]
    fn image_mode_from_option_falls_back() {
        assert_eq!(ImageMode::from_option(None, ImageMode::Skip), ImageMode::Skip);
        assert_eq!(ImageMode::from_option(None, ImageMode::Inline), ImageMode::Inline);
    }
}
