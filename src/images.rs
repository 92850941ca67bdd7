//! Embedded-image handling: write to disk, inline as a data URI, or drop.
//!
//! File names follow the `{stem}_img{NNN}.{ext}` convention with a
//! per-document counter, so a merge over many documents never collides on
//! image names. The extension is taken from the image bytes when they are
//! recognisable, falling back to the declared content type, with `jpeg`
//! normalised to `jpg`.

use crate::config::ImageMode;
use crate::error::ConvertError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Sink for a single document's embedded images.
pub(crate) struct ImageSink<'a> {
    mode: &'a ImageMode,
    stem: String,
    counter: u32,
}

impl<'a> ImageSink<'a> {
    pub fn new(mode: &'a ImageMode, stem: &str) -> Self {
        Self {
            mode,
            stem: stem.to_string(),
            counter: 0,
        }
    }

    /// Handle one image. Returns the Markdown target for it (a file path or
    /// a data URI), or `None` when images are being dropped.
    pub fn emit(
        &mut self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<Option<String>, ConvertError> {
        self.counter += 1;
        match self.mode {
            ImageMode::Skip => Ok(None),
            ImageMode::Inline => Ok(Some(format!(
                "data:{content_type};base64,{}",
                BASE64.encode(bytes)
            ))),
            ImageMode::Extract(dir) => {
                let ext = extension_for(content_type, bytes);
                let file_name = format!("{}_img{:03}.{ext}", self.stem, self.counter);
                let path = dir.join(&file_name);
                std::fs::create_dir_all(dir).map_err(|e| ConvertError::ImageWriteFailed {
                    path: dir.clone(),
                    source: e,
                })?;
                std::fs::write(&path, bytes).map_err(|e| ConvertError::ImageWriteFailed {
                    path: path.clone(),
                    source: e,
                })?;
                Ok(Some(path.display().to_string()))
            }
        }
    }
}

/// Pick a file extension: sniff the bytes first, then fall back to the
/// content-type subtype. `jpeg` becomes `jpg` either way.
pub(crate) fn extension_for(content_type: &str, bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        if let Some(ext) = format.extensions_str().first() {
            return (*ext).to_string();
        }
    }
    let subtype = content_type.rsplit('/').next().unwrap_or("bin");
    let subtype = subtype.strip_prefix("x-").unwrap_or(subtype);
    match subtype {
        "jpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        other => other.to_string(),
    }
}
