//! PDF → Markdown conversion.
//!
//! Text comes out of `pdf-extract`; embedded raster images, when an image
//! directory is configured, are pulled straight from the PDF object tree
//! with `lopdf`. Only pass-through encodings (`DCTDecode` JPEG,
//! `JPXDecode` JPEG 2000) can be written without re-encoding — anything
//! else is skipped with a warning.
//!
//! Text extraction cannot recover where on a page an image sat, so
//! extracted images are referenced in a trailing list rather than inline.

use crate::collect::stem;
use crate::config::ImageMode;
use crate::error::ConvertError;
use crate::images::ImageSink;
use crate::postprocess;
use lopdf::{Dictionary, Document, Object};
use std::path::Path;
use tracing::{debug, warn};

/// Convert a single `.pdf` file to a Markdown string.
///
/// With [`ImageMode::Extract`], embedded images are written next to the
/// text as `{stem}_img{NNN}.{ext}` and referenced at the end of the
/// output. With any other mode no images are emitted.
///
/// # Errors
/// Returns [`ConvertError::Pdf`] when the document cannot be parsed.
pub fn convert_pdf_to_markdown(path: &Path, images: &ImageMode) -> Result<String, ConvertError> {
    let mut markdown = pdf_extract::extract_text(path).map_err(|e| ConvertError::Pdf {
        detail: e.to_string(),
    })?;

    if matches!(images, ImageMode::Extract(_)) {
        let mut sink = ImageSink::new(images, &stem(path));
        let refs = extract_embedded_images(path, &mut sink)?;
        if !refs.is_empty() {
            markdown.push_str("\n\n");
            for r in &refs {
                markdown.push_str(&format!("![]({r})\n"));
            }
            debug!("extracted {} images from {}", refs.len(), path.display());
        }
    }

    Ok(postprocess::clean_markdown(&markdown))
}

/// Walk every stream object in the document and write out the image
/// streams whose encoding allows byte-for-byte pass-through.
fn extract_embedded_images(
    path: &Path,
    sink: &mut ImageSink<'_>,
) -> Result<Vec<String>, ConvertError> {
    let doc = Document::load(path).map_err(|e| ConvertError::Pdf {
        detail: e.to_string(),
    })?;

    let mut refs = Vec::new();
    for (id, object) in doc.objects.iter() {
        let Object::Stream(stream) = object else {
            continue;
        };
        if !is_image(&stream.dict) {
            continue;
        }
        match passthrough_content_type(&stream.dict) {
            Some(content_type) => {
                if let Some(target) = sink.emit(&stream.content, content_type)? {
                    refs.push(target);
                }
            }
            None => {
                warn!(
                    "skipping image object {} {} in {}: encoding requires re-encoding",
                    id.0,
                    id.1,
                    path.display()
                );
            }
        }
    }
    Ok(refs)
}

fn is_image(dict: &Dictionary) -> bool {
    dict.get(b"Subtype")
        .and_then(Object::as_name)
        .map(|name| name == b"Image")
        .unwrap_or(false)
}

/// Content type for streams whose bytes are already a standalone image
/// file, or `None` when decoding would be required.
fn passthrough_content_type(dict: &Dictionary) -> Option<&'static str> {
    let filters = filter_names(dict);
    match filters.as_slice() {
        [name] if name == b"DCTDecode" => Some("image/jpeg"),
        [name] if name == b"JPXDecode" => Some("image/jp2"),
        _ => None,
    }
}

fn filter_names(dict: &Dictionary) -> Vec<Vec<u8>> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|o| o.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}
