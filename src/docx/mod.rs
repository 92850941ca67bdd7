//! DOCX → Markdown conversion.
//!
//! The OOXML package is parsed directly — ZIP container plus streaming XML
//! — rather than through an HTML intermediate. Heading levels come from the
//! style definitions, list markers from the numbering definitions, images
//! and hyperlinks from the relationship part.

mod document;
mod numbering;
mod package;
mod styles;

use crate::collect::stem;
use crate::config::ImageMode;
use crate::error::ConvertError;
use crate::images::ImageSink;
use crate::postprocess;
use document::DocumentWalker;
use numbering::NumberingDefinitions;
use package::{DocxPackage, Relationships};
use std::path::Path;
use styles::StyleMap;
use tracing::warn;

/// Convert a single `.docx` file to a Markdown string.
///
/// Embedded images are handled per `images`; the result is post-processed
/// (blank lines collapsed, outer whitespace trimmed).
///
/// # Errors
/// Returns [`ConvertError`] when the file cannot be read, is not a valid
/// package, or its main document part is missing or malformed. Optional
/// parts (styles, numbering, relationships) that fail to parse are logged
/// and ignored.
pub fn convert_docx_to_markdown(path: &Path, images: &ImageMode) -> Result<String, ConvertError> {
    let package = DocxPackage::open(path)?;

    let styles = optional_part(&package, "word/styles.xml", StyleMap::parse).unwrap_or_default();
    let numbering = optional_part(&package, "word/numbering.xml", NumberingDefinitions::parse)
        .unwrap_or_default();
    let rels = optional_part(
        &package,
        "word/_rels/document.xml.rels",
        Relationships::parse,
    )
    .unwrap_or_default();

    let sink = ImageSink::new(images, &stem(path));
    let walker = DocumentWalker::new(&package, &styles, &numbering, &rels, sink);
    let markdown = walker.walk()?;

    Ok(postprocess::clean_markdown(&markdown))
}

/// Parse an optional package part, demoting parse failures to warnings.
fn optional_part<T>(
    package: &DocxPackage,
    name: &str,
    parse: impl FnOnce(&str) -> Result<T, ConvertError>,
) -> Option<T> {
    let xml = package.part_str(name)?;
    match parse(&xml) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("ignoring unparseable part '{name}': {e}");
            None
        }
    }
}
