//! OOXML package access: the ZIP container, `[Content_Types].xml`, and the
//! main document's relationship part.
//!
//! A `.docx` file is a ZIP archive; the parts this crate cares about are
//! `word/document.xml` (required), `word/styles.xml`, `word/numbering.xml`,
//! `word/_rels/document.xml.rels`, and `word/media/*`. Only the document
//! part is mandatory — everything else degrades gracefully when absent.

use crate::error::ConvertError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;
use zip::ZipArchive;

/// Extract an attribute value by key from an element.
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(Result::ok)
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Check if the element's `w:val` attribute turns a toggle property off.
pub(crate) fn val_off(e: &BytesStart<'_>) -> bool {
    matches!(attr(e, b"w:val").as_deref(), Some("0") | Some("false"))
}

/// An opened `.docx` package with all parts read into memory.
pub(crate) struct DocxPackage {
    parts: HashMap<String, Vec<u8>>,
    /// Extension → content type, from `[Content_Types].xml` `<Default>`.
    default_types: HashMap<String, String>,
    /// Part name (with leading `/`) → content type, from `<Override>`.
    override_types: HashMap<String, String>,
}

impl DocxPackage {
    /// Open a `.docx` file and read every part into memory.
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| ConvertError::BadArchive {
            detail: e.to_string(),
        })?;

        let mut parts = HashMap::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| ConvertError::BadArchive {
                detail: e.to_string(),
            })?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(name, data);
        }

        let mut package = Self {
            parts,
            default_types: HashMap::new(),
            override_types: HashMap::new(),
        };
        package.parse_content_types();
        Ok(package)
    }

    /// Raw bytes of a part, if present.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// A part decoded as text, if present. OOXML parts are UTF-8; anything
    /// else is decoded lossily rather than rejected.
    pub fn part_str(&self, name: &str) -> Option<String> {
        self.part(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// The main document part. Its absence means the archive is not a
    /// WordprocessingML document at all.
    pub fn document_xml(&self) -> Result<String, ConvertError> {
        self.part_str("word/document.xml")
            .ok_or_else(|| ConvertError::MissingPart {
                part: "word/document.xml".to_string(),
            })
    }

    /// Resolve a relationship target (relative to `word/`) to a part name.
    ///
    /// Targets come in three shapes: `media/image1.png`, `/word/media/…`
    /// (package-absolute), and occasionally `./media/…`.
    pub fn resolve_target(&self, target: &str) -> String {
        if let Some(absolute) = target.strip_prefix('/') {
            absolute.to_string()
        } else {
            format!("word/{}", target.strip_prefix("./").unwrap_or(target))
        }
    }

    /// Content type for a part, from overrides, then extension defaults,
    /// then a fixed fallback table.
    pub fn content_type_for(&self, part_name: &str) -> String {
        if let Some(ct) = self.override_types.get(&format!("/{part_name}")) {
            return ct.clone();
        }
        let ext = part_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if let Some(ct) = self.default_types.get(&ext) {
            return ct.clone();
        }
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            "svg" => "image/svg+xml",
            "emf" => "image/x-emf",
            "wmf" => "image/x-wmf",
            _ => "application/octet-stream",
        }
        .to_string()
    }

    fn parse_content_types(&mut self) {
        let Some(xml) = self.part_str("[Content_Types].xml") else {
            return;
        };
        let mut reader = Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(ct)) =
                            (attr(&e, b"Extension"), attr(&e, b"ContentType"))
                        {
                            self.default_types.insert(ext.to_ascii_lowercase(), ct);
                        }
                    }
                    b"Override" => {
                        if let (Some(part), Some(ct)) =
                            (attr(&e, b"PartName"), attr(&e, b"ContentType"))
                        {
                            self.override_types.insert(part, ct);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    warn!("skipping malformed [Content_Types].xml: {e}");
                    break;
                }
                _ => {}
            }
        }
    }
}

/// Relationship id → target, from `word/_rels/document.xml.rels`.
///
/// Used to resolve image embeds (`r:embed`) to media parts and hyperlinks
/// (`r:id`) to their URLs.
#[derive(Debug, Default)]
pub(crate) struct Relationships {
    targets: HashMap<String, String>,
}

impl Relationships {
    pub fn parse(xml: &str) -> Result<Self, ConvertError> {
        let mut rels = Self::default();
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                        rels.targets.insert(id, target);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConvertError::BadXml {
                        part: "word/_rels/document.xml.rels".to_string(),
                        detail: e.to_string(),
                    })
                }
                _ => {}
            }
        }
        Ok(rels)
    }

    pub fn target(&self, id: &str) -> Option<&str> {
        self.targets.get(id).map(String::as_str)
    }
}
