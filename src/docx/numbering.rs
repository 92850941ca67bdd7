//! List-numbering resolution: `w:numId` → abstract definition → level
//! format, plus the per-document item counters for ordered lists.

use super::package::attr;
use crate::error::ConvertError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Numbering definitions parsed from `word/numbering.xml`.
///
/// A paragraph references a concrete list via `w:numId`; the concrete list
/// points at an abstract definition, which holds one `w:numFmt` per
/// indentation level. Only the bullet/ordered distinction matters for
/// Markdown output.
#[derive(Debug, Default)]
pub(crate) struct NumberingDefinitions {
    /// abstractNumId → (ilvl → numFmt value)
    abstract_formats: HashMap<String, HashMap<u32, String>>,
    /// numId → abstractNumId
    num_to_abstract: HashMap<String, String>,
}

impl NumberingDefinitions {
    pub fn parse(xml: &str) -> Result<Self, ConvertError> {
        let mut defs = Self::default();
        let mut reader = Reader::from_str(xml);
        let mut current_abstract: Option<String> = None;
        let mut current_level: Option<u32> = None;
        let mut current_num: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:abstractNum" => {
                        current_abstract = attr(&e, b"w:abstractNumId");
                    }
                    b"w:lvl" => {
                        current_level = attr(&e, b"w:ilvl").and_then(|v| v.parse().ok());
                    }
                    b"w:numFmt" => {
                        if let (Some(id), Some(lvl), Some(fmt)) = (
                            current_abstract.as_ref(),
                            current_level,
                            attr(&e, b"w:val"),
                        ) {
                            defs.abstract_formats
                                .entry(id.clone())
                                .or_default()
                                .insert(lvl, fmt);
                        }
                    }
                    b"w:num" => {
                        current_num = attr(&e, b"w:numId");
                    }
                    b"w:abstractNumId" => {
                        if let (Some(num), Some(abs)) =
                            (current_num.as_ref(), attr(&e, b"w:val"))
                        {
                            defs.num_to_abstract.insert(num.clone(), abs);
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:abstractNum" => current_abstract = None,
                    b"w:lvl" => current_level = None,
                    b"w:num" => current_num = None,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConvertError::BadXml {
                        part: "word/numbering.xml".to_string(),
                        detail: e.to_string(),
                    })
                }
                _ => {}
            }
        }
        Ok(defs)
    }

    /// Whether `(num_id, ilvl)` is an ordered (numbered) list level.
    ///
    /// Unknown ids and levels render as bullets, which is what every
    /// Markdown renderer degrades to anyway.
    pub fn is_ordered(&self, num_id: &str, ilvl: u32) -> bool {
        let Some(abstract_id) = self.num_to_abstract.get(num_id) else {
            return false;
        };
        let Some(levels) = self.abstract_formats.get(abstract_id) else {
            return false;
        };
        match levels.get(&ilvl).map(String::as_str) {
            Some("bullet") | Some("none") | None => false,
            Some(_) => true,
        }
    }
}

/// Per-document ordered-list counters, keyed by `(numId, ilvl)`.
#[derive(Debug, Default)]
pub(crate) struct ListCounters {
    counts: HashMap<(String, u32), u32>,
}

impl ListCounters {
    /// Next item number for the given list and level, starting at 1.
    pub fn next(&mut self, num_id: &str, ilvl: u32) -> u32 {
        let counter = self
            .counts
            .entry((num_id.to_string(), ilvl))
            .or_insert(0);
        *counter += 1;
        *counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERING: &str = r#"<?xml version="1.0"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl>
    <w:lvl w:ilvl="1"><w:numFmt w:val="decimal"/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="1">
    <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

    #[test]
    fn resolves_through_abstract_definitions() {
        let defs = NumberingDefinitions::parse(NUMBERING).unwrap();
        assert!(!defs.is_ordered("1", 0), "bullet level");
        assert!(defs.is_ordered("1", 1), "decimal sub-level");
        assert!(defs.is_ordered("2", 0), "decimal list");
    }

    #[test]
    fn unknown_ids_fall_back_to_bullets() {
        let defs = NumberingDefinitions::parse(NUMBERING).unwrap();
        assert!(!defs.is_ordered("42", 0));
        assert!(!defs.is_ordered("1", 7));
        assert!(!NumberingDefinitions::default().is_ordered("1", 0));
    }

    #[test]
    fn counters_are_independent_per_list_and_level() {
        let mut counters = ListCounters::default();
        assert_eq!(counters.next("1", 0), 1);
        assert_eq!(counters.next("1", 0), 2);
        assert_eq!(counters.next("1", 1), 1);
        assert_eq!(counters.next("2", 0), 1);
        assert_eq!(counters.next("1", 0), 3);
    }
}
