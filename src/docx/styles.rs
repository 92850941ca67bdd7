//! Paragraph-style resolution: which style ids are headings, and at what
//! level.
//!
//! Heading detection uses `w:outlineLvl` from `word/styles.xml` when the
//! part is present, falling back to the conventional `Heading1`–`Heading9`
//! and `Title` style ids when it is not.

use super::package::attr;
use crate::error::ConvertError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Map of paragraph style id → heading level (1-based, capped at 6).
#[derive(Debug, Default)]
pub(crate) struct StyleMap {
    heading_levels: HashMap<String, usize>,
}

impl StyleMap {
    /// Parse `word/styles.xml`, recording the outline level of every
    /// paragraph style that declares one.
    pub fn parse(xml: &str) -> Result<Self, ConvertError> {
        let mut map = Self::default();
        let mut reader = Reader::from_str(xml);
        let mut current_style: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:style" => {
                        current_style = match attr(&e, b"w:type").as_deref() {
                            Some("paragraph") | None => attr(&e, b"w:styleId"),
                            _ => None,
                        };
                    }
                    b"w:outlineLvl" => {
                        if let (Some(id), Some(lvl)) = (
                            current_style.as_ref(),
                            attr(&e, b"w:val").and_then(|v| v.parse::<usize>().ok()),
                        ) {
                            // outlineLvl is 0-based; Markdown allows six levels.
                            map.heading_levels.insert(id.clone(), (lvl + 1).min(6));
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:style" => {
                    current_style = None;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConvertError::BadXml {
                        part: "word/styles.xml".to_string(),
                        detail: e.to_string(),
                    })
                }
                _ => {}
            }
        }
        Ok(map)
    }

    /// Heading level for a paragraph style id, or `None` for body text.
    pub fn heading_level(&self, style_id: &str) -> Option<usize> {
        if let Some(&lvl) = self.heading_levels.get(style_id) {
            return Some(lvl);
        }
        conventional_level(style_id)
    }
}

/// Built-in style-id conventions, used when styles.xml is absent or the
/// style carries no outline level.
fn conventional_level(style_id: &str) -> Option<usize> {
    if style_id.eq_ignore_ascii_case("Title") {
        return Some(1);
    }
    let digits = style_id.strip_prefix("Heading").or_else(|| style_id.strip_prefix("heading"))?;
    let lvl: usize = digits.parse().ok()?;
    (1..=9).contains(&lvl).then_some(lvl.min(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Overskrift1">
    <w:name w:val="heading 1"/>
    <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Overskrift2">
    <w:pPr><w:outlineLvl w:val="1"/></w:pPr>
  </w:style>
  <w:style w:type="character" w:styleId="Emphasis"/>
  <w:style w:type="paragraph" w:styleId="Normal"/>
</w:styles>"#;

    #[test]
    fn outline_levels_are_one_based() {
        let map = StyleMap::parse(STYLES).unwrap();
        assert_eq!(map.heading_level("Overskrift1"), Some(1));
        assert_eq!(map.heading_level("Overskrift2"), Some(2));
        assert_eq!(map.heading_level("Normal"), None);
    }

    #[test]
    fn conventional_ids_work_without_styles_part() {
        let map = StyleMap::default();
        assert_eq!(map.heading_level("Heading1"), Some(1));
        assert_eq!(map.heading_level("Heading3"), Some(3));
        assert_eq!(map.heading_level("Heading9"), Some(6), "capped at six");
        assert_eq!(map.heading_level("Title"), Some(1));
        assert_eq!(map.heading_level("Heading0"), None);
        assert_eq!(map.heading_level("BodyText"), None);
    }

    #[test]
    fn character_styles_are_ignored() {
        let map = StyleMap::parse(STYLES).unwrap();
        assert_eq!(map.heading_level("Emphasis"), None);
    }
}
