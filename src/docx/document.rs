//! Event-driven walk of `word/document.xml`, emitting Markdown.
//!
//! WordprocessingML nests content as body → paragraph → run → text, with
//! tables, hyperlinks, and drawings woven through. The walker keeps one
//! small state struct per nesting level (paragraph, run, link, table) and
//! dispatches on element names as events arrive. Anything it does not
//! recognise is skipped, never fatal.

use super::numbering::{ListCounters, NumberingDefinitions};
use super::package::{attr, val_off, DocxPackage, Relationships};
use super::styles::StyleMap;
use crate::error::ConvertError;
use crate::images::ImageSink;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

/// Per-paragraph state: resolved style and numbering, plus the text built
/// from its runs.
#[derive(Debug, Default)]
struct ParagraphState {
    style_id: Option<String>,
    num_id: Option<String>,
    ilvl: u32,
    buf: String,
}

/// An open `w:hyperlink`: target plus the text accumulated inside it.
#[derive(Debug)]
struct LinkState {
    target: Option<String>,
    text: String,
}

/// An open top-level `w:tbl`.
#[derive(Debug, Default)]
struct TableBuf {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    in_cell: bool,
}

pub(crate) struct DocumentWalker<'a> {
    package: &'a DocxPackage,
    styles: &'a StyleMap,
    numbering: &'a NumberingDefinitions,
    rels: &'a Relationships,
    images: ImageSink<'a>,
    counters: ListCounters,
    out: String,

    para: ParagraphState,
    in_run: bool,
    in_run_props: bool,
    in_text: bool,
    bold: bool,
    italic: bool,
    run_text: String,
    link: Option<LinkState>,
    table: Option<TableBuf>,
    /// Nesting depth of `w:tbl`; only depth 1 produces table structure,
    /// deeper tables flatten into the enclosing cell.
    tbl_depth: usize,
    pending_alt: String,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(
        package: &'a DocxPackage,
        styles: &'a StyleMap,
        numbering: &'a NumberingDefinitions,
        rels: &'a Relationships,
        images: ImageSink<'a>,
    ) -> Self {
        Self {
            package,
            styles,
            numbering,
            rels,
            images,
            counters: ListCounters::default(),
            out: String::new(),
            para: ParagraphState::default(),
            in_run: false,
            in_run_props: false,
            in_text: false,
            bold: false,
            italic: false,
            run_text: String::new(),
            link: None,
            table: None,
            tbl_depth: 0,
            pending_alt: String::new(),
        }
    }

    /// Walk the main document part and return the raw (pre-postprocess)
    /// Markdown.
    pub fn walk(mut self) -> Result<String, ConvertError> {
        let xml = self.package.document_xml()?;
        let mut reader = Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => self.handle_start(&e)?,
                Ok(Event::Empty(e)) => self.handle_empty(&e)?,
                Ok(Event::End(e)) => self.handle_end(&e),
                Ok(Event::Text(t)) => {
                    if self.in_text {
                        let text = t.unescape().unwrap_or_default();
                        self.run_text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if self.in_text {
                        self.run_text
                            .push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConvertError::BadXml {
                        part: "word/document.xml".to_string(),
                        detail: e.to_string(),
                    })
                }
                _ => {}
            }
        }
        Ok(self.out)
    }

    // ── Event dispatch ───────────────────────────────────────────────────

    fn handle_start(&mut self, e: &BytesStart<'_>) -> Result<(), ConvertError> {
        match e.name().as_ref() {
            b"w:p" => self.para = ParagraphState::default(),
            b"w:r" => {
                self.in_run = true;
                self.bold = false;
                self.italic = false;
                self.run_text.clear();
            }
            b"w:rPr" => {
                if self.in_run {
                    self.in_run_props = true;
                }
            }
            b"w:t" => self.in_text = true,
            b"w:hyperlink" => self.start_hyperlink(e),
            b"w:tbl" => {
                self.tbl_depth += 1;
                if self.tbl_depth == 1 {
                    self.table = Some(TableBuf::default());
                }
            }
            b"w:tr" => {
                if self.tbl_depth == 1 {
                    if let Some(t) = &mut self.table {
                        t.row.clear();
                    }
                }
            }
            b"w:tc" => {
                if self.tbl_depth == 1 {
                    if let Some(t) = &mut self.table {
                        t.cell.clear();
                        t.in_cell = true;
                    }
                }
            }
            b"w:drawing" => self.pending_alt.clear(),
            _ => self.handle_marker(e)?,
        }
        Ok(())
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>) -> Result<(), ConvertError> {
        match e.name().as_ref() {
            // An empty paragraph contributes nothing; spacing is handled
            // by the flush of its neighbours.
            b"w:p" | b"w:r" | b"w:t" | b"w:tbl" | b"w:tr" | b"w:tc" => Ok(()),
            _ => self.handle_marker(e),
        }
    }

    /// Property and inline elements that are usually self-closing but may
    /// appear as start/end pairs.
    fn handle_marker(&mut self, e: &BytesStart<'_>) -> Result<(), ConvertError> {
        match e.name().as_ref() {
            b"w:pStyle" => self.para.style_id = attr(e, b"w:val"),
            b"w:numId" => self.para.num_id = attr(e, b"w:val"),
            b"w:ilvl" => {
                self.para.ilvl = attr(e, b"w:val").and_then(|v| v.parse().ok()).unwrap_or(0);
            }
            b"w:b" => {
                if self.in_run && self.in_run_props && !val_off(e) {
                    self.bold = true;
                }
            }
            b"w:i" => {
                if self.in_run && self.in_run_props && !val_off(e) {
                    self.italic = true;
                }
            }
            b"w:br" => {
                // Page and column breaks have no Markdown equivalent.
                if self.in_run && !matches!(attr(e, b"w:type").as_deref(), Some("page") | Some("column")) {
                    self.run_text.push('\n');
                }
            }
            b"w:cr" => {
                if self.in_run {
                    self.run_text.push('\n');
                }
            }
            b"w:tab" => {
                if self.in_run {
                    self.run_text.push('\t');
                }
            }
            b"w:noBreakHyphen" => {
                if self.in_run {
                    self.run_text.push('-');
                }
            }
            b"wp:docPr" => {
                self.pending_alt = attr(e, b"descr")
                    .or_else(|| attr(e, b"name"))
                    .unwrap_or_default();
            }
            b"a:blip" => {
                if let Some(id) = attr(e, b"r:embed") {
                    self.emit_image(&id)?;
                }
            }
            b"v:imagedata" => {
                if let Some(id) = attr(e, b"r:id") {
                    self.emit_image(&id)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) {
        match e.name().as_ref() {
            b"w:p" => self.end_paragraph(),
            b"w:r" => self.end_run(),
            b"w:rPr" => self.in_run_props = false,
            b"w:t" => self.in_text = false,
            b"w:hyperlink" => self.end_hyperlink(),
            b"w:tc" => {
                if self.tbl_depth == 1 {
                    if let Some(t) = &mut self.table {
                        let cell = std::mem::take(&mut t.cell);
                        t.row.push(clean_cell(&cell));
                        t.in_cell = false;
                    }
                }
            }
            b"w:tr" => {
                if self.tbl_depth == 1 {
                    if let Some(t) = &mut self.table {
                        let row = std::mem::take(&mut t.row);
                        if !row.is_empty() {
                            t.rows.push(row);
                        }
                    }
                }
            }
            b"w:tbl" => {
                if self.tbl_depth == 1 {
                    if let Some(t) = self.table.take() {
                        self.flush_table(t);
                    }
                }
                self.tbl_depth = self.tbl_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    // ── Content routing ──────────────────────────────────────────────────

    /// Append inline content to the innermost open container: hyperlink
    /// text, then table cell, then the current paragraph.
    fn push_text(&mut self, s: &str) {
        if let Some(link) = &mut self.link {
            link.text.push_str(s);
        } else if let Some(t) = &mut self.table {
            if t.in_cell {
                t.cell.push_str(s);
            }
        } else {
            self.para.buf.push_str(s);
        }
    }

    fn in_table_cell(&self) -> bool {
        self.table.as_ref().map(|t| t.in_cell).unwrap_or(false)
    }

    fn end_run(&mut self) {
        self.in_run = false;
        self.in_run_props = false;
        let text = std::mem::take(&mut self.run_text);
        if text.is_empty() {
            return;
        }
        let formatted = wrap_formatted(&text, self.bold, self.italic);
        self.push_text(&formatted);
    }

    fn start_hyperlink(&mut self, e: &BytesStart<'_>) {
        let target = match attr(e, b"r:id") {
            Some(id) => self.rels.target(&id).map(str::to_string),
            None => attr(e, b"w:anchor").map(|a| format!("#{a}")),
        };
        self.link = Some(LinkState {
            target,
            text: String::new(),
        });
    }

    fn end_hyperlink(&mut self) {
        let Some(link) = self.link.take() else {
            return;
        };
        let text = link.text.trim().to_string();
        if text.is_empty() {
            return;
        }
        match link.target {
            Some(target) => self.push_text(&format!("[{text}]({target})")),
            None => self.push_text(&text),
        }
    }

    fn emit_image(&mut self, rel_id: &str) -> Result<(), ConvertError> {
        let Some(target) = self.rels.target(rel_id) else {
            warn!("image relationship '{rel_id}' not found; skipping");
            return Ok(());
        };
        let part = self.package.resolve_target(target);
        let Some(bytes) = self.package.part(&part) else {
            warn!("image part '{part}' missing from archive; skipping");
            return Ok(());
        };
        let content_type = self.package.content_type_for(&part);
        if let Some(src) = self.images.emit(bytes, &content_type)? {
            let alt = std::mem::take(&mut self.pending_alt);
            self.push_text(&format!("![{alt}]({src})"));
        }
        Ok(())
    }

    // ── Block flushing ───────────────────────────────────────────────────

    fn end_paragraph(&mut self) {
        if self.in_table_cell() {
            // Paragraph boundary inside a cell becomes a word boundary.
            if let Some(t) = &mut self.table {
                if !t.cell.is_empty() && !t.cell.ends_with(' ') {
                    t.cell.push(' ');
                }
            }
            return;
        }
        self.flush_paragraph();
    }

    fn flush_paragraph(&mut self) {
        let para = std::mem::take(&mut self.para);
        let text = para.buf.trim();
        if text.is_empty() {
            return;
        }

        let heading = para
            .style_id
            .as_deref()
            .and_then(|id| self.styles.heading_level(id));

        if let Some(level) = heading {
            self.ensure_blank_line();
            self.out.push_str(&"#".repeat(level));
            self.out.push(' ');
            self.out.push_str(text);
            self.out.push_str("\n\n");
        } else if let Some(num_id) = para.num_id {
            // List items stay tight; the next non-list block restores the
            // blank line via ensure_blank_line.
            let indent = "  ".repeat(para.ilvl as usize);
            if self.numbering.is_ordered(&num_id, para.ilvl) {
                let n = self.counters.next(&num_id, para.ilvl);
                self.out.push_str(&format!("{indent}{n}. {text}\n"));
            } else {
                self.out.push_str(&format!("{indent}- {text}\n"));
            }
        } else {
            self.ensure_blank_line();
            self.out.push_str(text);
            self.out.push_str("\n\n");
        }
    }

    fn flush_table(&mut self, t: TableBuf) {
        if t.rows.is_empty() {
            return;
        }
        self.ensure_blank_line();
        let cols = t.rows[0].len().max(1);

        for (i, row) in t.rows.iter().enumerate() {
            self.out.push('|');
            for c in 0..cols.max(row.len()) {
                let cell = row.get(c).map(String::as_str).unwrap_or("");
                self.out.push(' ');
                self.out.push_str(cell);
                self.out.push_str(" |");
            }
            self.out.push('\n');
            if i == 0 {
                self.out.push('|');
                for _ in 0..cols {
                    self.out.push_str(" --- |");
                }
                self.out.push('\n');
            }
        }
        self.out.push('\n');
    }

    fn ensure_blank_line(&mut self) {
        if self.out.is_empty() {
            return;
        }
        while !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }
}

/// Wrap run text in emphasis markers, keeping surrounding whitespace
/// outside the markers so the emphasis stays valid Markdown.
fn wrap_formatted(text: &str, bold: bool, italic: bool) -> String {
    let marker = match (bold, italic) {
        (true, true) => "***",
        (true, false) => "**",
        (false, true) => "*",
        (false, false) => return text.to_string(),
    };
    let core = text.trim();
    if core.is_empty() {
        return text.to_string();
    }
    let lead_len = text.len() - text.trim_start().len();
    let (lead, rest) = text.split_at(lead_len);
    let trail = &rest[core.len()..];
    format!("{lead}{marker}{core}{marker}{trail}")
}

/// Normalise a table cell for GFM: single line, pipes escaped.
fn clean_cell(cell: &str) -> String {
    cell.replace('\n', " ").replace('|', "\\|").trim().to_string()
}
