//! Post-processing: deterministic cleanup of converted Markdown.
//!
//! Document converters leave structural noise behind: empty paragraphs
//! become runs of blank lines, Windows line endings leak through, and table
//! or heading emission can leave trailing spaces. This module applies a
//! small set of cheap, ordered string rules that fix the noise without
//! touching content. Each rule is a pure `&str → String` function and is
//! independently testable.
//!
//! ## Rule order
//!
//! Line endings are normalised first so every later rule can assume `\n`;
//! trailing whitespace is trimmed before blank-line collapsing so that
//! whitespace-only lines count as blank; the outer trim runs last.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to raw converter output.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF/CR → LF)
/// 2. Trim trailing whitespace per line
/// 3. Collapse blank-line runs so no two consecutive blank lines remain
/// 4. Trim leading/trailing whitespace of the whole document
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 3: Collapse blank-line runs ─────────────────────────────────────────
//
// Three or more consecutive newlines means at least two blank lines in a
// row; the batch output format allows at most one.

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
