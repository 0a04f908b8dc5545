//! Rules that rewrite or remove a cell's source text.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::notebook::Cell;

/// Languages recognized by `%%<lang>` cell magics.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "bash",
    "html",
    "javascript",
    "js",
    "latex",
    "markdown",
    "perl",
    "ruby",
    "sh",
    "svg",
];

/// Directive line prepended to show-doc cells.
pub const ECHO_OFF: &str = "//| echo: false";

static HIDE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//\|[ \t]*hide_line[ \t]*$").expect("hide_line pattern is valid"));

static MAGIC_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(%%|%).*").expect("magic pattern is valid"));

/// Magics plus session commands such as `:dep serde = "1"`. `::path` is Rust.
static NON_RUST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(%%|%|:[A-Za-z]).*").expect("non-Rust line pattern is valid")
});

/// Remove the source of a cell that declares a hide-family directive.
pub fn hide(cell: &mut Cell) {
    if cell.has_source() && cell.directives().is_hidden() {
        cell.clear_source();
    }
}

/// Drop code lines ending in `//| hide_line`, keeping every other line as is.
pub fn hide_line(cell: &mut Cell) {
    if !cell.is_code() || !cell.has_source() {
        return;
    }
    let text = cell.text();
    if !text.lines().any(|line| HIDE_LINE.is_match(line)) {
        return;
    }
    let kept = text
        .lines()
        .filter(|line| !HIDE_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n");
    cell.source = Some(kept);
}

/// Strip `%` and `%%` magic lines from code cells, then trim the source.
pub fn clean_magics(cell: &mut Cell) {
    if !cell.is_code() || !cell.has_source() {
        return;
    }
    let cleaned = MAGIC_LINE.replace_all(cell.text(), "");
    let cleaned = cleaned.trim();
    if cleaned != cell.text() {
        cell.source = Some(cleaned.to_string());
    }
}

/// Blank out magic and session command lines but keep the line structure,
/// so positions in the remaining Rust source stay where they were.
pub(crate) fn blank_magic_lines(text: &str) -> Cow<'_, str> {
    NON_RUST_LINE.replace_all(text, "")
}

/// Clear markdown headings that end with ` -`; they are not meant to render.
pub fn remove_dashed_heading(cell: &mut Cell) {
    if !cell.is_markdown() {
        return;
    }
    let text = cell.text().trim();
    if text.starts_with('#') && text.ends_with(" -") {
        cell.clear_source();
    }
}

/// Tags code cells that switch language with a `%%<lang>` magic.
#[derive(Debug, Clone)]
pub struct LanguageTagger {
    pattern: Regex,
}

impl LanguageTagger {
    pub fn new<S: AsRef<str>>(languages: &[S]) -> Result<Self> {
        if languages.is_empty() {
            return Err(Error::Configuration(
                "at least one language must be configured".to_string(),
            ));
        }
        if let Some(bad) = languages
            .iter()
            .map(AsRef::as_ref)
            .find(|lang| lang.is_empty() || lang.contains(char::is_whitespace))
        {
            return Err(Error::Configuration(format!(
                "invalid language name `{bad}`"
            )));
        }
        let alternation = languages
            .iter()
            .map(|lang| regex::escape(lang.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?m)^[ \t]*%%[ \t]*({alternation})[ \t]*$"))
            .map_err(|e| Error::Configuration(format!("invalid language list: {e}")))?;
        Ok(Self { pattern })
    }

    /// Set `metadata.language` from the first recognized language magic.
    pub fn apply(&self, cell: &mut Cell) {
        if !cell.is_code() || !cell.has_source() {
            return;
        }
        let Some(caps) = self.pattern.captures(cell.text()) else {
            return;
        };
        let language = match &caps[1] {
            "js" => "javascript",
            other => other,
        }
        .to_string();
        cell.set_language(&language);
    }
}

impl Default for LanguageTagger {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES).expect("default languages are valid")
    }
}

/// Prepends an `echo: false` directive to cells that invoke the show-doc
/// function or macro.
///
/// Renderers then show the call's output without the call itself.
#[derive(Debug, Clone)]
pub struct EchoAnnotator {
    pattern: Regex,
}

impl EchoAnnotator {
    pub fn new(show_doc_name: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"(?m)^{}\b", regex::escape(show_doc_name)))
            .map_err(|e| Error::Configuration(format!("invalid show-doc name: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn apply(&self, cell: &mut Cell) {
        if !cell.is_code() || !cell.has_source() {
            return;
        }
        if !self.pattern.is_match(cell.text()) || cell.directives().contains("echo") {
            return;
        }
        cell.source = Some(format!("{ECHO_OFF}\n{}", cell.text()));
    }
}
