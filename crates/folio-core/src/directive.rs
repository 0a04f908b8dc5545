//! Cell directives.
//!
//! A directive is a `//|` line comment at the start of a line:
//!
//! ```text
//! //| export
//! //| filter_stream warning: deprecated
//! //| echo: false
//! ```
//!
//! The key is the first word after the marker (an optional `:` may follow it);
//! everything after the key is split on whitespace into arguments. Keys are
//! normalized so that `-` and `_` are interchangeable.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// The directive marker.
pub const MARKER: &str = "//|";

/// Directives that mark a cell's code as part of the exported library.
pub const EXPORT_FAMILY: &[&str] = &["export", "exporti"];

/// Directives that remove a cell's content from the rendered page.
pub const HIDE_FAMILY: &[&str] = &["export", "exporti", "hide", "default_exp"];

static DIRECTIVE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*//\|[ \t]*([A-Za-z_][\w-]*):?[ \t]*(.*?)[ \t]*$")
        .expect("directive pattern is valid")
});

/// The set of directives a cell declares, with their arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    entries: BTreeMap<String, Vec<String>>,
}

impl Directives {
    /// Collect the directives declared in `source`.
    ///
    /// A key declared more than once keeps the arguments of its last line.
    pub fn parse(source: &str) -> Self {
        let entries = DIRECTIVE_LINE
            .captures_iter(source)
            .map(|caps| {
                let args = caps[2].split_whitespace().map(str::to_string).collect();
                (normalize_key(&caps[1]), args)
            })
            .collect();
        Self { entries }
    }

    /// Whether `key` is declared.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    /// Whether any of `keys` is declared.
    pub fn intersects(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.contains(key))
    }

    /// Arguments of `key`, if declared.
    pub fn args(&self, key: &str) -> Option<&[String]> {
        self.entries.get(&normalize_key(key)).map(Vec::as_slice)
    }

    /// Declared keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the cell is exported to the library.
    pub fn is_export(&self) -> bool {
        self.intersects(EXPORT_FAMILY)
    }

    /// Whether the cell's content is hidden from the page.
    pub fn is_hidden(&self) -> bool {
        self.intersects(HIDE_FAMILY)
    }
}

fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}
