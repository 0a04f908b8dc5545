//! Cell-level text transforms.
//!
//! Each rule mutates one cell in place or leaves it alone. Rules never fail
//! on a well-formed cell, a rule that finds nothing to match is a no-op, and
//! a cell with absent or empty source is never matched. Rules that need
//! configuration (`StreamFilter`, `LanguageTagger`, `EchoAnnotator`) compile
//! their patterns up front so bad configuration fails before any cell is
//! touched.

mod output;
mod source;

pub use output::{StreamFilter, filter_stream, strip_ansi};
pub(crate) use source::blank_magic_lines;
pub use source::{
    DEFAULT_LANGUAGES, ECHO_OFF, EchoAnnotator, LanguageTagger, clean_magics, hide, hide_line,
    remove_dashed_heading,
};
