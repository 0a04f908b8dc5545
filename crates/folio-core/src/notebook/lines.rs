//! Serde helpers for nbformat multiline strings.
//!
//! nbformat stores `source` and stream `text` either as one string or as a
//! list of lines that each keep their trailing newline. Both shapes are
//! accepted on read; the list shape is written.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Multiline {
    One(String),
    Many(Vec<String>),
}

/// Split text into nbformat lines, keeping each `\n`.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// `Option<String>` cell source, where `None` means the content was removed.
pub mod source {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(text) => split_lines(text).serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Multiline>::deserialize(d)?.map(|raw| match raw {
            Multiline::One(text) => text,
            Multiline::Many(lines) => lines.concat(),
        }))
    }
}

/// Stream output text, kept as individual lines.
pub mod text {
    use super::*;

    pub fn serialize<S: Serializer>(lines: &[String], s: S) -> Result<S::Ok, S::Error> {
        lines.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Multiline::deserialize(d)? {
            Multiline::One(text) => split_lines(&text),
            Multiline::Many(lines) => lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_keeps_newlines() {
        assert_eq!(split_lines("a\nb\n"), vec!["a\n", "b\n"]);
        assert_eq!(split_lines("a\nb"), vec!["a\n", "b"]);
        assert!(split_lines("").is_empty());
    }
}
