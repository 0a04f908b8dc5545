//! A line-oriented session that remembers names across submissions.

use std::collections::HashSet;

use folio_core::{BackendError, ExecutionBackend, Output};

/// Understands just enough Rust to exercise state sharing between cells:
///
/// - `let x = ...` and `fn`/`struct`/`enum`/`trait` items bind their name
/// - `show_doc(x)` and `show_doc!(x)` display `x`, failing when `x` is unbound
/// - `println!("...")` prints the literal to stdout
///
/// Every other line is accepted and ignored.
#[derive(Debug, Default)]
pub struct LineSession {
    bound: HashSet<String>,
}

impl ExecutionBackend for LineSession {
    fn submit(&mut self, source: &str) -> Result<Vec<Output>, BackendError> {
        let mut stdout = String::new();
        let mut outputs = Vec::new();

        for line in source.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("let ").or_else(|| item(line)) {
                self.bound.insert(leading_ident(rest).to_string());
            } else if let Some(rest) = line
                .strip_prefix("show_doc!(")
                .or_else(|| line.strip_prefix("show_doc("))
            {
                let name = rest.trim_end_matches([')', ';']);
                if !self.bound.contains(name) {
                    return Err(BackendError::new(format!(
                        "error[E0425]: cannot find value `{name}` in this scope"
                    )));
                }
                outputs.push(Output::markdown(&format!("**{name}**")));
            } else if let Some(rest) = line.strip_prefix("println!(\"") {
                stdout.push_str(rest.trim_end_matches("\");"));
                stdout.push('\n');
            }
        }

        if !stdout.is_empty() {
            outputs.insert(0, Output::stdout(&stdout));
        }
        Ok(outputs)
    }
}

fn item(line: &str) -> Option<&str> {
    let line = line.strip_prefix("pub ").unwrap_or(line);
    ["fn ", "struct ", "enum ", "trait "]
        .iter()
        .find_map(|keyword| line.strip_prefix(keyword))
}

fn leading_ident(text: &str) -> &str {
    let end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    &text[..end]
}
