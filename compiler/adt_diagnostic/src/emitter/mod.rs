//! Diagnostic Emitters
//!
//! - Terminal: colored, human-readable output
//! - JSON: machine-readable output for tooling

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use std::fmt::Write;

use adt_ir::Span;

use crate::{Diagnostic, SourceInfo};

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// Render a span as `path:line:col`, or `start..end` without a source.
pub(crate) fn position(source: Option<&SourceInfo>, span: Span) -> String {
    match source {
        Some(src) => {
            let (line, col) = span.line_col(&src.content);
            format!("{}:{line}:{col}", src.path)
        }
        None => format!("{span:?}"),
    }
}

/// Escape a string for JSON output.
pub(crate) fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(result, "\\u{:04x}", c as u32);
            }
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_json() {
        assert_eq!(escape_json("hello"), "hello");
        assert_eq!(escape_json("\"quoted\""), "\\\"quoted\\\"");
        assert_eq!(escape_json("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_json("path\\file"), "path\\\\file");
    }

    #[test]
    fn test_position_with_and_without_source() {
        let src = SourceInfo::new("expr.json", "{\n  \"name\": \"Expr\"\n}");
        assert_eq!(position(Some(&src), Span::new(4, 8)), "expr.json:2:3");
        assert_eq!(position(None, Span::new(4, 8)), "4..8");
    }
}
