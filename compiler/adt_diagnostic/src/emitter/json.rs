//! JSON Emitter
//!
//! One JSON array of diagnostics, written on `flush`.

use std::io::Write;

use crate::{Diagnostic, SourceInfo};

use super::{escape_json, position, DiagnosticEmitter};

pub struct JsonEmitter<W: Write> {
    writer: W,
    source: Option<SourceInfo>,
    entries: Vec<String>,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W, source: Option<SourceInfo>) -> Self {
        JsonEmitter {
            writer,
            source,
            entries: Vec::new(),
        }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let labels: Vec<String> = diagnostic
            .labels
            .iter()
            .map(|label| {
                format!(
                    "{{\"start\":{},\"end\":{},\"position\":\"{}\",\"message\":\"{}\",\"primary\":{}}}",
                    label.span.start,
                    label.span.end,
                    escape_json(&position(self.source.as_ref(), label.span)),
                    escape_json(&label.message),
                    label.is_primary
                )
            })
            .collect();
        let notes: Vec<String> = diagnostic
            .notes
            .iter()
            .map(|n| format!("\"{}\"", escape_json(n)))
            .collect();
        self.entries.push(format!(
            "{{\"code\":\"{}\",\"severity\":\"{}\",\"message\":\"{}\",\"labels\":[{}],\"notes\":[{}]}}",
            diagnostic.code,
            diagnostic.severity,
            escape_json(&diagnostic.message),
            labels.join(","),
            notes.join(",")
        ));
    }

    fn flush(&mut self) {
        let _ = writeln!(self.writer, "[{}]", self.entries.join(","));
        self.entries.clear();
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, _error_count: usize, _warning_count: usize) {}
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use adt_ir::Span;

    #[test]
    fn test_json_array() {
        let mut output = Vec::new();
        let mut emitter = JsonEmitter::new(&mut output, None);
        emitter.emit(
            &Diagnostic::new(ErrorCode::E2002)
                .with_message("ambiguous \"Show\" instances")
                .with_label(Span::new(1, 2), "declared here"),
        );
        emitter.emit(&Diagnostic::new(ErrorCode::W3001).with_message("skipped"));
        emitter.flush();
        drop(emitter);
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("[{\"code\":\"E2002\",\"severity\":\"error\""));
        assert!(text.contains("ambiguous \\\"Show\\\" instances"));
        assert!(text.contains("\"position\":\"1..2\""));
        assert!(text.contains("{\"code\":\"W3001\",\"severity\":\"warning\""));
    }
}
