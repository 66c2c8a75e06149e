//! Rendering a run's messages as diagnostics.

use std::io::Write;

use adt_diagnostic::emitter::{DiagnosticEmitter, JsonEmitter, TerminalEmitter};
use adt_diagnostic::{DeriveMessage, DiagnosticQueue, SourceInfo};
use adt_ir::Snapshot;

use crate::{DriverConfig, OutputFormat};

/// Counts of what a report contained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    /// Errors dropped by the configured limit.
    pub suppressed: usize,
}

/// Queue, sort and emit `messages` in the configured format.
pub fn report<W: Write>(
    messages: &[DeriveMessage],
    snapshot: &Snapshot,
    config: &DriverConfig,
    writer: W,
    is_tty: bool,
) -> ReportSummary {
    let mut queue = DiagnosticQueue::with_config(config.diagnostics.clone());
    for message in messages {
        queue.add(message.to_diagnostic());
    }
    let summary = ReportSummary {
        errors: queue.error_count(),
        warnings: queue.warning_count(),
        suppressed: queue.suppressed(),
    };
    let diagnostics = queue.flush();
    let source = match (&snapshot.path, &snapshot.source) {
        (Some(path), Some(content)) => Some(SourceInfo::new(path.clone(), content.clone())),
        _ => None,
    };

    match config.format {
        OutputFormat::Terminal => {
            let mut emitter =
                TerminalEmitter::with_color_mode(writer, config.color, is_tty).with_source(source);
            emitter.emit_all(&diagnostics);
            emitter.emit_summary(summary.errors, summary.warnings);
            emitter.flush();
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(writer, source);
            emitter.emit_all(&diagnostics);
            emitter.flush();
        }
    }
    summary
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use adt_diagnostic::{ErrorCode, MessageLocalization};
    use adt_ir::{Span, StringInterner};
    use pretty_assertions::assert_eq;

    fn messages(interner: &StringInterner) -> Vec<DeriveMessage> {
        let expr = interner.intern("Expr");
        vec![
            DeriveMessage::at(
                ErrorCode::W3001,
                "`destructure` needs a single-case type",
                MessageLocalization::on_annotation(expr, Span::new(0, 5)),
            ),
            DeriveMessage::at(
                ErrorCode::E2001,
                "no `Eq` instance found for `i32`",
                MessageLocalization::on_declaration(expr, Span::new(22, 26)),
            ),
        ]
    }

    fn render(config: &DriverConfig, snapshot: &Snapshot) -> (ReportSummary, String) {
        let interner = StringInterner::new();
        let mut out = Vec::new();
        let summary = report(&messages(&interner), snapshot, config, &mut out, false);
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn terminal_report_resolves_positions() {
        let snapshot = Snapshot {
            path: Some("Expr.java".to_owned()),
            source: Some("@Data\n\nabstract class Expr {}\n".to_owned()),
            ..Snapshot::default()
        };
        let config = DriverConfig {
            color: adt_diagnostic::emitter::ColorMode::Never,
            ..DriverConfig::default()
        };
        let (summary, text) = render(&config, &snapshot);
        assert_eq!(
            summary,
            ReportSummary {
                errors: 1,
                warnings: 1,
                suppressed: 0
            }
        );
        assert!(text.starts_with("warning[W3001]"), "{text}");
        assert!(text.contains("--> Expr.java:3:16: declared here"), "{text}");
        assert!(text.ends_with("error: 1 declaration error; 1 warning emitted\n"), "{text}");
    }

    #[test]
    fn json_report_is_one_array() {
        let config = DriverConfig {
            format: OutputFormat::Json,
            ..DriverConfig::default()
        };
        let (_, text) = render(&config, &Snapshot::default());
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let codes: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["W3001", "E2001"]);
    }
}
