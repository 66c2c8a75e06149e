//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.

use crate::Diagnostic;

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop diagnostics identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting diagnostics from every declaration of a run.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    /// Errors dropped by the limit.
    suppressed: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error()
            && self.config.error_limit > 0
            && self.error_count >= self.config.error_limit
        {
            self.suppressed += 1;
            return false;
        }

        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }

        if diag.is_error() {
            self.error_count += 1;
        } else if diag.is_warning() {
            self.warning_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Errors dropped because the limit was reached.
    #[inline]
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Take all diagnostics sorted by primary position.
    ///
    /// The sort is stable: diagnostics without a position keep their
    /// insertion order after positioned ones.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        diagnostics.sort_by_key(|d| {
            d.primary_span()
                .map_or((1, u32::MAX), |span| (0, span.start))
        });
        self.error_count = 0;
        self.warning_count = 0;
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use adt_ir::Span;

    fn error_at(start: u32) -> Diagnostic {
        Diagnostic::new(ErrorCode::E2001)
            .with_message(format!("no instance at {start}"))
            .with_label(Span::new(start, start + 1), "here")
    }

    #[test]
    fn flush_sorts_by_position() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        queue.add(error_at(40));
        queue.add(Diagnostic::new(ErrorCode::E9001).with_message("internal"));
        queue.add(error_at(3));
        let flushed = queue.flush();
        assert_eq!(flushed[0].primary_span(), Some(Span::new(3, 4)));
        assert_eq!(flushed[1].primary_span(), Some(Span::new(40, 41)));
        assert_eq!(flushed[2].primary_span(), None);
    }

    #[test]
    fn error_limit_suppresses_extra_errors_but_not_warnings() {
        let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
            error_limit: 1,
            deduplicate: true,
        });
        assert!(queue.add(error_at(1)));
        assert!(!queue.add(error_at(2)));
        assert!(queue.add(Diagnostic::new(ErrorCode::W3001).with_message("skipped")));
        assert_eq!(queue.error_count(), 1);
        assert_eq!(queue.warning_count(), 1);
        assert_eq!(queue.suppressed(), 1);
    }

    #[test]
    fn duplicates_are_dropped() {
        let mut queue = DiagnosticQueue::new();
        assert!(queue.add(error_at(7)));
        assert!(!queue.add(error_at(7)));
        assert_eq!(queue.flush().len(), 1);
    }
}
