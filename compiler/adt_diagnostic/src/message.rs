//! Derive messages and their source localizations.

use adt_ir::{Name, Span};

use crate::{Diagnostic, ErrorCode, Severity};

/// Outcome of every model-building, resolution and synthesis step.
///
/// Chains short-circuit on the first fatal message via `?`.
pub type DeriveResult<T> = Result<T, DeriveMessage>;

/// Where a message points in the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageLocalization {
    /// An element of a declaration (the declaration itself, a parameter,
    /// a type parameter, a static member).
    Declaration { decl: Name, span: Span },
    /// The data annotation of a declaration.
    Annotation { decl: Name, span: Span },
    /// One value inside the data annotation.
    AnnotationValue {
        decl: Name,
        annotation: Span,
        value: Span,
    },
}

impl MessageLocalization {
    pub fn on_declaration(decl: Name, span: Span) -> Self {
        MessageLocalization::Declaration { decl, span }
    }

    pub fn on_annotation(decl: Name, span: Span) -> Self {
        MessageLocalization::Annotation { decl, span }
    }

    /// Localize on one annotation value.
    ///
    /// The value span is kept as the primary location; the annotation span
    /// is reported as context.
    pub fn on_annotation_value(decl: Name, annotation: Span, value: Span) -> Self {
        MessageLocalization::AnnotationValue {
            decl,
            annotation,
            value,
        }
    }

    /// The declaration this localization belongs to.
    pub fn decl(&self) -> Name {
        match self {
            MessageLocalization::Declaration { decl, .. }
            | MessageLocalization::Annotation { decl, .. }
            | MessageLocalization::AnnotationValue { decl, .. } => *decl,
        }
    }

    /// The most precise span available.
    pub fn span(&self) -> Span {
        match self {
            MessageLocalization::Declaration { span, .. }
            | MessageLocalization::Annotation { span, .. } => *span,
            MessageLocalization::AnnotationValue { value, .. } => *value,
        }
    }
}

/// A diagnostic produced while deriving code.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeriveMessage {
    pub code: ErrorCode,
    pub text: String,
    pub localizations: Vec<MessageLocalization>,
}

impl DeriveMessage {
    pub fn new(code: ErrorCode, text: impl Into<String>) -> Self {
        DeriveMessage {
            code,
            text: text.into(),
            localizations: Vec::new(),
        }
    }

    /// A message pinned to one location.
    pub fn at(code: ErrorCode, text: impl Into<String>, loc: MessageLocalization) -> Self {
        Self::new(code, text).with_localization(loc)
    }

    #[must_use]
    pub fn with_localization(mut self, loc: MessageLocalization) -> Self {
        self.localizations.push(loc);
        self
    }

    #[must_use]
    pub fn with_localizations(
        mut self,
        locs: impl IntoIterator<Item = MessageLocalization>,
    ) -> Self {
        self.localizations.extend(locs);
        self
    }

    /// An internal invariant violation.
    #[cold]
    pub fn internal(text: impl Into<String>) -> Self {
        Self::new(ErrorCode::E9001, text)
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Convert into a renderable diagnostic.
    ///
    /// The first localization becomes the primary label; the rest are
    /// secondary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(self.code).with_message(self.text.clone());
        for (i, loc) in self.localizations.iter().enumerate() {
            let text = match loc {
                MessageLocalization::Declaration { .. } => "declared here",
                MessageLocalization::Annotation { .. } => "requested by this annotation",
                MessageLocalization::AnnotationValue { .. } => "requested here",
            };
            diag = if i == 0 {
                diag.with_label(loc.span(), text)
            } else {
                diag.with_secondary_label(loc.span(), text)
            };
            if let MessageLocalization::AnnotationValue { annotation, .. } = loc {
                diag = diag.with_secondary_label(*annotation, "in this annotation");
            }
        }
        diag
    }
}
