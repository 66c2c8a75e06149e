//! Diagnostic system for adtgen.
//!
//! Every phase reports problems as a [`DeriveMessage`]: an error code, free
//! text, and zero or more [`MessageLocalization`]s pinning it to a
//! declaration, an annotation, or one annotation value. Fatal messages
//! travel through [`DeriveResult`]; informational and warning messages are
//! accumulated alongside successful output.
//!
//! At the edge, messages become [`Diagnostic`]s, which the
//! [`queue::DiagnosticQueue`] orders and deduplicates and an
//! [`emitter::DiagnosticEmitter`] renders.

mod diagnostic;
pub mod emitter;
mod error_code;
mod message;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity, SourceInfo};
pub use error_code::ErrorCode;
pub use message::{DeriveMessage, DeriveResult, MessageLocalization};
pub use queue::{DiagnosticConfig, DiagnosticQueue};
