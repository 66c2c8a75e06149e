//! Error codes for all adtgen diagnostics.
//!
//! Format: the first digit is the phase.
//! - E1xxx: ADT model errors
//! - E2xxx: instance resolution errors
//! - W3xxx: synthesis warnings
//! - I2xxx: informational messages
//! - E9xxx: internal invariant violations

use std::fmt;

use crate::Severity;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorCode {
    // Model Errors (E1xxx)
    /// No abstract matcher method
    E1001,
    /// More than one abstract method
    E1002,
    /// Matcher is not generic in its return type
    E1003,
    /// Matcher case is not a function returning the result type
    E1004,
    /// Type variable not declared on the data type
    E1005,
    /// Declared type parameter unused by every constructor
    E1006,
    /// Duplicate constructor name
    E1007,
    /// Explicit field names do not match the case arity
    E1008,
    /// Visitor interface not found
    E1009,
    /// Duplicate field name within one constructor
    E1010,
    /// Unknown derivation name in annotation
    E1011,
    /// Matcher declares no cases
    E1012,

    // Resolution Errors (E2xxx)
    /// No instance found
    E2001,
    /// Ambiguous instances
    E2002,
    /// No generator for the requested type class
    E2003,
    /// Instance search exceeded its depth limit
    E2004,

    // Informational (I2xxx)
    /// Instance resolved through a low-priority provider
    I2001,

    // Synthesis Warnings (W3xxx)
    /// Destructuring requested for a multi-case type
    W3001,
    /// Field has conflicting types across constructors
    W3002,

    // Internal Errors (E9xxx)
    /// Internal invariant violation
    E9001,
}

impl ErrorCode {
    /// All codes, for `explain` listings and exhaustive tests.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E1009,
        ErrorCode::E1010,
        ErrorCode::E1011,
        ErrorCode::E1012,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::I2001,
        ErrorCode::W3001,
        ErrorCode::W3002,
        ErrorCode::E9001,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::I2001 => "I2001",
            ErrorCode::W3001 => "W3001",
            ErrorCode::W3002 => "W3002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line explanation used by `adtc explain`.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "the data declaration has no abstract matcher method",
            ErrorCode::E1002 => "the data declaration has more than one abstract method",
            ErrorCode::E1003 => {
                "the matcher must return a type variable declared on the matcher itself"
            }
            ErrorCode::E1004 => "every matcher case must be a function returning the result type",
            ErrorCode::E1005 => "a constructor uses a type variable the declaration does not declare",
            ErrorCode::E1006 => "a declared type parameter is not used by any constructor",
            ErrorCode::E1007 => "two matcher cases share a constructor name",
            ErrorCode::E1008 => "the number of explicit field names differs from the case arity",
            ErrorCode::E1009 => "the visitor interface named by the matcher is not in scope",
            ErrorCode::E1010 => "two fields of one constructor share a name",
            ErrorCode::E1011 => "the annotation requests an unknown derivation",
            ErrorCode::E1012 => "the matcher declares no cases",
            ErrorCode::E2001 => "no instance of the type class was found for a field type",
            ErrorCode::E2002 => "several equally specific instances match a field type",
            ErrorCode::E2003 => "no instance generator is registered for the type class",
            ErrorCode::E2004 => "instance search nested deeper than the resolution limit",
            ErrorCode::I2001 => "an instance was found only through a low-priority provider",
            ErrorCode::W3001 => "destructuring applies only to single-constructor types",
            ErrorCode::W3002 => "a field name is used with different types by different constructors",
            ErrorCode::E9001 => "internal invariant violation",
        }
    }

    /// Severity a message with this code is reported at.
    pub fn severity(self) -> Severity {
        match self.as_str().as_bytes().first() {
            Some(b'W') => Severity::Warning,
            Some(b'I') => Severity::Note,
            _ => Severity::Error,
        }
    }

    /// Parse a code such as `E2001` (case-insensitive).
    pub fn parse(text: &str) -> Option<ErrorCode> {
        let upper = text.trim().to_ascii_uppercase();
        ErrorCode::ALL.iter().copied().find(|c| c.as_str() == upper)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
