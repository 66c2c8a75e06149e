//! Unification error types.

use adt_ir::{Name, StringInterner, TypeExpr};

/// Why two types could not be unified.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum UnifyError {
    /// Different constructors, or a function against a constructor.
    Mismatch {
        expected: TypeExpr,
        found: TypeExpr,
        context: UnifyContext,
    },

    /// `a = List<a>` would create an infinite type.
    InfiniteType { var: Name, containing_type: TypeExpr },

    /// A rigid variable was asked to equal something other than itself.
    RigidMismatch { var: Name, found: TypeExpr },

    /// Same constructor or function shape with a different argument count.
    ArityMismatch {
        expected: usize,
        found: usize,
        kind: ArityKind,
    },
}

/// What kind of construct has an arity mismatch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArityKind {
    /// Function parameter count.
    Function,
    /// Type argument count.
    TypeArgs,
}

/// Where inside the compared types the failure happened.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum UnifyContext {
    #[default]
    TopLevel,
    FunctionParam { index: usize },
    FunctionReturn,
    TypeArg { index: usize },
}

impl UnifyContext {
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "types",
            Self::FunctionParam { .. } => "function parameter",
            Self::FunctionReturn => "function return type",
            Self::TypeArg { .. } => "type argument",
        }
    }
}

impl UnifyError {
    /// Human-readable text with type names resolved.
    pub fn describe(&self, interner: &StringInterner) -> String {
        match self {
            Self::Mismatch {
                expected,
                found,
                context,
            } => format!(
                "expected `{}`, found `{}` in {}",
                expected.display(interner),
                found.display(interner),
                context.description()
            ),
            Self::InfiniteType {
                var,
                containing_type,
            } => format!(
                "`{}` occurs in `{}`",
                interner.lookup(*var),
                containing_type.display(interner)
            ),
            Self::RigidMismatch { var, found } => format!(
                "type parameter `{}` cannot stand for `{}`",
                interner.lookup(*var),
                found.display(interner)
            ),
            Self::ArityMismatch { .. } => self.to_string(),
        }
    }
}

impl std::fmt::Display for UnifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch { context, .. } => {
                write!(f, "type mismatch in {}", context.description())
            }
            Self::InfiniteType { .. } => {
                write!(f, "infinite type: variable occurs in its own definition")
            }
            Self::RigidMismatch { .. } => {
                write!(f, "type parameter cannot be unified with another type")
            }
            Self::ArityMismatch {
                expected,
                found,
                kind,
            } => {
                let kind_str = match kind {
                    ArityKind::Function => "function parameters",
                    ArityKind::TypeArgs => "type arguments",
                };
                write!(
                    f,
                    "arity mismatch: expected {expected} {kind_str}, found {found}"
                )
            }
        }
    }
}

impl std::error::Error for UnifyError {}
