//! Type resolver for adtgen.
//!
//! Works directly on [`adt_ir::TypeExpr`] trees with immutable
//! [`Substitution`]s: nothing here mutates a type expression or shares a
//! mutable binding table. Unification is purely syntactic; a failed
//! [`unify`] means "not applicable", never a fatal error.
//!
//! ```text
//! let s = unify(&list_a, &list_int)?;   // Some({A := i32})
//! assert_eq!(resolve(&list_a, &s), list_int);
//! ```

mod fresh;
mod stack;
mod substitution;
mod unify;

pub use fresh::FreshVars;
pub use stack::ensure_sufficient_stack;
pub use substitution::{resolve, substitute, Substitution};
pub use unify::{match_type, unify, unify_with, ArityKind, UnifyContext, UnifyError, Unifier};
