//! Algebraic data type model for adtgen.
//!
//! [`build_model`] turns one annotated declaration into an
//! [`AlgebraicDataType`]: its ordered constructors, their fields, and the
//! per-constructor type restrictions of GADT-style declarations. The model
//! is the only input the synthesizer and the instance resolver read.
//!
//! ```text
//! match<R>(Const: fn(i32) -> R, Add: fn(Expr, Expr) -> R) -> R
//!     => Expr = Const(value: i32) | Add(expr1: Expr, expr2: Expr)
//! ```

mod adt;
mod builder;
mod fields;

pub use adt::{
    AlgebraicDataType, CaseSignature, DataArgument, DataConstructor, MatcherEncoding,
    TypeRestriction,
};
pub use builder::{build_model, declared_cases};
pub use fields::{derive_field_names, FieldEntry, FieldIndex, FieldOccurrence};
