//! Intermediate representation shared by every adtgen phase.
//!
//! - `Name` / `StringInterner`: 32-bit interned identifiers
//! - `Span`: byte ranges into the snapshot's source file
//! - `TypeExpr`: type expressions with free type variables
//! - `decl`: the read-only declaration snapshot the host toolchain supplies
//! - `DerivationKind`: the derivation targets an annotation can request

pub mod decl;
mod derives;
pub mod ident;
mod interner;
mod name;
mod span;
mod ty;

pub use decl::{
    AnnotationValue, DataAnnotation, DataDecl, InterfaceDecl, MethodDecl, ParamDecl,
    ProviderSource, Snapshot, StaticMember, TypeParam,
};
pub use derives::DerivationKind;
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
pub use ty::{is_tuple_name, TypeDisplay, TypeExpr};
