//! Code synthesis for adtgen.
//!
//! Turns an [`adt_model::AlgebraicDataType`] into Rust declarations:
//!
//! - [`generate`]: the native enum plus one unit per requested
//!   [`adt_ir::DerivationKind`]
//! - [`generate_instance`] / [`derive_instances`]: type-class instances built
//!   from resolved field instances by an [`InstanceGenerator`]
//! - [`render_module`]: prints a [`DerivedCodeSpec`] as a Rust module
//!
//! Generated code targets a native `enum` with a companion module of free
//! functions named after the ADT. Recursive fields are stored behind `Rc`,
//! case-local type variables are erased to `Rc<dyn Any>`, and narrowed
//! (GADT-style) constructors store their type-equality witness as an
//! `Rc<dyn Fn(C) -> T>` field.

mod context;
mod decl;
mod derive;
mod emitter;
mod instances;
mod render;

pub use context::{is_unit_variant, SynthContext};
pub use decl::{
    generics_text, DerivedCodeSpec, EnumDecl, FnDecl, GenType, Generic, Param, RustTy,
    StaticDecl, StructDecl, TraitDecl, VariantDecl,
};
pub use derive::generate;
pub use emitter::{Emitter, StringEmitter};
pub use instances::{
    derive_instances, generate_instance, EqGenerator, FieldInstances, GeneratorRegistry,
    HashGenerator, InstanceGenerator, OrdGenerator, ShowGenerator,
};
pub use render::render_module;

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod test_support;
