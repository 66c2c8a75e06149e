//! Rust source rendering of a [`DerivedCodeSpec`].
//!
//! Layout of a rendered module:
//!
//! ```text
//! // @generated by adtc from `Expr`. Do not edit.
//! use super::*;
//! use std::rc::Rc;
//!
//! pub enum Expr { .. }
//! pub trait ExprCases<R> { .. }
//! pub static EXPR_EQ: LazyLock<Eq<Expr>> = ..;
//!
//! pub mod expr {
//!     use super::*;
//!     pub fn add(..) -> Expr { .. }
//! }
//! ```

use adt_ir::{
    ident::{escape_ident, snake_case},
    StringInterner,
};
use adt_model::AlgebraicDataType;

use crate::{
    generics_text, DerivedCodeSpec, Emitter, EnumDecl, FnDecl, GenType, StaticDecl,
    StringEmitter, StructDecl, TraitDecl,
};

/// Print `spec` as the generated module for `adt`.
pub fn render_module(
    adt: &AlgebraicDataType,
    spec: &DerivedCodeSpec,
    interner: &StringInterner,
) -> String {
    let mut out = StringEmitter::with_capacity(4096);
    let source = interner.lookup(adt.name);
    out.emit_line(0, &format!("// @generated by adtc from `{source}`. Do not edit."));
    out.emit_line(0, "use super::*;");
    for path in &spec.uses {
        out.emit_line(0, &format!("use {path};"));
    }

    for ty in &spec.types {
        out.emit_newline();
        match ty {
            GenType::Enum(decl) => emit_enum(&mut out, decl),
            GenType::Trait(decl) => emit_trait(&mut out, decl),
            GenType::Struct(decl) => emit_struct(&mut out, decl),
        }
    }

    for field in &spec.fields {
        out.emit_newline();
        emit_static(&mut out, field);
    }

    if !spec.methods.is_empty() {
        out.emit_newline();
        out.emit_line(
            0,
            &format!("pub mod {} {{", escape_ident(&snake_case(source))),
        );
        out.emit_line(1, "use super::*;");
        for method in &spec.methods {
            out.emit_newline();
            emit_fn(&mut out, 1, method, true);
        }
        out.emit_line(0, "}");
    }

    out.finish_lines();
    out.output()
}

fn emit_doc(out: &mut impl Emitter, level: usize, doc: Option<&String>) {
    if let Some(doc) = doc {
        for line in doc.lines() {
            out.emit_line(level, &format!("/// {line}"));
        }
    }
}

fn emit_enum(out: &mut impl Emitter, decl: &EnumDecl) {
    emit_doc(out, 0, decl.doc.as_ref());
    if !decl.derives.is_empty() {
        out.emit_line(0, &format!("#[derive({})]", decl.derives.join(", ")));
    }
    out.emit_line(
        0,
        &format!("pub enum {}{} {{", decl.name, generics_text(&decl.generics)),
    );
    for variant in &decl.variants {
        if variant.fields.is_empty() {
            out.emit_line(1, &format!("{},", variant.name));
            continue;
        }
        out.emit_line(1, &format!("{} {{", variant.name));
        for field in &variant.fields {
            out.emit_line(2, &format!("{}: {},", field.name, field.ty));
        }
        out.emit_line(1, "},");
    }
    out.emit_line(0, "}");
}

fn emit_trait(out: &mut impl Emitter, decl: &TraitDecl) {
    emit_doc(out, 0, decl.doc.as_ref());
    out.emit_line(
        0,
        &format!("pub trait {}{} {{", decl.name, generics_text(&decl.generics)),
    );
    for method in &decl.methods {
        emit_fn(out, 1, method, false);
    }
    out.emit_line(0, "}");
}

fn emit_struct(out: &mut impl Emitter, decl: &StructDecl) {
    emit_doc(out, 0, decl.doc.as_ref());
    let generics = generics_text(&decl.generics);
    if decl.fields.is_empty() {
        out.emit_line(0, "#[derive(Clone, Copy, Debug, Default)]");
        out.emit_line(0, &format!("pub struct {}{generics};", decl.name));
    } else {
        out.emit_line(0, &format!("pub struct {}{generics} {{", decl.name));
        for field in &decl.fields {
            out.emit_line(1, &format!("pub {}: {},", field.name, field.ty));
        }
        out.emit_line(0, "}");
    }
    if decl.methods.is_empty() {
        return;
    }
    let args: Vec<&str> = decl.generics.iter().map(|g| g.name.as_str()).collect();
    let applied = if args.is_empty() {
        String::new()
    } else {
        format!("<{}>", args.join(", "))
    };
    out.emit_newline();
    out.emit_line(0, &format!("impl{generics} {}{applied} {{", decl.name));
    for (i, method) in decl.methods.iter().enumerate() {
        if i > 0 {
            out.emit_newline();
        }
        emit_fn(out, 1, method, true);
    }
    out.emit_line(0, "}");
}

fn emit_static(out: &mut impl Emitter, decl: &StaticDecl) {
    emit_doc(out, 0, decl.doc.as_ref());
    out.emit_line(
        0,
        &format!(
            "pub static {}: LazyLock<{}> = LazyLock::new(|| {{",
            decl.name, decl.ty
        ),
    );
    for line in &decl.init {
        out.emit_line(1, line);
    }
    out.emit_line(0, "});");
}

/// A function with its body, or a required trait method (`;`).
fn emit_fn(out: &mut impl Emitter, level: usize, decl: &FnDecl, public: bool) {
    emit_doc(out, level, decl.doc.as_ref());
    let vis = if public { "pub " } else { "" };
    match &decl.body {
        None => out.emit_line(level, &format!("{vis}{};", decl.signature())),
        Some(lines) => {
            out.emit_line(level, &format!("{vis}{} {{", decl.signature()));
            for line in lines {
                out.emit_line(level + 1, line);
            }
            out.emit_line(level, "}");
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
