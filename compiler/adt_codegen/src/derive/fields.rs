//! Getters and modifiers, one set per field name.
//!
//! A field name shared by several cases gets a single accessor. Fields typed
//! with a case-local variable are erased and get none.

use adt_diagnostic::{DeriveMessage, ErrorCode, MessageLocalization};
use adt_model::{DataConstructor, FieldEntry};

use crate::{DerivedCodeSpec, FnDecl, Generic, RustTy, SynthContext};

pub(super) fn getters(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let index = cx.adt.field_index();
    let mut unit = DerivedCodeSpec::new();
    for entry in index.iter() {
        if is_erased(cx, entry) {
            continue;
        }
        if entry.has_conflict() {
            unit.warnings.push(conflict(cx, entry, "getter"));
            continue;
        }
        let holders = holders(cx, entry);
        let Some(&(first, position)) = holders.first() else {
            continue;
        };
        let arg = &first.arguments[position];
        let binding = cx.field_name(entry.name);
        let value = cx.borrow_expr(first, arg, &binding);
        let patterns: Vec<String> = holders
            .iter()
            .map(|&(ctor, position)| cx.single_field_pattern(ctor, position, &binding))
            .collect();
        let total = index.is_total(entry);

        let (ret, lines) = if total {
            (
                cx.borrowed_ty(first, arg),
                vec![
                    "match value {".to_owned(),
                    format!("    {} => {value},", patterns.join(" | ")),
                    "}".to_owned(),
                ],
            )
        } else {
            (
                RustTy::option(cx.borrowed_ty(first, arg)),
                vec![
                    "match value {".to_owned(),
                    format!("    {} => Some({value}),", patterns.join(" | ")),
                    "    _ => None,".to_owned(),
                    "}".to_owned(),
                ],
            )
        };
        unit.methods.push(
            FnDecl::new(format!("get_{}", cx.field_snake(entry.name)), ret)
                .generics(cx.adt_generics())
                .param("value", RustTy::reference(cx.self_ty()))
                .body(lines),
        );
    }
    unit
}

pub(super) fn modifiers(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let index = cx.adt.field_index();
    let mut unit = DerivedCodeSpec::new();
    for entry in index.iter() {
        if is_erased(cx, entry) {
            continue;
        }
        if entry.has_conflict() {
            unit.warnings.push(conflict(cx, entry, "modifier"));
            continue;
        }
        let holders = holders(cx, entry);
        let Some(&(first, position)) = holders.first() else {
            continue;
        };
        let arg = &first.arguments[position];
        let snake = cx.field_snake(entry.name);
        let field_ty = cx.rust_ty(&arg.ty);
        let recursive = cx.adt.is_recursive_argument(arg);
        let generics: Vec<Generic> = if recursive {
            cx.adt_generics()
                .into_iter()
                .map(|g| g.bound("Clone"))
                .collect()
        } else {
            cx.adt_generics()
        };

        let mut lines = vec!["match value {".to_owned()];
        for &(ctor, position) in &holders {
            lines.push(format!(
                "    {} => {},",
                cx.field_pattern(ctor),
                rebuild(cx, ctor, position)
            ));
        }
        if !index.is_total(entry) {
            lines.push("    other => other,".to_owned());
        }
        lines.push("}".to_owned());
        let modify = FnDecl::new(format!("modify_{snake}"), cx.self_ty())
            .doc(format!("Replace `{snake}` by `update` of its current value."))
            .generics(generics.clone())
            .param("value", cx.self_ty())
            .param(
                "update",
                RustTy::impl_fn_once(vec![field_ty.clone()], field_ty.clone()),
            )
            .body(lines);

        let replacement = format!("new_{snake}");
        let set = FnDecl::new(format!("set_{snake}"), cx.self_ty())
            .generics(generics)
            .param("value", cx.self_ty())
            .param(replacement.clone(), field_ty)
            .body(vec![format!("modify_{snake}(value, move |_| {replacement})")]);
        unit.methods.push(set);
        unit.methods.push(modify);
    }
    unit
}

/// Every constructor holding the field, with its position there.
fn holders<'a>(
    cx: &SynthContext<'a>,
    entry: &FieldEntry,
) -> Vec<(&'a DataConstructor, usize)> {
    entry
        .occurrences
        .iter()
        .filter_map(|o| {
            cx.adt
                .constructors
                .get(o.constructor)
                .map(|ctor| (ctor, o.position))
        })
        .collect()
}

fn is_erased(cx: &SynthContext<'_>, entry: &FieldEntry) -> bool {
    holders(cx, entry)
        .iter()
        .any(|&(ctor, position)| cx.is_existential(ctor, &ctor.arguments[position]))
}

/// `ctor` rebuilt from its field bindings with the field at `position`
/// passed through `update`.
fn rebuild(cx: &SynthContext<'_>, ctor: &DataConstructor, position: usize) -> String {
    let values: Vec<String> = ctor
        .arguments
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let binding = cx.field_name(arg.name);
            if i != position {
                binding
            } else if cx.adt.is_recursive_argument(arg) {
                format!("Rc::new(update(Rc::unwrap_or_clone({binding})))")
            } else {
                format!("update({binding})")
            }
        })
        .collect();
    cx.construct(ctor, &values)
}

fn conflict(cx: &SynthContext<'_>, entry: &FieldEntry, what: &str) -> DeriveMessage {
    let types: Vec<String> = entry
        .occurrences
        .iter()
        .map(|o| format!("`{}`", o.ty.display(cx.interner)))
        .collect();
    DeriveMessage::at(
        ErrorCode::W3002,
        format!(
            "field `{}` of `{}` has conflicting types ({}); no {what} generated",
            cx.lookup(entry.name),
            cx.lookup(cx.adt.name),
            types.join(", ")
        ),
        MessageLocalization::on_annotation(cx.adt.name, cx.annotation),
    )
}
