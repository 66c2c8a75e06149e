//! Tuple destructuring of a single-case type.

use adt_diagnostic::{DeriveMessage, ErrorCode, MessageLocalization};

use crate::{DerivedCodeSpec, FnDecl, RustTy, SynthContext};

pub(super) fn derive(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let [ctor] = cx.adt.constructors.as_slice() else {
        return DerivedCodeSpec::warning(DeriveMessage::at(
            ErrorCode::W3001,
            format!(
                "`destructure` needs a single-case type, but `{}` has {} cases; nothing generated",
                cx.lookup(cx.adt.name),
                cx.adt.constructors.len()
            ),
            MessageLocalization::on_annotation(cx.adt.name, cx.annotation),
        ));
    };

    let types: Vec<RustTy> = ctor
        .case_fields()
        .iter()
        .map(|a| cx.narrowed_borrowed_ty(ctor, a))
        .collect();
    let values: Vec<String> = ctor
        .case_fields()
        .iter()
        .map(|a| cx.borrow_expr(ctor, a, &cx.field_name(a.name)))
        .collect();
    let mut lines = vec![format!("let {} = value;", cx.field_pattern(ctor))];
    match values.as_slice() {
        [] => {}
        [single] => lines.push(format!("({single},)")),
        _ => lines.push(format!("({})", values.join(", "))),
    }
    let destructure = FnDecl::new("destructure", RustTy::Tuple(types))
        .doc("Borrow every field at once.")
        .generics(cx.ctor_generics_without_existentials(ctor))
        .param("value", RustTy::reference(cx.result_ty(ctor)))
        .body(lines);
    DerivedCodeSpec::of_methods(vec![destructure])
}
