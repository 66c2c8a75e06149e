//! Structural fold.

use crate::{DerivedCodeSpec, FnDecl, Generic, RustTy, SynthContext};

/// `cata_<adt>` replaces every field of the ADT's own type by the fold of
/// that field; all other fields, witnesses included, are handed over
/// borrowed.
pub(super) fn derive(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let self_type = cx.adt.self_type();
    let result = RustTy::param(cx.result_param());
    let name = format!("cata_{}", cx.snake_name());
    let handlers: Vec<String> = cx
        .adt
        .constructors
        .iter()
        .map(|ctor| format!("on_{}", cx.ctor_snake(ctor)))
        .collect();
    let recurse_args = handlers.join(", ");

    let mut generics = cx.adt_generics();
    generics.push(Generic::new(cx.result_param()));
    let mut fold = FnDecl::new(name.clone(), result.clone())
        .doc("Fold `value` bottom-up, one handler per case.")
        .generics(generics)
        .param("value", RustTy::reference(cx.self_ty()));

    let mut lines = vec!["match value {".to_owned()];
    for (ctor, handler) in cx.adt.constructors.iter().zip(&handlers) {
        let mut params = Vec::with_capacity(ctor.arity() + ctor.restrictions.len());
        let mut args = Vec::with_capacity(ctor.arity() + ctor.restrictions.len());
        for arg in &ctor.case_fields() {
            let binding = cx.field_name(arg.name);
            if arg.ty == self_type {
                params.push(result.clone());
                args.push(format!("{name}(&**{binding}, {recurse_args})"));
            } else {
                params.push(cx.borrowed_ty(ctor, arg));
                args.push(cx.borrow_expr(ctor, arg, &binding));
            }
        }
        fold = fold.param(handler.clone(), RustTy::dyn_fn_ref(params, result.clone()));
        lines.push(format!(
            "    {} => {handler}({}),",
            cx.field_pattern(ctor),
            args.join(", ")
        ));
    }
    lines.push("}".to_owned());
    DerivedCodeSpec::of_methods(vec![fold.body(lines)])
}
