//! Per-case narrowed matchers: `is_<case>` and `if_<case>`.

use crate::{DerivedCodeSpec, FnDecl, Generic, RustTy, SynthContext};

pub(super) fn derive(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let result = cx.result_param();
    let multi = !cx.adt.is_single_case();
    let mut methods = Vec::with_capacity(cx.adt.constructors.len() * 2);
    for ctor in &cx.adt.constructors {
        let snake = cx.ctor_snake(ctor);
        let value_ty = RustTy::reference(cx.result_ty(ctor));
        let generics = cx.ctor_generics_without_existentials(ctor);

        methods.push(
            FnDecl::new(format!("is_{snake}"), RustTy::bool())
                .generics(generics.clone())
                .param("value", value_ty.clone())
                .body(vec![format!(
                    "matches!(value, {})",
                    cx.wildcard_pattern(ctor)
                )]),
        );

        let params: Vec<RustTy> = ctor
            .case_fields()
            .iter()
            .map(|a| cx.narrowed_borrowed_ty(ctor, a))
            .collect();
        let args: Vec<String> = ctor
            .case_fields()
            .iter()
            .map(|a| cx.borrow_expr(ctor, a, &cx.field_name(a.name)))
            .collect();
        let mut lines = vec![
            "match value {".to_owned(),
            format!(
                "    {} => Some(on_{snake}({})),",
                cx.field_pattern(ctor),
                args.join(", ")
            ),
        ];
        if multi {
            lines.push("    _ => None,".to_owned());
        }
        lines.push("}".to_owned());
        let mut if_generics = generics;
        if_generics.push(Generic::new(result.clone()));
        methods.push(
            FnDecl::new(
                format!("if_{snake}"),
                RustTy::option(RustTy::param(result.clone())),
            )
            .doc(format!(
                "`Some` of the handler's result when `value` is `{}`.",
                cx.variant_name(ctor)
            ))
            .generics(if_generics)
            .param("value", value_ty)
            .param(
                format!("on_{snake}"),
                RustTy::impl_fn_once(params, RustTy::param(result.clone())),
            )
            .body(lines),
        );
    }
    DerivedCodeSpec::of_methods(methods)
}
