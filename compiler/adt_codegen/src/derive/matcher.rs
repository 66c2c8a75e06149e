//! Visitor trait, `accept`, and the lambda-taking `match_<adt>`.

use adt_ir::ident::pascal_case;
use adt_model::MatcherEncoding;

use crate::{DerivedCodeSpec, FnDecl, GenType, Generic, RustTy, SynthContext, TraitDecl};

pub(super) fn derive(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let trait_name = trait_name(cx);
    let result = cx.result_param();
    let mut trait_generics = cx.adt_generics();
    trait_generics.push(Generic::new(result.clone()));
    let trait_args: Vec<RustTy> = trait_generics
        .iter()
        .map(|g| RustTy::param(g.name.clone()))
        .collect();

    let methods = cx
        .adt
        .constructors
        .iter()
        .map(|ctor| {
            let mut method = FnDecl::new(cx.ctor_fn_name(ctor), RustTy::param(result.clone()))
                .with_receiver();
            for arg in &ctor.case_fields() {
                method = method.param(cx.field_name(arg.name), cx.borrowed_ty(ctor, arg));
            }
            method
        })
        .collect();
    let cases = TraitDecl {
        name: trait_name.clone(),
        doc: Some(format!(
            "One method per case of `{}`; see [`{}::accept`].",
            cx.lookup(cx.adt.name),
            cx.module_name()
        )),
        generics: trait_generics.clone(),
        methods,
    };

    let cases_ty = format!("{trait_name}{}", args_text(&trait_args));
    let mut accept_lines = vec!["match value {".to_owned()];
    for ctor in &cx.adt.constructors {
        let args: Vec<String> = ctor
            .case_fields()
            .iter()
            .map(|a| cx.borrow_expr(ctor, a, &cx.field_name(a.name)))
            .collect();
        accept_lines.push(format!(
            "    {} => cases.{}({}),",
            cx.field_pattern(ctor),
            cx.ctor_fn_name(ctor),
            args.join(", ")
        ));
    }
    accept_lines.push("}".to_owned());
    let accept = FnDecl::new("accept", RustTy::param(result.clone()))
        .doc("Dispatch `value` to the method of `cases` for its case.")
        .generics(trait_generics.clone())
        .param("value", RustTy::reference(cx.self_ty()))
        .param("cases", RustTy::reference(RustTy::named(format!("impl {cases_ty}"))))
        .body(accept_lines);

    let mut lambda = FnDecl::new(format!("match_{}", cx.snake_name()), RustTy::param(result.clone()))
        .doc("Apply the handler for `value`'s case to its fields.")
        .generics(trait_generics)
        .param("value", RustTy::reference(cx.self_ty()));
    let mut match_lines = vec!["match value {".to_owned()];
    for ctor in &cx.adt.constructors {
        let handler = format!("on_{}", cx.ctor_snake(ctor));
        let params = ctor
            .case_fields()
            .iter()
            .map(|a| cx.borrowed_ty(ctor, a))
            .collect();
        lambda = lambda.param(
            handler.clone(),
            RustTy::impl_fn_once(params, RustTy::param(result.clone())),
        );
        let args: Vec<String> = ctor
            .case_fields()
            .iter()
            .map(|a| cx.borrow_expr(ctor, a, &cx.field_name(a.name)))
            .collect();
        match_lines.push(format!(
            "    {} => {handler}({}),",
            cx.field_pattern(ctor),
            args.join(", ")
        ));
    }
    match_lines.push("}".to_owned());
    let lambda = lambda.body(match_lines);

    let mut unit = DerivedCodeSpec::of_type(GenType::Trait(cases));
    unit.methods.push(accept);
    unit.methods.push(lambda);
    unit
}

/// The visitor interface's own name when the matcher takes one, else
/// `<Adt>Cases`.
fn trait_name(cx: &SynthContext<'_>) -> String {
    match cx.adt.encoding {
        MatcherEncoding::Visitor { interface, .. } => pascal_case(cx.lookup(interface)),
        MatcherEncoding::Lambdas => format!("{}Cases", cx.type_name()),
    }
}

fn args_text(args: &[RustTy]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let items: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("<{}>", items.join(", "))
}
