//! A unit struct whose methods construct each case.

use crate::{DerivedCodeSpec, FnDecl, GenType, StructDecl, SynthContext};

pub(super) fn derive(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let methods = cx
        .adt
        .constructors
        .iter()
        .map(|ctor| {
            let mut decl = FnDecl::new(cx.ctor_fn_name(ctor), cx.result_ty(ctor))
                .generics(cx.ctor_generics(ctor))
                .with_receiver();
            decl.params = cx.ctor_params(ctor);
            decl.body(vec![cx.construct_from_fields(ctor)])
        })
        .collect();
    DerivedCodeSpec::of_type(GenType::Struct(StructDecl {
        name: format!("{}Factory", cx.type_name()),
        doc: Some(format!(
            "Constructs `{}` values; pass it where a factory value is expected.",
            cx.type_name()
        )),
        generics: Vec::new(),
        fields: Vec::new(),
        methods,
    }))
}
