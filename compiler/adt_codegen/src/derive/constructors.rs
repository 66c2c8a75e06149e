//! One construction function per case.

use crate::{DerivedCodeSpec, FnDecl, SynthContext};

pub(super) fn derive(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let methods = cx
        .adt
        .constructors
        .iter()
        .map(|ctor| {
            let mut decl = FnDecl::new(cx.ctor_fn_name(ctor), cx.result_ty(ctor))
                .generics(cx.ctor_generics(ctor));
            decl.params = cx.ctor_params(ctor);
            decl.body(vec![cx.construct_from_fields(ctor)])
        })
        .collect();
    DerivedCodeSpec::of_methods(methods)
}
