//! Deferred construction.

use crate::{DerivedCodeSpec, FnDecl, Generic, RustTy, SynthContext};

pub(super) fn derive(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let self_ty = cx.self_ty();
    let deferred = RustTy::BoxedFnOnce {
        params: Vec::new(),
        ret: Box::new(self_ty.clone()),
    };
    let mut generics: Vec<Generic> = cx
        .adt_generics()
        .into_iter()
        .map(|g| g.bound("'static"))
        .collect();
    generics.push(Generic::new("F").bound(format!("FnOnce() -> {self_ty} + 'static")));
    let lazy = FnDecl::new("lazy", RustTy::path("LazyCell", vec![self_ty, deferred]))
        .doc("A value built by `build` on first access.")
        .generics(generics)
        .param("build", RustTy::param("F"))
        .body(vec!["LazyCell::new(Box::new(build))".to_owned()]);
    DerivedCodeSpec::of_methods(vec![lazy]).using("std::cell::LazyCell")
}
