//! Type-class instance synthesis.
//!
//! Every non-witness field of every constructor gets an instance from the
//! [`adt_instances::InstanceResolver`]; an [`InstanceGenerator`] then turns
//! those into one expression building the class value. Non-parametric ADTs
//! get a `LazyLock` static, parametric ones a function taking one instance
//! per type variable that needs one.
//!
//! Class values are assumed to be built with `Class::new(closure)` and to be
//! cheap to clone.

mod builtins;
mod naming;
mod registry;

use adt_diagnostic::{DeriveMessage, DeriveResult, ErrorCode, MessageLocalization};
use adt_instances::{InstanceLocation, InstanceResolver, ProviderOrder};
use adt_ir::{DataDecl, Name, Snapshot, Span, TypeExpr};
use adt_model::DataConstructor;

use crate::{DerivedCodeSpec, FnDecl, Generic, RustTy, StaticDecl, SynthContext};

pub use builtins::{EqGenerator, HashGenerator, OrdGenerator, ShowGenerator};
pub use registry::GeneratorRegistry;

use naming::InstanceNaming;

/// Builds the instance expression for one type class.
pub trait InstanceGenerator {
    /// The class name as annotations spell it.
    fn class(&self) -> &'static str;

    /// Lines of the expression constructing the instance.
    ///
    /// `instances` holds, per constructor and field, an expression usable as
    /// a method receiver for that field's instance.
    fn build(&self, cx: &SynthContext<'_>, instances: &FieldInstances) -> Vec<String>;

    /// `use` paths the expression needs.
    fn uses(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Receiver expressions of the resolved field instances.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldInstances {
    by_constructor: Vec<Vec<String>>,
}

impl FieldInstances {
    pub fn new(by_constructor: Vec<Vec<String>>) -> Self {
        FieldInstances { by_constructor }
    }

    /// One expression per argument of `ctor`, in field order.
    pub fn of(&self, ctor: &DataConstructor) -> &[String] {
        self.by_constructor
            .get(ctor.index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Resolve every field instance of `cx.adt` and emit the `class` instance.
///
/// `at` is the span of the annotation value requesting the class.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(adt = cx.lookup(cx.adt.name), class = cx.lookup(class))
)]
pub fn generate_instance(
    cx: &SynthContext<'_>,
    class: Name,
    at: Span,
    providers: &ProviderOrder<'_>,
    low_priority: &ProviderOrder<'_>,
    generator: &dyn InstanceGenerator,
) -> DeriveResult<DerivedCodeSpec> {
    let resolver = InstanceResolver::new(cx.adt, cx.interner, providers, low_priority);
    let mut locations: Vec<Vec<InstanceLocation>> = Vec::with_capacity(cx.adt.constructors.len());
    let mut infos = Vec::new();
    for ctor in &cx.adt.constructors {
        let mut row = Vec::with_capacity(ctor.arity());
        for arg in &ctor.arguments {
            let found = resolver.find_instance(class, &arg.ty, arg.span)?;
            if found.low_priority {
                infos.push(DeriveMessage::at(
                    ErrorCode::I2001,
                    format!(
                        "`{}` instance for field `{}` of `{}` comes from a low-priority provider: `{}`",
                        cx.lookup(class),
                        cx.lookup(arg.name),
                        cx.lookup(cx.adt.name),
                        found.location.describe(cx.interner)
                    ),
                    MessageLocalization::on_annotation_value(cx.adt.name, cx.annotation, at),
                )
                .with_localization(MessageLocalization::on_declaration(cx.adt.name, arg.span)));
            }
            row.push(found.location);
        }
        locations.push(row);
    }

    let naming = InstanceNaming::new(cx, class, &locations);
    if let Some((param_class, arg)) = naming.unpassable(&locations) {
        return Err(DeriveMessage::at(
            ErrorCode::E2001,
            format!(
                "`{}` for `{}` needs `{}<{}>` at a recursive use, which the generated instance cannot pass along",
                cx.lookup(class),
                cx.lookup(cx.adt.name),
                cx.lookup(param_class),
                arg.display(cx.interner)
            ),
            MessageLocalization::on_annotation_value(cx.adt.name, cx.annotation, at),
        ));
    }
    let mut lines = naming.hoisted_lets();
    let receivers = FieldInstances::new(
        locations
            .iter()
            .map(|row| row.iter().map(|l| naming.receiver(l)).collect())
            .collect(),
    );
    lines.extend(generator.build(cx, &receivers));

    let class_ty = RustTy::path(cx.lookup(class), vec![cx.self_ty()]);
    let mut unit = if cx.adt.is_parametric() {
        let generics: Vec<Generic> = cx
            .adt_generics()
            .into_iter()
            .map(|g| g.bound("'static"))
            .collect();
        let mut decl = FnDecl::new(naming.fn_name(), class_ty)
            .doc(format!("`{}` for `{}`.", cx.lookup(class), cx.type_name()))
            .generics(generics);
        for (name, (param_class, var)) in naming.params() {
            decl = decl.param(
                name,
                RustTy::path(
                    cx.lookup(param_class),
                    vec![RustTy::param(cx.lookup(var))],
                ),
            );
        }
        DerivedCodeSpec::of_methods(vec![decl.body(lines)])
    } else {
        let mut unit = DerivedCodeSpec::new();
        unit.fields.push(StaticDecl {
            name: naming.static_name(),
            doc: Some(format!("`{}` for `{}`.", cx.lookup(class), cx.type_name())),
            ty: class_ty,
            init: lines,
        });
        unit.using("std::sync::LazyLock")
    };
    for path in generator.uses() {
        unit.add_use(path);
    }
    unit.infos = infos;
    Ok(unit)
}

/// Every instance the declaration's annotation requests, in request order.
///
/// Classes without a registered generator fail with E2003 at the
/// annotation value naming them.
#[tracing::instrument(level = "debug", skip_all, fields(adt = cx.lookup(cx.adt.name)))]
pub fn derive_instances(
    cx: &SynthContext<'_>,
    decl: &DataDecl,
    snapshot: &Snapshot,
    registry: &GeneratorRegistry,
) -> DeriveResult<DerivedCodeSpec> {
    let targets: Vec<TypeExpr> = cx
        .adt
        .constructors
        .iter()
        .flat_map(|c| c.arguments.iter().map(|a| a.ty.clone()))
        .collect();
    let low_priority = ProviderOrder::low_priority(snapshot);
    let mut done: Vec<Name> = Vec::new();
    let mut units = Vec::new();
    for requested in &decl.annotation.instances {
        let class = requested.value;
        if done.contains(&class) {
            continue;
        }
        done.push(class);
        let Some(generator) = registry.get(cx.lookup(class)) else {
            return Err(DeriveMessage::at(
                ErrorCode::E2003,
                format!(
                    "no instance generator for type class `{}` (known: {})",
                    cx.lookup(class),
                    registry.classes().join(", ")
                ),
                MessageLocalization::on_annotation_value(
                    cx.adt.name,
                    decl.annotation.span,
                    requested.span,
                ),
            ));
        };
        let providers = ProviderOrder::for_derivation(snapshot, decl, class, &targets);
        tracing::trace!(providers = providers.len(), "provider order built");
        units.push(generate_instance(
            cx,
            class,
            requested.span,
            &providers,
            &low_priority,
            generator,
        )?);
    }
    Ok(DerivedCodeSpec::concat(units))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
