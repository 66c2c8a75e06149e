//! Direct derivations: the native enum plus one unit per requested kind.

mod case_of;
mod cata;
mod constructors;
mod destructure;
mod factory;
mod fields;
mod lazy;
mod matcher;

use adt_diagnostic::{DeriveMessage, DeriveResult};
use adt_ir::DerivationKind;

use crate::{DerivedCodeSpec, EnumDecl, GenType, SynthContext, VariantDecl};

/// Synthesize the enum and every requested derivation, in request order.
///
/// Repeated kinds are generated once, at their first position.
#[tracing::instrument(level = "debug", skip_all, fields(adt = cx.lookup(cx.adt.name)))]
pub fn generate(
    cx: &SynthContext<'_>,
    requested: &[DerivationKind],
) -> DeriveResult<DerivedCodeSpec> {
    if cx.adt.constructors.is_empty() {
        return Err(DeriveMessage::internal(format!(
            "`{}` reached synthesis without constructors",
            cx.lookup(cx.adt.name)
        )));
    }

    let mut seen: Vec<DerivationKind> = Vec::with_capacity(requested.len());
    let mut spec = enum_unit(cx);
    for &kind in requested {
        if seen.contains(&kind) {
            tracing::trace!(kind = kind.name(), "duplicate derivation ignored");
            continue;
        }
        seen.push(kind);
        let unit = derive_kind(cx, kind);
        tracing::trace!(
            kind = kind.name(),
            methods = unit.methods.len(),
            warnings = unit.warnings.len(),
            "derived"
        );
        spec.append(unit);
    }
    Ok(spec)
}

fn derive_kind(cx: &SynthContext<'_>, kind: DerivationKind) -> DerivedCodeSpec {
    match kind {
        DerivationKind::Matcher => matcher::derive(cx),
        DerivationKind::Constructors => constructors::derive(cx),
        DerivationKind::Lazy => lazy::derive(cx),
        DerivationKind::CaseOf => case_of::derive(cx),
        DerivationKind::Destructure => destructure::derive(cx),
        DerivationKind::Getters => fields::getters(cx),
        DerivationKind::Modifiers => fields::modifiers(cx),
        DerivationKind::Catamorphism => cata::derive(cx),
        DerivationKind::Factory => factory::derive(cx),
    }
}

/// The native enum: one struct-like variant per constructor.
fn enum_unit(cx: &SynthContext<'_>) -> DerivedCodeSpec {
    let variants = cx
        .adt
        .constructors
        .iter()
        .map(|ctor| VariantDecl {
            name: cx.variant_name(ctor),
            fields: cx.variant_fields(ctor),
        })
        .collect();
    let mut unit = DerivedCodeSpec::of_type(GenType::Enum(EnumDecl {
        name: cx.type_name(),
        doc: Some(format!(
            "Cases of `{}`, one variant per matcher case.",
            cx.lookup(cx.adt.name)
        )),
        generics: cx.adt_generics(),
        derives: vec!["Clone"],
        variants,
    }));
    for path in cx.storage_uses() {
        unit.add_use(path);
    }
    unit
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
