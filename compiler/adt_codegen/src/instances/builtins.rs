//! Built-in instance generators: `Eq`, `Show`, `Ord`, `Hash`.
//!
//! Each expects its class to offer `Class::new` taking a closure, and one
//! method applying the instance to field values:
//!
//! | class  | closure                   | method          |
//! |--------|---------------------------|-----------------|
//! | `Eq`   | `Fn(&T, &T) -> bool`      | `eq(a, b)`      |
//! | `Show` | `Fn(&T) -> String`        | `show(a)`       |
//! | `Ord`  | `Fn(&T, &T) -> Ordering`  | `compare(a, b)` |
//! | `Hash` | `Fn(&T) -> u64`           | `hash(a)`       |

use adt_model::DataConstructor;

use crate::{FieldInstances, InstanceGenerator, SynthContext};

/// Structural equality: same case and pairwise equal fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqGenerator;

impl InstanceGenerator for EqGenerator {
    fn class(&self) -> &'static str {
        "Eq"
    }

    fn build(&self, cx: &SynthContext<'_>, instances: &FieldInstances) -> Vec<String> {
        let self_ty = cx.self_ty();
        let mut lines = vec![format!(
            "Eq::new(move |left: &{self_ty}, right: &{self_ty}| match (left, right) {{"
        )];
        for ctor in &cx.adt.constructors {
            let checks: Vec<String> = field_pairs(cx, ctor, instances)
                .into_iter()
                .map(|(instance, l, r)| format!("{instance}.eq({l}, {r})"))
                .collect();
            let body = if checks.is_empty() {
                "true".to_owned()
            } else {
                checks.join(" && ")
            };
            lines.push(format!("    {} => {body},", pair_pattern(cx, ctor)));
        }
        if !cx.adt.is_single_case() {
            lines.push("    _ => false,".to_owned());
        }
        lines.push("})".to_owned());
        lines
    }
}

/// Renders `Case(field, ..)` through each field's `Show`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShowGenerator;

impl InstanceGenerator for ShowGenerator {
    fn class(&self) -> &'static str {
        "Show"
    }

    fn build(&self, cx: &SynthContext<'_>, instances: &FieldInstances) -> Vec<String> {
        let self_ty = cx.self_ty();
        let mut lines = vec![format!("Show::new(move |value: &{self_ty}| match value {{")];
        for ctor in &cx.adt.constructors {
            let case = cx.lookup(ctor.name);
            let pattern = cx.pattern(ctor, |i| format!("v{i}"));
            let shown: Vec<String> = ctor
                .arguments
                .iter()
                .zip(instances.of(ctor))
                .enumerate()
                .map(|(i, (arg, instance))| {
                    format!("{instance}.show({})", cx.borrow_expr(ctor, arg, &format!("v{i}")))
                })
                .collect();
            let body = if shown.is_empty() {
                format!("String::from(\"{case}\")")
            } else {
                let holes = vec!["{}"; shown.len()].join(", ");
                format!("format!(\"{case}({holes})\", {})", shown.join(", "))
            };
            lines.push(format!("    {pattern} => {body},"));
        }
        lines.push("})".to_owned());
        lines
    }
}

/// Orders by case declaration order, then lexicographically by field.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrdGenerator;

impl InstanceGenerator for OrdGenerator {
    fn class(&self) -> &'static str {
        "Ord"
    }

    fn build(&self, cx: &SynthContext<'_>, instances: &FieldInstances) -> Vec<String> {
        let self_ty = cx.self_ty();
        let mut lines = vec![format!(
            "Ord::new(move |left: &{self_ty}, right: &{self_ty}| match (left, right) {{"
        )];
        for ctor in &cx.adt.constructors {
            let mut comparisons = field_pairs(cx, ctor, instances)
                .into_iter()
                .map(|(instance, l, r)| format!("{instance}.compare({l}, {r})"));
            let body = match comparisons.next() {
                None => "Ordering::Equal".to_owned(),
                Some(first) => comparisons.fold(first, |acc, next| {
                    format!("{acc}.then_with(|| {next})")
                }),
            };
            lines.push(format!("    {} => {body},", pair_pattern(cx, ctor)));
        }
        if !cx.adt.is_single_case() {
            lines.push("    _ => {".to_owned());
            lines.push(format!("        let ordinal = |value: &{self_ty}| -> usize {{"));
            lines.push("            match value {".to_owned());
            for ctor in &cx.adt.constructors {
                lines.push(format!(
                    "                {} => {},",
                    cx.wildcard_pattern(ctor),
                    ctor.index
                ));
            }
            lines.push("            }".to_owned());
            lines.push("        };".to_owned());
            lines.push("        ordinal(left).cmp(&ordinal(right))".to_owned());
            lines.push("    }".to_owned());
        }
        lines.push("})".to_owned());
        lines
    }

    fn uses(&self) -> &'static [&'static str] {
        &["std::cmp::Ordering"]
    }
}

/// Combines the case index and each field's hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashGenerator;

impl InstanceGenerator for HashGenerator {
    fn class(&self) -> &'static str {
        "Hash"
    }

    fn build(&self, cx: &SynthContext<'_>, instances: &FieldInstances) -> Vec<String> {
        let self_ty = cx.self_ty();
        let mut lines = vec![format!("Hash::new(move |value: &{self_ty}| match value {{")];
        for ctor in &cx.adt.constructors {
            let pattern = cx.pattern(ctor, |i| format!("v{i}"));
            let mut parts = vec![format!("{}_u64", ctor.index)];
            parts.extend(
                ctor.arguments
                    .iter()
                    .zip(instances.of(ctor))
                    .enumerate()
                    .map(|(i, (arg, instance))| {
                        format!("{instance}.hash({})", cx.borrow_expr(ctor, arg, &format!("v{i}")))
                    }),
            );
            lines.push(format!(
                "    {pattern} => [{}].into_iter().fold(17_u64, |h, x| h.wrapping_mul(31).wrapping_add(x)),",
                parts.join(", ")
            ));
        }
        lines.push("})".to_owned());
        lines
    }
}

/// `(Case { a: l0, .. }, Case { a: r0, .. })`
fn pair_pattern(cx: &SynthContext<'_>, ctor: &DataConstructor) -> String {
    format!(
        "({}, {})",
        cx.pattern(ctor, |i| format!("l{i}")),
        cx.pattern(ctor, |i| format!("r{i}"))
    )
}

/// `(instance, left, right)` expressions per field of `ctor`.
fn field_pairs(
    cx: &SynthContext<'_>,
    ctor: &DataConstructor,
    instances: &FieldInstances,
) -> Vec<(String, String, String)> {
    ctor.arguments
        .iter()
        .zip(instances.of(ctor))
        .enumerate()
        .map(|(i, (arg, instance))| {
            (
                instance.clone(),
                cx.borrow_expr(ctor, arg, &format!("l{i}")),
                cx.borrow_expr(ctor, arg, &format!("r{i}")),
            )
        })
        .collect()
}
