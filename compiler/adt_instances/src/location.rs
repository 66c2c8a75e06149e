//! Where a resolved instance lives.

use adt_ir::{Name, Span, StringInterner, TypeExpr};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InstanceLocation {
    /// A static field of a provider source.
    StaticField {
        source: Name,
        field: Name,
        span: Span,
    },
    /// A static method, applied to its type arguments and to the instances
    /// it depends on (one per method parameter, in order).
    StaticMethod {
        source: Name,
        method: Name,
        span: Span,
        type_args: Vec<(Name, TypeExpr)>,
        dependencies: Vec<InstanceLocation>,
    },
    /// The instance being generated, applied to one instance per type
    /// parameter of the ADT (in declaration order) for the instantiation
    /// `ty`.
    Generated {
        class: Name,
        ty: TypeExpr,
        dependencies: Vec<InstanceLocation>,
    },
    /// An instance for one of the ADT's type variables, supplied by the
    /// caller of the generated instance.
    Parameter { class: Name, var: Name },
}

impl InstanceLocation {
    /// Source span of the providing member, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            InstanceLocation::StaticField { span, .. }
            | InstanceLocation::StaticMethod { span, .. } => Some(*span),
            InstanceLocation::Generated { .. } | InstanceLocation::Parameter { .. } => None,
        }
    }

    /// Every `(class, var)` parameter this location needs, first occurrence
    /// first.
    pub fn parameters(&self) -> Vec<(Name, Name)> {
        let mut out = Vec::new();
        self.collect_parameters(&mut out);
        out
    }

    fn collect_parameters(&self, out: &mut Vec<(Name, Name)>) {
        match self {
            InstanceLocation::Parameter { class, var } => {
                if !out.contains(&(*class, *var)) {
                    out.push((*class, *var));
                }
            }
            InstanceLocation::StaticMethod { dependencies, .. }
            | InstanceLocation::Generated { dependencies, .. } => {
                for dep in dependencies {
                    dep.collect_parameters(out);
                }
            }
            InstanceLocation::StaticField { .. } => {}
        }
    }

    /// Whether the instance being generated appears anywhere inside.
    pub fn mentions_generated(&self) -> bool {
        match self {
            InstanceLocation::Generated { .. } => true,
            InstanceLocation::StaticMethod { dependencies, .. } => {
                dependencies.iter().any(InstanceLocation::mentions_generated)
            }
            InstanceLocation::StaticField { .. } | InstanceLocation::Parameter { .. } => false,
        }
    }

    /// Human-readable provenance, e.g. `Instances.option_eq(Instances.int_eq)`.
    pub fn describe(&self, interner: &StringInterner) -> String {
        match self {
            InstanceLocation::StaticField { source, field, .. } => {
                format!("{}.{}", interner.lookup(*source), interner.lookup(*field))
            }
            InstanceLocation::StaticMethod {
                source,
                method,
                dependencies,
                ..
            } => {
                let deps: Vec<String> = dependencies.iter().map(|d| d.describe(interner)).collect();
                format!(
                    "{}.{}({})",
                    interner.lookup(*source),
                    interner.lookup(*method),
                    deps.join(", ")
                )
            }
            InstanceLocation::Generated {
                class,
                ty,
                dependencies,
            } => {
                let generated =
                    format!("generated {}<{}>", interner.lookup(*class), ty.display(interner));
                if dependencies.is_empty() {
                    return generated;
                }
                let deps: Vec<String> = dependencies.iter().map(|d| d.describe(interner)).collect();
                format!("{generated}({})", deps.join(", "))
            }
            InstanceLocation::Parameter { class, var } => {
                format!("parameter {}<{}>", interner.lookup(*class), interner.lookup(*var))
            }
        }
    }
}
