//! Rust spellings of instance locations.

use adt_instances::InstanceLocation;
use adt_ir::{ident::snake_case, Name, TypeExpr};

use crate::SynthContext;

/// Names used by one generated instance.
pub(super) struct InstanceNaming<'c, 'a> {
    cx: &'c SynthContext<'a>,
    class: Name,
    class_snake: String,
    /// `(param name, (class, var))` in first-use order.
    params: Vec<(String, (Name, Name))>,
    /// Locations bound to a local before the instance is built.
    hoisted: Vec<(InstanceLocation, String)>,
}

impl<'c, 'a> InstanceNaming<'c, 'a> {
    pub(super) fn new(
        cx: &'c SynthContext<'a>,
        class: Name,
        locations: &[Vec<InstanceLocation>],
    ) -> Self {
        let class_snake = snake_case(cx.lookup(class));
        let mut params: Vec<(String, (Name, Name))> = Vec::new();
        let mut hoisted: Vec<(InstanceLocation, String)> = Vec::new();
        for location in locations.iter().flatten() {
            for (param_class, var) in location.parameters() {
                if !params.iter().any(|(_, p)| *p == (param_class, var)) {
                    let name = format!(
                        "{}_{}",
                        snake_case(cx.lookup(param_class)),
                        snake_case(cx.lookup(var))
                    );
                    params.push((name, (param_class, var)));
                }
            }
            let hoist = matches!(location, InstanceLocation::StaticMethod { .. })
                && !location.mentions_generated();
            if hoist && !hoisted.iter().any(|(l, _)| l == location) {
                let name = format!("{class_snake}{}", hoisted.len());
                hoisted.push((location.clone(), name));
            }
        }
        InstanceNaming {
            cx,
            class,
            class_snake,
            params,
            hoisted,
        }
    }

    /// `EXPR_EQ`
    pub(super) fn static_name(&self) -> String {
        format!("{}_{}", self.cx.snake_name(), self.class_snake).to_uppercase()
    }

    /// `tree_eq`
    pub(super) fn fn_name(&self) -> String {
        format!("{}_{}", self.cx.snake_name(), self.class_snake)
    }

    pub(super) fn params(&self) -> impl Iterator<Item = (String, (Name, Name))> + '_ {
        self.params.iter().cloned()
    }

    /// `let eq0 = Instances::option_eq(Instances::int_eq.clone());` per
    /// hoisted location.
    pub(super) fn hoisted_lets(&self) -> Vec<String> {
        self.hoisted
            .iter()
            .map(|(location, name)| format!("let {name} = {};", self.value(location)))
            .collect()
    }

    /// The location as a method receiver inside the instance body.
    pub(super) fn receiver(&self, location: &InstanceLocation) -> String {
        if let Some((_, name)) = self.hoisted.iter().find(|(l, _)| l == location) {
            return name.clone();
        }
        match location {
            InstanceLocation::StaticField { source, field, .. } => self.member(*source, *field),
            InstanceLocation::Parameter { class, var } => self.param_name(*class, *var),
            InstanceLocation::Generated { .. } if !self.cx.adt.is_parametric() => {
                self.static_name()
            }
            InstanceLocation::StaticMethod { .. } | InstanceLocation::Generated { .. } => {
                self.value(location)
            }
        }
    }

    /// The location as an owned value (argument to a combinator).
    fn value(&self, location: &InstanceLocation) -> String {
        match location {
            InstanceLocation::StaticField { source, field, .. } => {
                format!("{}.clone()", self.member(*source, *field))
            }
            InstanceLocation::StaticMethod {
                source,
                method,
                dependencies,
                ..
            } => {
                let args: Vec<String> = dependencies.iter().map(|d| self.value(d)).collect();
                format!("{}({})", self.member(*source, *method), args.join(", "))
            }
            InstanceLocation::Parameter { class, var } => {
                format!("{}.clone()", self.param_name(*class, *var))
            }
            InstanceLocation::Generated { dependencies, .. } => {
                if !self.cx.adt.is_parametric() {
                    return format!("{}.clone()", self.static_name());
                }
                let args: Vec<String> = self
                    .params
                    .iter()
                    .map(|(name, (class, var))| {
                        self.generated_arg(dependencies, *class, *var)
                            .unwrap_or_else(|| format!("{name}.clone()"))
                    })
                    .collect();
                format!("{}({})", self.fn_name(), args.join(", "))
            }
        }
    }

    /// The argument a recursive call passes for its `(class, var)`
    /// parameter: the dependency resolved for `var` when it is of the
    /// derived class.
    fn generated_arg(
        &self,
        dependencies: &[InstanceLocation],
        class: Name,
        var: Name,
    ) -> Option<String> {
        if class != self.class {
            return None;
        }
        let index = self.cx.adt.type_params.iter().position(|&p| p == var)?;
        dependencies.get(index).map(|dep| self.value(dep))
    }

    /// A parameter of another class that a recursive call at a different
    /// instantiation would have to supply, as `(class, argument type)`.
    ///
    /// Only the derived class is resolved per instantiation, so such a
    /// call cannot be written.
    pub(super) fn unpassable(&self, locations: &[Vec<InstanceLocation>]) -> Option<(Name, TypeExpr)> {
        let self_type = self.cx.adt.self_type();
        let mut instantiations = Vec::new();
        for location in locations.iter().flatten() {
            collect_instantiations(location, &mut instantiations);
        }
        for ty in instantiations.into_iter().filter(|ty| **ty != self_type) {
            let TypeExpr::Con { args, .. } = ty else {
                continue;
            };
            for (_, (class, var)) in &self.params {
                if *class == self.class {
                    continue;
                }
                let Some(index) = self.cx.adt.type_params.iter().position(|p| p == var) else {
                    continue;
                };
                match args.get(index) {
                    Some(arg) if arg.as_var() != Some(*var) => return Some((*class, arg.clone())),
                    _ => {}
                }
            }
        }
        None
    }

    fn member(&self, source: Name, member: Name) -> String {
        format!("{}::{}", self.cx.lookup(source), self.cx.lookup(member))
    }

    fn param_name(&self, class: Name, var: Name) -> String {
        self.params
            .iter()
            .find(|(_, p)| *p == (class, var))
            .map_or_else(
                || {
                    format!(
                        "{}_{}",
                        snake_case(self.cx.lookup(class)),
                        snake_case(self.cx.lookup(var))
                    )
                },
                |(name, _)| name.clone(),
            )
    }
}

/// Every instantiation a `Generated` location inside `location` is used at.
fn collect_instantiations<'l>(location: &'l InstanceLocation, out: &mut Vec<&'l TypeExpr>) {
    match location {
        InstanceLocation::Generated {
            ty, dependencies, ..
        } => {
            out.push(ty);
            for dep in dependencies {
                collect_instantiations(dep, out);
            }
        }
        InstanceLocation::StaticMethod { dependencies, .. } => {
            for dep in dependencies {
                collect_instantiations(dep, out);
            }
        }
        InstanceLocation::StaticField { .. } | InstanceLocation::Parameter { .. } => {}
    }
}
