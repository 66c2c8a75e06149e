//! Immutable substitutions.

use std::collections::BTreeMap;

use adt_ir::{Name, TypeExpr};

use crate::ensure_sufficient_stack;

/// An immutable map from type variable to type.
///
/// `bind` returns a new substitution; existing values are never changed, so
/// a substitution can be kept as a checkpoint while a caller tries
/// alternatives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Substitution {
    bindings: BTreeMap<Name, TypeExpr>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(variable, type)` pairs; later pairs win.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Name, TypeExpr)>) -> Self {
        Substitution {
            bindings: pairs.into_iter().collect(),
        }
    }

    #[inline]
    pub fn get(&self, var: Name) -> Option<&TypeExpr> {
        self.bindings.get(&var)
    }

    #[inline]
    pub fn contains(&self, var: Name) -> bool {
        self.bindings.contains_key(&var)
    }

    /// A new substitution with `var := ty` added.
    #[must_use]
    pub fn bind(&self, var: Name, ty: TypeExpr) -> Substitution {
        let mut bindings = self.bindings.clone();
        bindings.insert(var, ty);
        Substitution { bindings }
    }

    /// A new substitution without the given variables.
    #[must_use]
    pub fn without(&self, vars: &[Name]) -> Substitution {
        Substitution {
            bindings: self
                .bindings
                .iter()
                .filter(|(v, _)| !vars.contains(v))
                .map(|(v, t)| (*v, t.clone()))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, &TypeExpr)> {
        self.bindings.iter().map(|(v, t)| (*v, t))
    }

    /// Apply this substitution to `ty`.
    #[inline]
    pub fn apply(&self, ty: &TypeExpr) -> TypeExpr {
        resolve(ty, self)
    }
}

/// Apply `subst` to `ty`, following bindings transitively.
///
/// A variable whose binding leads back to itself is left in place.
pub fn resolve(ty: &TypeExpr, subst: &Substitution) -> TypeExpr {
    if subst.is_empty() {
        return ty.clone();
    }
    let mut visiting = Vec::new();
    resolve_inner(ty, subst, &mut visiting)
}

/// Apply `subst` to `ty` in a single simultaneous pass.
///
/// Bound targets are inserted as-is and never looked up again, so
/// `{A := B, B := A}` swaps the two variables. Used to instantiate a
/// declaration's parameters with the arguments it is applied to.
pub fn substitute(ty: &TypeExpr, subst: &Substitution) -> TypeExpr {
    ensure_sufficient_stack(|| match ty {
        TypeExpr::Var(var) => subst.get(*var).cloned().unwrap_or_else(|| ty.clone()),
        TypeExpr::Con { name, args } => TypeExpr::Con {
            name: *name,
            args: args.iter().map(|a| substitute(a, subst)).collect(),
        },
        TypeExpr::Fn { params, ret } => TypeExpr::Fn {
            params: params.iter().map(|p| substitute(p, subst)).collect(),
            ret: Box::new(substitute(ret, subst)),
        },
    })
}

fn resolve_inner(ty: &TypeExpr, subst: &Substitution, visiting: &mut Vec<Name>) -> TypeExpr {
    ensure_sufficient_stack(|| match ty {
        TypeExpr::Var(var) => match subst.get(*var) {
            Some(bound) if !visiting.contains(var) => {
                visiting.push(*var);
                let resolved = resolve_inner(bound, subst, visiting);
                visiting.pop();
                resolved
            }
            _ => ty.clone(),
        },
        TypeExpr::Con { name, args } => TypeExpr::Con {
            name: *name,
            args: args
                .iter()
                .map(|a| resolve_inner(a, subst, visiting))
                .collect(),
        },
        TypeExpr::Fn { params, ret } => TypeExpr::Fn {
            params: params
                .iter()
                .map(|p| resolve_inner(p, subst, visiting))
                .collect(),
            ret: Box::new(resolve_inner(ret, subst, visiting)),
        },
    })
}
