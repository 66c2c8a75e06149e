//! Syntactic unification over type expressions.
//!
//! # Design
//!
//! - Substitutions are threaded by value; every step returns a new one
//! - Bindings are stored unresolved and chased by [`resolve`] on lookup
//! - Occurs check on every variable binding
//! - Variables listed as rigid never bind (one-way matching)

mod error;

pub use error::{ArityKind, UnifyContext, UnifyError};

use adt_ir::{Name, TypeExpr};

use crate::{ensure_sufficient_stack, resolve, Substitution};

/// Unify two types with every variable flexible.
///
/// Returns `None` when the shapes cannot be made equal; callers treat that
/// as "not applicable".
pub fn unify(a: &TypeExpr, b: &TypeExpr) -> Option<Substitution> {
    match unify_with(a, b, &Substitution::new()) {
        Ok(subst) => Some(subst),
        Err(err) => {
            tracing::trace!(%err, "unification failed");
            None
        }
    }
}

/// Unify two types, extending `subst`, with detailed failure information.
pub fn unify_with(
    a: &TypeExpr,
    b: &TypeExpr,
    subst: &Substitution,
) -> Result<Substitution, UnifyError> {
    Unifier::new().unify(a, b, subst.clone(), UnifyContext::TopLevel)
}

/// One-way matching: bind variables of `pattern` only.
///
/// Variables of `target` are rigid. `pattern` must already be renamed apart
/// from `target` (see [`crate::FreshVars`]).
pub fn match_type(pattern: &TypeExpr, target: &TypeExpr) -> Option<Substitution> {
    let rigid = target.free_vars();
    Unifier::with_rigid(&rigid)
        .unify(pattern, target, Substitution::new(), UnifyContext::TopLevel)
        .ok()
}

/// Unification engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unifier<'a> {
    rigid: &'a [Name],
}

impl<'a> Unifier<'a> {
    /// Every variable may bind.
    pub fn new() -> Self {
        Unifier { rigid: &[] }
    }

    /// The given variables may not bind.
    pub fn with_rigid(rigid: &'a [Name]) -> Self {
        Unifier { rigid }
    }

    #[inline]
    fn is_rigid(&self, var: Name) -> bool {
        self.rigid.contains(&var)
    }

    /// Unify `a` with `b` under `subst`, returning the extended substitution.
    pub fn unify(
        &self,
        a: &TypeExpr,
        b: &TypeExpr,
        subst: Substitution,
        context: UnifyContext,
    ) -> Result<Substitution, UnifyError> {
        ensure_sufficient_stack(|| self.unify_inner(a, b, subst, context))
    }

    fn unify_inner(
        &self,
        a: &TypeExpr,
        b: &TypeExpr,
        subst: Substitution,
        context: UnifyContext,
    ) -> Result<Substitution, UnifyError> {
        let a = shallow(a, &subst);
        let b = shallow(b, &subst);

        match (&a, &b) {
            (TypeExpr::Var(x), TypeExpr::Var(y)) if x == y => Ok(subst),
            (TypeExpr::Var(x), _) if !self.is_rigid(*x) => bind_var(*x, &b, subst),
            (_, TypeExpr::Var(y)) if !self.is_rigid(*y) => bind_var(*y, &a, subst),
            (TypeExpr::Var(x), _) => Err(UnifyError::RigidMismatch {
                var: *x,
                found: resolve(&b, &subst),
            }),
            (_, TypeExpr::Var(y)) => Err(UnifyError::RigidMismatch {
                var: *y,
                found: resolve(&a, &subst),
            }),
            (
                TypeExpr::Con {
                    name: name_a,
                    args: args_a,
                },
                TypeExpr::Con {
                    name: name_b,
                    args: args_b,
                },
            ) => {
                if name_a != name_b {
                    return Err(mismatch(&a, &b, &subst, context));
                }
                if args_a.len() != args_b.len() {
                    return Err(UnifyError::ArityMismatch {
                        expected: args_a.len(),
                        found: args_b.len(),
                        kind: ArityKind::TypeArgs,
                    });
                }
                args_a
                    .iter()
                    .zip(args_b)
                    .enumerate()
                    .try_fold(subst, |s, (index, (x, y))| {
                        self.unify(x, y, s, UnifyContext::TypeArg { index })
                    })
            }
            (
                TypeExpr::Fn {
                    params: params_a,
                    ret: ret_a,
                },
                TypeExpr::Fn {
                    params: params_b,
                    ret: ret_b,
                },
            ) => {
                if params_a.len() != params_b.len() {
                    return Err(UnifyError::ArityMismatch {
                        expected: params_a.len(),
                        found: params_b.len(),
                        kind: ArityKind::Function,
                    });
                }
                let subst = params_a
                    .iter()
                    .zip(params_b)
                    .enumerate()
                    .try_fold(subst, |s, (index, (x, y))| {
                        self.unify(x, y, s, UnifyContext::FunctionParam { index })
                    })?;
                self.unify(ret_a, ret_b, subst, UnifyContext::FunctionReturn)
            }
            _ => Err(mismatch(&a, &b, &subst, context)),
        }
    }
}

/// Follow variable bindings at the root only.
fn shallow(ty: &TypeExpr, subst: &Substitution) -> TypeExpr {
    let mut current = ty;
    let mut steps = 0usize;
    while let TypeExpr::Var(var) = current {
        match subst.get(*var) {
            // Bound chains are acyclic (occurs check) but cap the walk anyway.
            Some(next) if steps <= subst.len() => {
                current = next;
                steps += 1;
            }
            _ => break,
        }
    }
    current.clone()
}

fn bind_var(var: Name, ty: &TypeExpr, subst: Substitution) -> Result<Substitution, UnifyError> {
    let resolved = resolve(ty, &subst);
    if resolved.as_var() == Some(var) {
        return Ok(subst);
    }
    if resolved.mentions(var) {
        return Err(UnifyError::InfiniteType {
            var,
            containing_type: resolved,
        });
    }
    Ok(subst.bind(var, resolved))
}

fn mismatch(a: &TypeExpr, b: &TypeExpr, subst: &Substitution, context: UnifyContext) -> UnifyError {
    UnifyError::Mismatch {
        expected: resolve(a, subst),
        found: resolve(b, subst),
        context,
    }
}

#[cfg(test)]
mod tests;
