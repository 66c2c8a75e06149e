//! Instance search.

use std::cmp::Reverse;

use adt_diagnostic::{DeriveMessage, DeriveResult, ErrorCode, MessageLocalization};
use adt_ir::{Name, Span, StaticMember, StringInterner, TypeExpr};
use adt_model::AlgebraicDataType;
use adt_types::{match_type, resolve, substitute, FreshVars, Substitution};

use crate::{InstanceLocation, ProviderOrder, ProviderRef};

/// Nested resolutions allowed below one requested instance.
pub const MAX_RESOLUTION_DEPTH: usize = 32;

/// A resolved instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundInstance {
    pub location: InstanceLocation,
    /// Whether any part came from a low-priority provider.
    pub low_priority: bool,
}

/// Resolves instances for the fields of one ADT.
pub struct InstanceResolver<'a> {
    adt: &'a AlgebraicDataType,
    interner: &'a StringInterner,
    providers: &'a ProviderOrder<'a>,
    low_priority: &'a ProviderOrder<'a>,
}

impl<'a> InstanceResolver<'a> {
    pub fn new(
        adt: &'a AlgebraicDataType,
        interner: &'a StringInterner,
        providers: &'a ProviderOrder<'a>,
        low_priority: &'a ProviderOrder<'a>,
    ) -> Self {
        InstanceResolver {
            adt,
            interner,
            providers,
            low_priority,
        }
    }

    /// Find the `class` instance for `target`; errors are localized at `at`.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(class = self.interner.lookup(class), target = %target.display(self.interner))
    )]
    pub fn find_instance(
        &self,
        class: Name,
        target: &TypeExpr,
        at: Span,
    ) -> DeriveResult<FoundInstance> {
        let mut search = Search {
            resolver: self,
            fresh: FreshVars::new(self.interner),
            class,
            at,
        };
        let goal = TypeExpr::con(class, vec![target.clone()]);
        let found = search.resolve(&goal, 0)?;
        tracing::debug!(
            location = %found.location.describe(self.interner),
            low_priority = found.low_priority,
            "instance resolved"
        );
        Ok(found)
    }
}

/// One ranked candidate.
struct Candidate {
    specificity: u32,
    priority: usize,
    order: usize,
    span: Span,
    label: String,
    found: FoundInstance,
}

/// State of one top-level `find_instance` call.
struct Search<'r, 'a> {
    resolver: &'r InstanceResolver<'a>,
    fresh: FreshVars<'a>,
    /// The class being derived (the only one `Generated` can satisfy).
    class: Name,
    at: Span,
}

impl Search<'_, '_> {
    fn lookup(&self, name: Name) -> &'static str {
        self.resolver.interner.lookup(name)
    }

    fn error(&self, code: ErrorCode, text: String) -> DeriveMessage {
        DeriveMessage::at(
            code,
            text,
            MessageLocalization::on_declaration(self.resolver.adt.name, self.at),
        )
    }

    fn resolve(&mut self, goal: &TypeExpr, depth: usize) -> DeriveResult<FoundInstance> {
        let Some((class, target)) = split_goal(goal) else {
            return Err(DeriveMessage::internal(format!(
                "instance goal `{}` is not a class applied to one type",
                goal.display(self.resolver.interner)
            )));
        };
        if depth > MAX_RESOLUTION_DEPTH {
            return Err(self.error(
                ErrorCode::E2004,
                format!(
                    "resolving `{}` for `{}` nested deeper than {MAX_RESOLUTION_DEPTH} levels",
                    self.lookup(class),
                    target.display(self.resolver.interner)
                ),
            ));
        }

        let adt = self.resolver.adt;
        if class == self.class && target.head() == Some(adt.name) {
            return self.generated(class, target, depth);
        }
        if let Some(var) = target.as_var().filter(|v| adt.type_params.contains(v)) {
            return Ok(FoundInstance {
                location: InstanceLocation::Parameter { class, var },
                low_priority: false,
            });
        }

        let tiers = [(self.resolver.providers, false), (self.resolver.low_priority, true)];
        for (providers, low) in tiers {
            if let Some(mut found) = self.search(goal, target, providers, depth)? {
                found.low_priority |= low;
                return Ok(found);
            }
        }
        Err(self.error(
            ErrorCode::E2001,
            format!(
                "no `{}` instance found for `{}`",
                self.lookup(class),
                target.display(self.resolver.interner)
            ),
        ))
    }

    /// The instance being generated, at the ADT itself or at another
    /// instantiation of it (`Term<bool>` inside `Term<T>`).
    ///
    /// Each type parameter needs the class at its argument: the caller's
    /// own parameter for the declared type, a resolved instance otherwise.
    fn generated(
        &mut self,
        class: Name,
        target: &TypeExpr,
        depth: usize,
    ) -> DeriveResult<FoundInstance> {
        let adt = self.resolver.adt;
        let Some(bindings) = match_type(&adt.self_type(), target) else {
            return Err(DeriveMessage::internal(format!(
                "`{}` does not instantiate `{}`",
                target.display(self.resolver.interner),
                self.lookup(adt.name)
            )));
        };
        let mut dependencies = Vec::with_capacity(adt.type_params.len());
        let mut low_priority = false;
        for &var in &adt.type_params {
            let arg = resolve(&TypeExpr::var(var), &bindings);
            if arg.as_var() == Some(var) {
                dependencies.push(InstanceLocation::Parameter { class, var });
                continue;
            }
            let found = self.resolve(&TypeExpr::con(class, vec![arg]), depth + 1)?;
            low_priority |= found.low_priority;
            dependencies.push(found.location);
        }
        Ok(FoundInstance {
            location: InstanceLocation::Generated {
                class,
                ty: target.clone(),
                dependencies,
            },
            low_priority,
        })
    }

    fn search(
        &mut self,
        goal: &TypeExpr,
        target: &TypeExpr,
        providers: &ProviderOrder<'_>,
        depth: usize,
    ) -> DeriveResult<Option<FoundInstance>> {
        let direct = self.direct_candidates(goal, providers);
        if let Some(found) = self.pick(goal, direct)? {
            return Ok(Some(found));
        }
        let structural = matches!(target, TypeExpr::Con { args, .. } if !args.is_empty())
            || matches!(target, TypeExpr::Fn { .. });
        if !structural {
            return Ok(None);
        }
        let combinators = self.combinator_candidates(goal, providers, depth)?;
        self.pick(goal, combinators)
    }

    fn direct_candidates(&mut self, goal: &TypeExpr, providers: &ProviderOrder<'_>) -> Vec<Candidate> {
        let mut out = Vec::new();
        for (priority, provider) in providers.iter().enumerate() {
            for (order, member) in provider.members.iter().enumerate() {
                let candidate = match member {
                    StaticMember::Field { name, span, ty } => {
                        let renaming = self.fresh.rename_apart(&ty.free_vars());
                        if match_type(&substitute(ty, &renaming), goal).is_none() {
                            continue;
                        }
                        Candidate {
                            specificity: ty.concrete_nodes(),
                            priority,
                            order,
                            span: *span,
                            label: self.label(provider, *name),
                            found: FoundInstance {
                                location: InstanceLocation::StaticField {
                                    source: provider.name,
                                    field: *name,
                                    span: *span,
                                },
                                low_priority: false,
                            },
                        }
                    }
                    StaticMember::Method { params, .. } if params.is_empty() => {
                        let Some((location, _)) = self.instantiate(provider, member, goal) else {
                            continue;
                        };
                        Candidate {
                            specificity: member.provided_type().concrete_nodes(),
                            priority,
                            order,
                            span: member.span(),
                            label: self.label(provider, member.name()),
                            found: FoundInstance {
                                location,
                                low_priority: false,
                            },
                        }
                    }
                    StaticMember::Method { .. } => continue,
                };
                tracing::trace!(label = %candidate.label, "direct candidate");
                out.push(candidate);
            }
        }
        out
    }

    fn combinator_candidates(
        &mut self,
        goal: &TypeExpr,
        providers: &ProviderOrder<'_>,
        depth: usize,
    ) -> DeriveResult<Vec<Candidate>> {
        let mut out = Vec::new();
        for (priority, provider) in providers.iter().enumerate() {
            for (order, member) in provider.members.iter().enumerate() {
                let StaticMember::Method { params, .. } = member else {
                    continue;
                };
                if params.is_empty() {
                    continue;
                }
                let Some((location, dependency_goals)) = self.instantiate(provider, member, goal)
                else {
                    continue;
                };
                let label = self.label(provider, member.name());
                let Some((location, low_priority)) =
                    self.resolve_dependencies(location, &dependency_goals, &label, depth)?
                else {
                    continue;
                };
                tracing::trace!(%label, "combinator candidate");
                out.push(Candidate {
                    specificity: member.provided_type().concrete_nodes(),
                    priority,
                    order,
                    span: member.span(),
                    label,
                    found: FoundInstance {
                        location,
                        low_priority,
                    },
                });
            }
        }
        Ok(out)
    }

    /// Match a method's return type against `goal`.
    ///
    /// Returns the location (dependencies still empty) and the instance
    /// goals of its parameters under the match.
    fn instantiate(
        &mut self,
        provider: &ProviderRef<'_>,
        member: &StaticMember,
        goal: &TypeExpr,
    ) -> Option<(InstanceLocation, Vec<TypeExpr>)> {
        let StaticMember::Method {
            name,
            span,
            type_params,
            params,
            ret,
        } = member
        else {
            return None;
        };
        let signature = TypeExpr::func(params.clone(), ret.clone());
        let mut vars: Vec<Name> = type_params.iter().map(|p| p.name).collect();
        for var in signature.free_vars() {
            if !vars.contains(&var) {
                vars.push(var);
            }
        }
        let renaming = self.fresh.rename_apart(&vars);
        let subst: Substitution = match_type(&substitute(ret, &renaming), goal)?;

        let type_args = type_params
            .iter()
            .map(|p| {
                let fresh = substitute(&TypeExpr::var(p.name), &renaming);
                (p.name, resolve(&fresh, &subst))
            })
            .collect();
        let dependency_goals = params
            .iter()
            .map(|p| resolve(&substitute(p, &renaming), &subst))
            .collect();
        Some((
            InstanceLocation::StaticMethod {
                source: provider.name,
                method: *name,
                span: *span,
                type_args,
                dependencies: Vec::new(),
            },
            dependency_goals,
        ))
    }

    /// Resolve every dependency of a combinator; `None` when one is missing.
    fn resolve_dependencies(
        &mut self,
        mut location: InstanceLocation,
        goals: &[TypeExpr],
        label: &str,
        depth: usize,
    ) -> DeriveResult<Option<(InstanceLocation, bool)>> {
        let mut resolved = Vec::with_capacity(goals.len());
        let mut low_priority = false;
        for goal in goals {
            if split_goal(goal).is_none() {
                tracing::debug!(%label, "combinator parameter is not an instance");
                return Ok(None);
            }
            match self.resolve(goal, depth + 1) {
                Ok(found) => {
                    low_priority |= found.low_priority;
                    resolved.push(found.location);
                }
                Err(err) if err.code == ErrorCode::E2001 => {
                    tracing::debug!(%label, reason = %err.text, "combinator rejected");
                    return Ok(None);
                }
                Err(err) => return Err(err),
            }
        }
        if let InstanceLocation::StaticMethod { dependencies, .. } = &mut location {
            *dependencies = resolved;
        }
        Ok(Some((location, low_priority)))
    }

    /// The best candidate, or an ambiguity error when the top rank is shared.
    fn pick(
        &self,
        goal: &TypeExpr,
        mut candidates: Vec<Candidate>,
    ) -> DeriveResult<Option<FoundInstance>> {
        candidates.sort_by_key(|c| (Reverse(c.specificity), c.priority, c.order));
        let Some(best) = candidates.first() else {
            return Ok(None);
        };
        let tied: Vec<&Candidate> = candidates
            .iter()
            .take_while(|c| c.specificity == best.specificity && c.priority == best.priority)
            .collect();
        if tied.len() > 1 {
            let labels: Vec<String> = tied.iter().map(|c| format!("`{}`", c.label)).collect();
            let decl = self.resolver.adt.name;
            return Err(self
                .error(
                    ErrorCode::E2002,
                    format!(
                        "ambiguous instances for `{}`: {}",
                        goal.display(self.resolver.interner),
                        labels.join(", ")
                    ),
                )
                .with_localizations(
                    tied.iter()
                        .map(|c| MessageLocalization::on_declaration(decl, c.span)),
                ));
        }
        Ok(Some(candidates.swap_remove(0).found))
    }

    fn label(&self, provider: &ProviderRef<'_>, member: Name) -> String {
        format!("{}.{}", self.lookup(provider.name), self.lookup(member))
    }
}

/// `Class<T>` -> `(Class, T)`.
fn split_goal(goal: &TypeExpr) -> Option<(Name, &TypeExpr)> {
    match goal {
        TypeExpr::Con { name, args } => match args.as_slice() {
            [target] => Some((*name, target)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
