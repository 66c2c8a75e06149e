//! Ordered provider sources for one derivation.

use adt_ir::{DataDecl, Name, Snapshot, Span, StaticMember, TypeExpr};

/// A borrowed view of one group of static members.
#[derive(Clone, Copy, Debug)]
pub struct ProviderRef<'s> {
    pub name: Name,
    pub span: Span,
    pub members: &'s [StaticMember],
}

/// Provider sources in search priority order (first = highest).
#[derive(Clone, Debug, Default)]
pub struct ProviderOrder<'s> {
    providers: Vec<ProviderRef<'s>>,
}

impl<'s> ProviderOrder<'s> {
    pub fn new(providers: Vec<ProviderRef<'s>>) -> Self {
        ProviderOrder { providers }
    }

    /// The providers consulted when deriving `class` for `decl`.
    ///
    /// Order: the declaration's own statics, the source named after the
    /// class, sources named after each type constructor of `targets` (first
    /// occurrence), then every other source in snapshot order. Sources the
    /// snapshot marks low-priority are left out; see [`Self::low_priority`].
    pub fn for_derivation(
        snapshot: &'s Snapshot,
        decl: &'s DataDecl,
        class: Name,
        targets: &[TypeExpr],
    ) -> Self {
        let mut providers = vec![ProviderRef {
            name: decl.name,
            span: decl.span,
            members: &decl.statics,
        }];
        let mut taken = vec![false; snapshot.providers.len()];
        let mut take = |name: Name, providers: &mut Vec<ProviderRef<'s>>| {
            let found = snapshot
                .providers
                .iter()
                .enumerate()
                .find(|(i, p)| p.name == name && !taken[*i]);
            if let Some((i, source)) = found {
                if !snapshot.is_low_priority(source.name) {
                    taken[i] = true;
                    providers.push(ProviderRef::from(source));
                }
            }
        };

        take(class, &mut providers);
        let mut constructors: Vec<Name> = Vec::new();
        for target in targets {
            for name in target.constructors() {
                if !constructors.contains(&name) {
                    constructors.push(name);
                }
            }
        }
        for name in constructors {
            take(name, &mut providers);
        }
        for source in &snapshot.providers {
            take(source.name, &mut providers);
        }
        ProviderOrder { providers }
    }

    /// The snapshot's low-priority sources, in the order it lists them.
    pub fn low_priority(snapshot: &'s Snapshot) -> Self {
        ProviderOrder {
            providers: snapshot
                .low_priority
                .iter()
                .filter_map(|&name| snapshot.provider(name))
                .map(ProviderRef::from)
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderRef<'s>> {
        self.providers.iter()
    }

    pub fn names(&self) -> Vec<Name> {
        self.providers.iter().map(|p| p.name).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<'s> From<&'s adt_ir::ProviderSource> for ProviderRef<'s> {
    fn from(source: &'s adt_ir::ProviderSource) -> Self {
        ProviderRef {
            name: source.name,
            span: source.span,
            members: &source.members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adt_ir::{DataAnnotation, ProviderSource, StringInterner};
    use pretty_assertions::assert_eq;

    fn source(name: Name) -> ProviderSource {
        ProviderSource {
            name,
            span: Span::DUMMY,
            members: Vec::new(),
        }
    }

    #[test]
    fn derivation_order_prefers_class_then_constructors() {
        let interner = StringInterner::new();
        let n = |s: &str| interner.intern(s);
        let snapshot = Snapshot {
            providers: vec![
                source(n("Misc")),
                source(n("Option")),
                source(n("Slow")),
                source(n("Eq")),
                source(n("i32")),
            ],
            low_priority: vec![n("Slow")],
            ..Snapshot::default()
        };
        let decl = DataDecl {
            name: n("Shape"),
            span: Span::DUMMY,
            type_params: Vec::new(),
            methods: Vec::new(),
            annotation: DataAnnotation::default(),
            statics: Vec::new(),
        };
        let targets = [TypeExpr::con(n("Option"), vec![TypeExpr::atom(n("i32"))])];
        let order = ProviderOrder::for_derivation(&snapshot, &decl, n("Eq"), &targets);
        assert_eq!(
            order.names(),
            vec![n("Shape"), n("Eq"), n("Option"), n("i32"), n("Misc")]
        );
        assert_eq!(ProviderOrder::low_priority(&snapshot).names(), vec![n("Slow")]);
    }
}
