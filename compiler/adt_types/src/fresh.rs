//! Fresh type variables.

use adt_ir::{Name, StringInterner, TypeExpr};

use crate::Substitution;

/// Generates variables that cannot clash with declared ones.
///
/// Fresh names have the form `A#n`; `#` never appears in a declared
/// identifier.
pub struct FreshVars<'i> {
    interner: &'i StringInterner,
    counter: u32,
}

impl<'i> FreshVars<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        FreshVars {
            interner,
            counter: 0,
        }
    }

    /// A fresh variable derived from `base`.
    pub fn fresh(&mut self, base: Name) -> Name {
        self.counter += 1;
        let base = self.interner.lookup(base);
        let base = base.split('#').next().unwrap_or(base);
        self.interner.intern(&format!("{base}#{}", self.counter))
    }

    /// A renaming substitution mapping each of `vars` to a fresh variable.
    pub fn rename_apart(&mut self, vars: &[Name]) -> Substitution {
        Substitution::from_pairs(
            vars.iter()
                .map(|&v| (v, TypeExpr::var(self.fresh(v))))
                .collect::<Vec<_>>(),
        )
    }

    /// Whether `name` was produced by a `FreshVars`.
    pub fn is_fresh(interner: &StringInterner, name: Name) -> bool {
        interner.lookup(name).contains('#')
    }
}
