//! Field naming and the cross-constructor field index.

use adt_ir::{ident::snake_case, Name, StringInterner, TypeExpr};

use crate::AlgebraicDataType;

/// Where one field name occurs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOccurrence {
    /// Constructor index.
    pub constructor: usize,
    /// Position among that constructor's arguments.
    pub position: usize,
    pub ty: TypeExpr,
}

/// Every occurrence of one field name across the constructors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: Name,
    pub occurrences: Vec<FieldOccurrence>,
}

impl FieldEntry {
    /// The type at the first occurrence.
    pub fn ty(&self) -> Option<&TypeExpr> {
        self.occurrences.first().map(|o| &o.ty)
    }

    pub fn occurrence(&self, constructor: usize) -> Option<&FieldOccurrence> {
        self.occurrences.iter().find(|o| o.constructor == constructor)
    }

    /// Whether constructors disagree on the field's type.
    pub fn has_conflict(&self) -> bool {
        match self.occurrences.split_first() {
            Some((first, rest)) => rest.iter().any(|o| o.ty != first.ty),
            None => false,
        }
    }
}

/// Field names of an ADT in first-occurrence order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIndex {
    entries: Vec<FieldEntry>,
    constructor_count: usize,
}

impl FieldIndex {
    pub fn build(adt: &AlgebraicDataType) -> Self {
        let mut entries: Vec<FieldEntry> = Vec::new();
        for ctor in &adt.constructors {
            for (position, arg) in ctor.arguments.iter().enumerate() {
                let occurrence = FieldOccurrence {
                    constructor: ctor.index,
                    position,
                    ty: arg.ty.clone(),
                };
                match entries.iter_mut().find(|e| e.name == arg.name) {
                    Some(entry) => entry.occurrences.push(occurrence),
                    None => entries.push(FieldEntry {
                        name: arg.name,
                        occurrences: vec![occurrence],
                    }),
                }
            }
        }
        FieldIndex {
            entries,
            constructor_count: adt.constructors.len(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter()
    }

    pub fn get(&self, name: Name) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Whether the field is present in every constructor.
    pub fn is_total(&self, entry: &FieldEntry) -> bool {
        entry.occurrences.len() == self.constructor_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Names for unannotated case fields, derived from their types.
///
/// `fn(i32, Expr, Expr)` gives `value, expr1, expr2`: the snake-cased head
/// name (`value` for primitives), numbered when several fields share it.
/// Numbers already taken by another field are skipped.
pub fn derive_field_names(types: &[TypeExpr], interner: &StringInterner) -> Vec<Name> {
    let bases: Vec<String> = types.iter().map(|t| field_base(t, interner)).collect();
    let repeated = |base: &str| bases.iter().filter(|b| *b == base).count() > 1;
    let mut taken: Vec<String> = bases.iter().filter(|b| !repeated(b)).cloned().collect();
    bases
        .iter()
        .map(|base| {
            if !repeated(base) {
                return interner.intern(base);
            }
            let name = (1..)
                .map(|ordinal| format!("{base}{ordinal}"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default();
            let interned = interner.intern(&name);
            taken.push(name);
            interned
        })
        .collect()
}

/// Heads whose name says nothing about the field's role.
const PRIMITIVES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
    "f32", "f64", "bool", "char", "str", "String",
];

fn field_base(ty: &TypeExpr, interner: &StringInterner) -> String {
    match ty {
        TypeExpr::Con { name, args } if args.is_empty() => {
            let head = interner.lookup(*name);
            if PRIMITIVES.contains(&head) {
                "value".to_owned()
            } else {
                snake_case(head)
            }
        }
        TypeExpr::Var(name) | TypeExpr::Con { name, .. } => snake_case(interner.lookup(*name)),
        TypeExpr::Fn { .. } => "f".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derived_names_number_repeated_bases() {
        let interner = StringInterner::new();
        let expr = TypeExpr::atom(interner.intern("Expr"));
        let int = TypeExpr::atom(interner.intern("i32"));
        let names = derive_field_names(&[int, expr.clone(), expr], &interner);
        let names: Vec<&str> = names.iter().map(|&n| interner.lookup(n)).collect();
        assert_eq!(names, vec!["value", "expr1", "expr2"]);
    }

    #[test]
    fn numbered_names_skip_taken_ones() {
        let interner = StringInterner::new();
        let expr = TypeExpr::atom(interner.intern("Expr"));
        let expr1 = TypeExpr::atom(interner.intern("Expr1"));
        let names = derive_field_names(&[expr.clone(), expr, expr1], &interner);
        let names: Vec<&str> = names.iter().map(|&n| interner.lookup(n)).collect();
        assert_eq!(names, vec!["expr2", "expr3", "expr1"]);
    }

    #[test]
    fn primitives_are_values() {
        let interner = StringInterner::new();
        let int = TypeExpr::atom(interner.intern("i32"));
        let flag = TypeExpr::atom(interner.intern("bool"));
        let text = TypeExpr::atom(interner.intern("String"));
        let names = derive_field_names(&[int, flag], &interner);
        let names: Vec<&str> = names.iter().map(|&n| interner.lookup(n)).collect();
        assert_eq!(names, vec!["value1", "value2"]);

        let names = derive_field_names(&[text], &interner);
        assert_eq!(interner.lookup(names[0]), "value");
    }

    #[test]
    fn derived_names_snake_case_heads() {
        let interner = StringInterner::new();
        let a = TypeExpr::var(interner.intern("A"));
        let string_list = TypeExpr::con(
            interner.intern("StringList"),
            vec![],
        );
        let callback = TypeExpr::func(vec![], a.clone());
        let names = derive_field_names(&[a, string_list, callback], &interner);
        let names: Vec<&str> = names.iter().map(|&n| interner.lookup(n)).collect();
        assert_eq!(names, vec!["a", "string_list", "f"]);
    }
}
