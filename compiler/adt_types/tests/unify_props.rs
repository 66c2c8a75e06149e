//! Property-based tests for unification.
//!
//! 1. Symmetry: `unify(a, b)` succeeds iff `unify(b, a)` succeeds
//! 2. Soundness: a successful substitution makes both sides equal
//! 3. Most general unifiers from either direction agree up to renaming

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::collections::HashMap;

use adt_ir::{Name, StringInterner, TypeExpr};
use adt_types::{resolve, unify};
use proptest::prelude::*;

/// Interner-independent type shape generated by proptest.
#[derive(Clone, Debug)]
enum Shape {
    Var(usize),
    Atom(usize),
    List(Box<Shape>),
    Pair(Box<Shape>, Box<Shape>),
    Func(Vec<Shape>, Box<Shape>),
}

const VARS: [&str; 3] = ["A", "B", "C"];
const ATOMS: [&str; 2] = ["i32", "String"];

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        (0..VARS.len()).prop_map(Shape::Var),
        (0..ATOMS.len()).prop_map(Shape::Atom),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|s| Shape::List(Box::new(s))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Shape::Pair(Box::new(a), Box::new(b))),
            (prop::collection::vec(inner.clone(), 1..3), inner)
                .prop_map(|(params, ret)| Shape::Func(params, Box::new(ret))),
        ]
    })
}

fn build(shape: &Shape, interner: &StringInterner) -> TypeExpr {
    match shape {
        Shape::Var(i) => TypeExpr::var(interner.intern(VARS[*i])),
        Shape::Atom(i) => TypeExpr::atom(interner.intern(ATOMS[*i])),
        Shape::List(inner) => TypeExpr::con(interner.intern("List"), vec![build(inner, interner)]),
        Shape::Pair(a, b) => TypeExpr::con(
            interner.intern("Tuple2"),
            vec![build(a, interner), build(b, interner)],
        ),
        Shape::Func(params, ret) => TypeExpr::func(
            params.iter().map(|p| build(p, interner)).collect(),
            build(ret, interner),
        ),
    }
}

/// Alpha-equivalence: equal up to a consistent bijective variable renaming.
fn alpha_eq(
    x: &TypeExpr,
    y: &TypeExpr,
    forward: &mut HashMap<Name, Name>,
    backward: &mut HashMap<Name, Name>,
) -> bool {
    match (x, y) {
        (TypeExpr::Var(a), TypeExpr::Var(b)) => {
            let f = *forward.entry(*a).or_insert(*b);
            let g = *backward.entry(*b).or_insert(*a);
            f == *b && g == *a
        }
        (TypeExpr::Con { name: n1, args: a1 }, TypeExpr::Con { name: n2, args: a2 }) => {
            n1 == n2
                && a1.len() == a2.len()
                && a1
                    .iter()
                    .zip(a2)
                    .all(|(p, q)| alpha_eq(p, q, forward, backward))
        }
        (TypeExpr::Fn { params: p1, ret: r1 }, TypeExpr::Fn { params: p2, ret: r2 }) => {
            p1.len() == p2.len()
                && p1
                    .iter()
                    .zip(p2)
                    .all(|(p, q)| alpha_eq(p, q, forward, backward))
                && alpha_eq(r1, r2, forward, backward)
        }
        _ => false,
    }
}

proptest! {
    #[test]
    fn unify_success_is_symmetric(a in shape_strategy(), b in shape_strategy()) {
        let interner = StringInterner::new();
        let (a, b) = (build(&a, &interner), build(&b, &interner));
        prop_assert_eq!(unify(&a, &b).is_some(), unify(&b, &a).is_some());
    }

    #[test]
    fn unifier_equalizes_both_sides(a in shape_strategy(), b in shape_strategy()) {
        let interner = StringInterner::new();
        let (a, b) = (build(&a, &interner), build(&b, &interner));
        if let Some(subst) = unify(&a, &b) {
            prop_assert_eq!(resolve(&a, &subst), resolve(&b, &subst));
        }
    }

    #[test]
    fn both_directions_agree_up_to_renaming(a in shape_strategy(), b in shape_strategy()) {
        let interner = StringInterner::new();
        let (a, b) = (build(&a, &interner), build(&b, &interner));
        if let (Some(s1), Some(s2)) = (unify(&a, &b), unify(&b, &a)) {
            let left = resolve(&a, &s1);
            let right = resolve(&a, &s2);
            prop_assert!(alpha_eq(&left, &right, &mut HashMap::new(), &mut HashMap::new()));
        }
    }

    #[test]
    fn unify_with_self_binds_nothing(a in shape_strategy()) {
        let interner = StringInterner::new();
        let a = build(&a, &interner);
        prop_assert_eq!(unify(&a, &a).map(|s| s.len()), Some(0));
    }
}
