use super::*;
use adt_ir::StringInterner;
use pretty_assertions::assert_eq;

struct Names {
    a: Name,
    b: Name,
    list: Name,
    option: Name,
    int: TypeExpr,
    string: TypeExpr,
}

fn names(interner: &StringInterner) -> Names {
    Names {
        a: interner.intern("A"),
        b: interner.intern("B"),
        list: interner.intern("List"),
        option: interner.intern("Option"),
        int: TypeExpr::atom(interner.intern("i32")),
        string: TypeExpr::atom(interner.intern("String")),
    }
}

#[test]
fn unify_identical_types() {
    let interner = StringInterner::new();
    let n = names(&interner);
    let subst = unify(&n.int, &n.int);
    assert_eq!(subst, Some(Substitution::new()));
}

#[test]
fn unify_different_constructors_fails() {
    let interner = StringInterner::new();
    let n = names(&interner);
    assert_eq!(unify(&n.int, &n.string), None);
    let err = unify_with(&n.int, &n.string, &Substitution::new());
    assert!(matches!(err, Err(UnifyError::Mismatch { .. })));
}

#[test]
fn unify_variable_with_constructor() {
    let interner = StringInterner::new();
    let n = names(&interner);
    let list_a = TypeExpr::con(n.list, vec![TypeExpr::var(n.a)]);
    let list_int = TypeExpr::con(n.list, vec![n.int.clone()]);
    let subst = unify(&list_a, &list_int).unwrap_or_default();
    assert_eq!(subst.get(n.a), Some(&n.int));
    assert_eq!(resolve(&list_a, &subst), list_int);
}

#[test]
fn unify_chains_variables() {
    let interner = StringInterner::new();
    let n = names(&interner);
    // fn(A, B) -> B  ~  fn(B, i32) -> A
    let left = TypeExpr::func(vec![TypeExpr::var(n.a), TypeExpr::var(n.b)], TypeExpr::var(n.b));
    let right = TypeExpr::func(vec![TypeExpr::var(n.b), n.int.clone()], TypeExpr::var(n.a));
    let subst = unify(&left, &right);
    assert!(subst.is_some());
    let subst = subst.unwrap_or_default();
    assert_eq!(resolve(&TypeExpr::var(n.a), &subst), n.int);
    assert_eq!(resolve(&TypeExpr::var(n.b), &subst), n.int);
}

#[test]
fn occurs_check_detects_infinite_type() {
    let interner = StringInterner::new();
    let n = names(&interner);
    let list_a = TypeExpr::con(n.list, vec![TypeExpr::var(n.a)]);
    let err = unify_with(&TypeExpr::var(n.a), &list_a, &Substitution::new());
    assert!(matches!(err, Err(UnifyError::InfiniteType { .. })));
}

#[test]
fn arity_mismatch_is_reported() {
    let interner = StringInterner::new();
    let n = names(&interner);
    let one = TypeExpr::func(vec![n.int.clone()], n.int.clone());
    let two = TypeExpr::func(vec![n.int.clone(), n.int.clone()], n.int.clone());
    let err = unify_with(&one, &two, &Substitution::new());
    assert!(matches!(
        err,
        Err(UnifyError::ArityMismatch {
            expected: 1,
            found: 2,
            kind: ArityKind::Function
        })
    ));
}

#[test]
fn unify_extends_existing_substitution() {
    let interner = StringInterner::new();
    let n = names(&interner);
    let start = Substitution::new().bind(n.a, n.int.clone());
    let err = unify_with(&TypeExpr::var(n.a), &n.string, &start);
    assert!(err.is_err());
    assert!(unify_with(&TypeExpr::var(n.a), &n.int, &start).is_ok());
}

#[test]
fn match_type_keeps_target_variables_rigid() {
    let interner = StringInterner::new();
    let n = names(&interner);
    let option_b = TypeExpr::con(n.option, vec![TypeExpr::var(n.b)]);
    let option_a = TypeExpr::con(n.option, vec![TypeExpr::var(n.a)]);
    let option_int = TypeExpr::con(n.option, vec![n.int.clone()]);

    // Generic pattern matches a target holding a rigid variable.
    let subst = match_type(&option_b, &option_a);
    assert_eq!(
        subst.and_then(|s| s.get(n.b).cloned()),
        Some(TypeExpr::var(n.a))
    );

    // A concrete pattern may not instantiate the target's variable.
    assert_eq!(match_type(&option_int, &option_a), None);
    // But plain unification would.
    assert!(unify(&option_int, &option_a).is_some());
}

#[test]
fn unify_is_symmetric_with_inverse_bindings() {
    let interner = StringInterner::new();
    let n = names(&interner);
    let forward = unify(&TypeExpr::var(n.a), &TypeExpr::var(n.b)).unwrap_or_default();
    let backward = unify(&TypeExpr::var(n.b), &TypeExpr::var(n.a)).unwrap_or_default();
    assert_eq!(forward.get(n.a), Some(&TypeExpr::var(n.b)));
    assert_eq!(backward.get(n.b), Some(&TypeExpr::var(n.a)));
}
