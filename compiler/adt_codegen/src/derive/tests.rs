use super::*;
use crate::test_support::Fixture;
use crate::{FnDecl, Param, RustTy};
use adt_diagnostic::ErrorCode;
use adt_ir::TypeExpr;
use pretty_assertions::assert_eq;

fn signatures(methods: &[FnDecl]) -> Vec<String> {
    methods.iter().map(FnDecl::signature).collect()
}

fn method<'a>(spec: &'a DerivedCodeSpec, name: &str) -> &'a FnDecl {
    spec.methods.iter().find(|m| m.name == name).unwrap()
}

fn body(decl: &FnDecl) -> Vec<&str> {
    decl.body.as_ref().unwrap().iter().map(String::as_str).collect()
}

// Enum

#[test]
fn enum_comes_first_with_boxed_recursion() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[]).unwrap();

    let [GenType::Enum(expr)] = spec.types.as_slice() else {
        panic!("expected only the enum, got {:?}", spec.types);
    };
    assert_eq!(expr.name, "Expr");
    assert_eq!(expr.derives, vec!["Clone"]);
    let names: Vec<&str> = expr.variants.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Const", "Add", "Mult", "Neg"]);
    assert_eq!(
        expr.variants[1].fields,
        vec![
            Param::new("expr1", RustTy::rc(RustTy::named("Expr"))),
            Param::new("expr2", RustTy::rc(RustTy::named("Expr"))),
        ]
    );
    assert_eq!(spec.uses, vec!["std::rc::Rc"]);
    assert!(spec.methods.is_empty());
}

#[test]
fn restricted_variants_store_their_witness() {
    let fx = Fixture::new();
    let decl = fx.term_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[]).unwrap();

    let GenType::Enum(term) = &spec.types[0] else {
        panic!("enum must come first");
    };
    assert_eq!(
        term.variants[0].fields,
        vec![
            Param::new("value", RustTy::named("i32")),
            Param::new(
                "f",
                RustTy::SharedFn {
                    params: vec![RustTy::named("i32")],
                    ret: Box::new(RustTy::param("T")),
                }
            ),
        ]
    );
    assert_eq!(spec.uses, vec!["std::rc::Rc"]);
}

// Constructors

#[test]
fn one_constructor_per_case_with_matching_arity() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Constructors]).unwrap();

    let arities: Vec<usize> = spec.methods.iter().map(|m| m.params.len()).collect();
    assert_eq!(arities, vec![1, 2, 2, 1]);
    assert_eq!(
        signatures(&spec.methods),
        vec![
            "fn r#const(value: i32) -> Expr",
            "fn add(expr1: Expr, expr2: Expr) -> Expr",
            "fn mult(expr1: Expr, expr2: Expr) -> Expr",
            "fn neg(expr: Expr) -> Expr",
        ]
    );
    assert_eq!(
        body(method(&spec, "add")),
        vec!["Expr::Add { expr1: Rc::new(expr1), expr2: Rc::new(expr2) }"]
    );
    assert_eq!(body(method(&spec, "r#const")), vec!["Expr::Const { value }"]);
}

#[test]
fn path_keywords_are_suffixed() {
    let fx = Fixture::new();
    let decl = fx.decl(
        "Link",
        &[],
        vec![
            fx.named_case("Self", vec![("self", fx.atom("i32"))]),
            fx.named_case("super", vec![]),
        ],
    );
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Constructors]).unwrap();

    let GenType::Enum(link) = &spec.types[0] else {
        panic!("enum must come first");
    };
    let names: Vec<&str> = link.variants.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Self_", "Super"]);
    assert_eq!(
        signatures(&spec.methods),
        vec!["fn self_(self_: i32) -> Link", "fn super_() -> Link"]
    );
    assert_eq!(body(method(&spec, "self_")), vec!["Link::Self_ { self_ }"]);
}

#[test]
fn narrowed_constructors_return_the_narrowed_type() {
    let fx = Fixture::new();
    let decl = fx.term_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Constructors]).unwrap();

    assert_eq!(
        signatures(&spec.methods),
        vec![
            "fn int_lit(value: i32) -> Term<i32>",
            "fn bool_lit(value: bool) -> Term<bool>",
            "fn r#if<T>(term1: Term<bool>, term2: Term<T>, term3: Term<T>) -> Term<T>",
        ]
    );
    assert_eq!(
        body(method(&spec, "int_lit")),
        vec!["Term::IntLit { value, f: Rc::new(|v: i32| v) }"]
    );
}

#[test]
fn case_local_variables_are_erased() {
    let fx = Fixture::new();
    let (decl, snapshot) = fx.shape();
    let adt = fx.model_in(&decl, &snapshot);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Constructors]).unwrap();

    let GenType::Enum(shape) = &spec.types[0] else {
        panic!("enum must come first");
    };
    assert_eq!(
        shape.variants[1].fields,
        vec![
            Param::new("tag", RustTy::SharedAny),
            Param::new("size", RustTy::param("N")),
        ]
    );
    assert_eq!(
        method(&spec, "tagged").signature(),
        "fn tagged<N: 'static, E: Any>(tag: E, size: N) -> Shape<N>"
    );
    assert_eq!(
        body(method(&spec, "tagged")),
        vec!["Shape::Tagged { tag: Rc::new(tag), size }"]
    );
    assert_eq!(spec.uses, vec!["std::rc::Rc", "std::any::Any"]);
}

// Matcher

#[test]
fn matcher_trait_and_lambda_form() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Matcher]).unwrap();

    let GenType::Trait(cases) = &spec.types[1] else {
        panic!("expected the cases trait after the enum");
    };
    assert_eq!(cases.name, "ExprCases");
    assert_eq!(
        signatures(&cases.methods),
        vec![
            "fn r#const(&self, value: &i32) -> R",
            "fn add(&self, expr1: &Expr, expr2: &Expr) -> R",
            "fn mult(&self, expr1: &Expr, expr2: &Expr) -> R",
            "fn neg(&self, expr: &Expr) -> R",
        ]
    );
    assert!(cases.methods.iter().all(|m| m.body.is_none()));

    assert_eq!(
        method(&spec, "accept").signature(),
        "fn accept<R>(value: &Expr, cases: &impl ExprCases<R>) -> R"
    );
    let lambda = method(&spec, "match_expr");
    assert_eq!(
        lambda.signature(),
        "fn match_expr<R>(value: &Expr, on_const: impl FnOnce(&i32) -> R, \
         on_add: impl FnOnce(&Expr, &Expr) -> R, on_mult: impl FnOnce(&Expr, &Expr) -> R, \
         on_neg: impl FnOnce(&Expr) -> R) -> R"
    );
    assert_eq!(
        body(lambda),
        vec![
            "match value {",
            "    Expr::Const { value, .. } => on_const(value),",
            "    Expr::Add { expr1, expr2, .. } => on_add(&**expr1, &**expr2),",
            "    Expr::Mult { expr1, expr2, .. } => on_mult(&**expr1, &**expr2),",
            "    Expr::Neg { expr, .. } => on_neg(&**expr),",
            "}",
        ]
    );
}

#[test]
fn visitor_encoding_keeps_the_interface_name() {
    let fx = Fixture::new();
    let (decl, snapshot) = fx.shape();
    let adt = fx.model_in(&decl, &snapshot);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Matcher]).unwrap();

    let GenType::Trait(cases) = &spec.types[1] else {
        panic!("expected the cases trait after the enum");
    };
    assert_eq!(cases.name, "ShapeCases");
    assert_eq!(
        signatures(&cases.methods),
        vec![
            "fn circle(&self, radius: &N) -> R",
            "fn tagged(&self, tag: &Rc<dyn Any>, size: &N) -> R",
        ]
    );
}

#[test]
fn matcher_hands_witnesses_to_the_handlers() {
    let fx = Fixture::new();
    let decl = fx.term_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Matcher]).unwrap();

    let GenType::Trait(cases) = &spec.types[1] else {
        panic!("expected the cases trait after the enum");
    };
    assert_eq!(
        cases.methods[0].signature(),
        "fn int_lit(&self, value: &i32, f: &Rc<dyn Fn(i32) -> T>) -> R"
    );
    let lambda = method(&spec, "match_term");
    let on_int_lit = lambda.params.iter().find(|p| p.name == "on_int_lit").unwrap();
    assert_eq!(
        on_int_lit.ty.to_string(),
        "impl FnOnce(&i32, &Rc<dyn Fn(i32) -> T>) -> R"
    );
    assert_eq!(
        body(lambda)[1],
        "    Term::IntLit { value, f, .. } => on_int_lit(value, f),"
    );
}

// Case-of

#[test]
fn case_of_narrows_restricted_cases_only() {
    let fx = Fixture::new();
    let decl = fx.term_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::CaseOf]).unwrap();

    assert_eq!(
        method(&spec, "is_int_lit").signature(),
        "fn is_int_lit(value: &Term<i32>) -> bool"
    );
    assert_eq!(
        body(method(&spec, "is_int_lit")),
        vec!["matches!(value, Term::IntLit { .. })"]
    );
    assert_eq!(
        method(&spec, "if_int_lit").signature(),
        "fn if_int_lit<R>(value: &Term<i32>, \
         on_int_lit: impl FnOnce(&i32, &Rc<dyn Fn(i32) -> i32>) -> R) -> Option<R>"
    );
    assert_eq!(
        method(&spec, "if_if").signature(),
        "fn if_if<T, R>(value: &Term<T>, \
         on_if: impl FnOnce(&Term<bool>, &Term<T>, &Term<T>) -> R) -> Option<R>"
    );
    assert_eq!(
        body(method(&spec, "if_int_lit")),
        vec![
            "match value {",
            "    Term::IntLit { value, f, .. } => Some(on_int_lit(value, f)),",
            "    _ => None,",
            "}",
        ]
    );
}

// Destructure

#[test]
fn destructure_multi_case_warns_and_emits_nothing() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Destructure]).unwrap();

    assert!(spec.methods.is_empty());
    assert_eq!(spec.warnings.len(), 1);
    let warning = &spec.warnings[0];
    assert_eq!(warning.code, ErrorCode::W3001);
    assert_eq!(warning.localizations[0].span(), decl.annotation.span);
}

#[test]
fn destructure_single_case_borrows_fields() {
    let fx = Fixture::new();
    let decl = fx.decl(
        "Pair",
        &["A"],
        vec![fx.named_case(
            "Pair",
            vec![("first", fx.var("A")), ("rest", fx.con("Pair", vec![fx.var("A")]))],
        )],
    );
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Destructure]).unwrap();

    assert!(spec.warnings.is_empty());
    let destructure = method(&spec, "destructure");
    assert_eq!(
        destructure.signature(),
        "fn destructure<A>(value: &Pair<A>) -> (&A, &Pair<A>)"
    );
    assert_eq!(
        body(destructure),
        vec!["let Pair::Pair { first, rest, .. } = value;", "(first, &**rest)"]
    );
}

// Getters and modifiers

#[test]
fn getters_are_total_or_optional() {
    let fx = Fixture::new();
    let decl = fx.tree_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Getters]).unwrap();

    assert_eq!(
        signatures(&spec.methods),
        vec![
            "fn get_left<A>(value: &Tree<A>) -> Option<&Tree<A>>",
            "fn get_value<A>(value: &Tree<A>) -> Option<&A>",
            "fn get_right<A>(value: &Tree<A>) -> Option<&Tree<A>>",
        ]
    );
    assert_eq!(
        body(method(&spec, "get_left")),
        vec![
            "match value {",
            "    Tree::Node { left, .. } => Some(&**left),",
            "    _ => None,",
            "}",
        ]
    );

    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Getters]).unwrap();
    assert_eq!(
        body(method(&spec, "get_expr1")),
        vec![
            "match value {",
            "    Expr::Add { expr1, .. } | Expr::Mult { expr1, .. } => Some(&**expr1),",
            "    _ => None,",
            "}",
        ]
    );
}

#[test]
fn shared_field_in_every_case_is_total() {
    let fx = Fixture::new();
    let decl = fx.decl(
        "Shape",
        &[],
        vec![
            fx.named_case("Circle", vec![("name", fx.atom("String")), ("r", fx.atom("f64"))]),
            fx.named_case("Square", vec![("name", fx.atom("String"))]),
        ],
    );
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Getters]).unwrap();
    assert_eq!(
        method(&spec, "get_name").signature(),
        "fn get_name(value: &Shape) -> &String"
    );
    assert_eq!(
        body(method(&spec, "get_name")),
        vec![
            "match value {",
            "    Shape::Circle { name, .. } | Shape::Square { name, .. } => name,",
            "}",
        ]
    );
}

#[test]
fn conflicting_field_types_warn_and_skip() {
    let fx = Fixture::new();
    let decl = fx.decl(
        "Mixed",
        &[],
        vec![
            fx.named_case("Left", vec![("x", fx.atom("i32"))]),
            fx.named_case("Right", vec![("x", fx.atom("bool")), ("y", fx.atom("i32"))]),
        ],
    );
    let adt = fx.model(&decl);
    let spec = generate(
        &fx.cx(&adt, &decl),
        &[DerivationKind::Getters, DerivationKind::Modifiers],
    )
    .unwrap();

    let codes: Vec<ErrorCode> = spec.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![ErrorCode::W3002, ErrorCode::W3002]);
    assert!(spec.warnings[0].text.contains("`i32`, `bool`"));
    let names: Vec<&str> = spec.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["get_y", "set_y", "modify_y"]);
}

#[test]
fn modifiers_rebuild_the_case() {
    let fx = Fixture::new();
    let decl = fx.tree_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Modifiers]).unwrap();

    assert_eq!(
        method(&spec, "set_left").signature(),
        "fn set_left<A: Clone>(value: Tree<A>, new_left: Tree<A>) -> Tree<A>"
    );
    assert_eq!(
        body(method(&spec, "set_left")),
        vec!["modify_left(value, move |_| new_left)"]
    );
    assert_eq!(
        body(method(&spec, "modify_left")),
        vec![
            "match value {",
            "    Tree::Node { left, value, right, .. } => \
             Tree::Node { left: Rc::new(update(Rc::unwrap_or_clone(left))), value, right },",
            "    other => other,",
            "}",
        ]
    );
    assert_eq!(
        method(&spec, "modify_value").signature(),
        "fn modify_value<A>(value: Tree<A>, update: impl FnOnce(A) -> A) -> Tree<A>"
    );
}

#[test]
fn accessors_skip_case_local_fields() {
    let fx = Fixture::new();
    let (decl, snapshot) = fx.shape();
    let adt = fx.model_in(&decl, &snapshot);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Getters]).unwrap();
    let names: Vec<&str> = spec.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["get_radius", "get_size"]);
}

// Catamorphism, lazy, factory

#[test]
fn catamorphism_folds_recursive_fields() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Catamorphism]).unwrap();

    let cata = method(&spec, "cata_expr");
    assert_eq!(
        cata.signature(),
        "fn cata_expr<R>(value: &Expr, on_const: &dyn Fn(&i32) -> R, on_add: &dyn Fn(R, R) -> R, \
         on_mult: &dyn Fn(R, R) -> R, on_neg: &dyn Fn(R) -> R) -> R"
    );
    assert_eq!(
        body(cata)[2],
        "    Expr::Add { expr1, expr2, .. } => on_add(\
         cata_expr(&**expr1, on_const, on_add, on_mult, on_neg), \
         cata_expr(&**expr2, on_const, on_add, on_mult, on_neg)),"
    );
}

#[test]
fn catamorphism_hands_differently_typed_recursion_over_borrowed() {
    let fx = Fixture::new();
    let decl = fx.term_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Catamorphism]).unwrap();
    let cata = method(&spec, "cata_term");
    let on_if = cata.params.iter().find(|p| p.name == "on_if").unwrap();
    assert_eq!(on_if.ty.to_string(), "&dyn Fn(&Term<bool>, R, R) -> R");
    let on_bool_lit = cata.params.iter().find(|p| p.name == "on_bool_lit").unwrap();
    assert_eq!(
        on_bool_lit.ty.to_string(),
        "&dyn Fn(&bool, &Rc<dyn Fn(bool) -> T>) -> R"
    );
}

#[test]
fn modifiers_keep_the_witness() {
    let fx = Fixture::new();
    let decl = fx.decl(
        "Tagged",
        &["T"],
        vec![
            fx.named_case(
                "Count",
                vec![
                    ("label", fx.atom("String")),
                    ("to_t", TypeExpr::func(vec![fx.atom("i32")], fx.var("T"))),
                ],
            ),
            fx.named_case("Other", vec![("label", fx.atom("String")), ("t", fx.var("T"))]),
        ],
    );
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Modifiers]).unwrap();
    assert_eq!(
        body(method(&spec, "modify_label"))[1],
        "    Tagged::Count { label, to_t, .. } => Tagged::Count { label: update(label), to_t },"
    );
}

#[test]
fn lazy_defers_construction() {
    let fx = Fixture::new();
    let decl = fx.tree_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Lazy]).unwrap();
    assert_eq!(
        method(&spec, "lazy").signature(),
        "fn lazy<A: 'static, F: FnOnce() -> Tree<A> + 'static>(build: F) \
         -> LazyCell<Tree<A>, Box<dyn FnOnce() -> Tree<A>>>"
    );
    assert!(spec.uses.contains(&"std::cell::LazyCell"));
}

#[test]
fn factory_methods_take_self() {
    let fx = Fixture::new();
    let decl = fx.term_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Factory]).unwrap();
    let GenType::Struct(factory) = &spec.types[1] else {
        panic!("expected the factory after the enum");
    };
    assert_eq!(factory.name, "TermFactory");
    assert!(factory.fields.is_empty());
    assert_eq!(
        factory.methods[0].signature(),
        "fn int_lit(&self, value: i32) -> Term<i32>"
    );
}

// Request handling

#[test]
fn repeated_kinds_are_generated_once_in_request_order() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(
        &fx.cx(&adt, &decl),
        &[
            DerivationKind::Factory,
            DerivationKind::Constructors,
            DerivationKind::Factory,
        ],
    )
    .unwrap();
    let types: Vec<&str> = spec.types.iter().map(GenType::name).collect();
    assert_eq!(types, vec!["Expr", "ExprFactory"]);
    assert_eq!(spec.methods.len(), 4);
}

#[test]
fn every_kind_together() {
    let fx = Fixture::new();
    let decl = fx.tree_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &DerivationKind::ALL).unwrap();
    assert_eq!(spec.warnings.len(), 1);
    assert_eq!(spec.warnings[0].code, ErrorCode::W3001);
    assert!(spec.methods.iter().any(|m| m.name == "cata_tree"));
    assert!(spec.methods.iter().any(|m| m.name == "node"));
}

#[test]
fn no_constructors_is_an_internal_error() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let mut adt = fx.model(&decl);
    adt.constructors.clear();
    let err = generate(&fx.cx(&adt, &decl), &[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::E9001);
}
