use super::*;
use crate::test_support::Fixture;
use crate::{derive_instances, generate, GeneratorRegistry};
use adt_ir::{DerivationKind, Snapshot};
use pretty_assertions::assert_eq;

#[test]
fn module_layout() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Constructors]).unwrap();
    let text = render_module(&adt, &spec, &fx.interner);

    let expected = "\
// @generated by adtc from `Expr`. Do not edit.
use super::*;
use std::rc::Rc;

/// Cases of `Expr`, one variant per matcher case.
#[derive(Clone)]
pub enum Expr {
    Const {
        value: i32,
    },
    Add {
        expr1: Rc<Expr>,
        expr2: Rc<Expr>,
    },
    Mult {
        expr1: Rc<Expr>,
        expr2: Rc<Expr>,
    },
    Neg {
        expr: Rc<Expr>,
    },
}

pub mod expr {
    use super::*;

    pub fn r#const(value: i32) -> Expr {
        Expr::Const { value }
    }

    pub fn add(expr1: Expr, expr2: Expr) -> Expr {
        Expr::Add { expr1: Rc::new(expr1), expr2: Rc::new(expr2) }
    }

    pub fn mult(expr1: Expr, expr2: Expr) -> Expr {
        Expr::Mult { expr1: Rc::new(expr1), expr2: Rc::new(expr2) }
    }

    pub fn neg(expr: Expr) -> Expr {
        Expr::Neg { expr: Rc::new(expr) }
    }
}
";
    assert_eq!(text, expected);
}

#[test]
fn unit_variants_and_trait_methods() {
    let fx = Fixture::new();
    let decl = fx.tree_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Matcher]).unwrap();
    let text = render_module(&adt, &spec, &fx.interner);

    assert!(text.contains("pub enum Tree<A> {\n    Leaf,\n    Node {\n"));
    assert!(text.contains(
        "pub trait TreeCases<A, R> {\n    fn leaf(&self) -> R;\n    \
         fn node(&self, left: &Tree<A>, value: &A, right: &Tree<A>) -> R;\n}\n"
    ));
    assert!(text.contains("    /// Dispatch `value` to the method of `cases` for its case.\n"));
    assert!(text.ends_with("}\n"));
    assert!(!text.ends_with("\n\n"));
}

#[test]
fn factory_struct_and_impl() {
    let fx = Fixture::new();
    let decl = fx.expr_decl();
    let adt = fx.model(&decl);
    let spec = generate(&fx.cx(&adt, &decl), &[DerivationKind::Factory]).unwrap();
    let text = render_module(&adt, &spec, &fx.interner);

    assert!(text.contains(
        "#[derive(Clone, Copy, Debug, Default)]\npub struct ExprFactory;\n\nimpl ExprFactory {\n"
    ));
    assert!(text.contains("    pub fn neg(&self, expr: Expr) -> Expr {\n"));
    assert!(!text.contains("pub mod expr"));
}

#[test]
fn statics_follow_types() {
    let fx = Fixture::new();
    let mut decl = fx.decl(
        "Color",
        &[],
        vec![fx.case("Red", vec![]), fx.case("Green", vec![])],
    );
    decl.annotation.instances = vec![fx.request("Eq")];
    let adt = fx.model(&decl);
    let cx = fx.cx(&adt, &decl);
    let mut spec = generate(&cx, &[]).unwrap();
    spec.append(
        derive_instances(
            &cx,
            &decl,
            &Snapshot::default(),
            &GeneratorRegistry::with_builtins(),
        )
        .unwrap(),
    );
    let text = render_module(&adt, &spec, &fx.interner);

    assert!(text.starts_with(
        "// @generated by adtc from `Color`. Do not edit.\nuse super::*;\nuse std::sync::LazyLock;\n\n"
    ));
    assert!(text.contains(
        "}\n\n/// `Eq` for `Color`.\n\
         pub static COLOR_EQ: LazyLock<Eq<Color>> = LazyLock::new(|| {\n    \
         Eq::new(move |left: &Color, right: &Color| match (left, right) {\n        \
         (Color::Red, Color::Red) => true,\n"
    ));
    assert!(text.ends_with("        _ => false,\n    })\n});\n"));
}
