//! Declarations shared by the synthesizer tests.

use std::cell::Cell;

use adt_ir::{
    AnnotationValue, DataAnnotation, DataDecl, InterfaceDecl, MethodDecl, Name, ParamDecl,
    Snapshot, Span, StaticMember, StringInterner, TypeExpr, TypeParam,
};
use adt_model::{build_model, AlgebraicDataType};

use crate::SynthContext;

pub(crate) struct Fixture {
    pub interner: StringInterner,
    next_span: Cell<u32>,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            interner: StringInterner::new(),
            next_span: Cell::new(1),
        }
    }

    pub fn span(&self) -> Span {
        let start = self.next_span.get();
        self.next_span.set(start + 10);
        Span::new(start, start + 5)
    }

    pub fn n(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn var(&self, s: &str) -> TypeExpr {
        TypeExpr::var(self.n(s))
    }

    pub fn atom(&self, s: &str) -> TypeExpr {
        TypeExpr::atom(self.n(s))
    }

    pub fn con(&self, s: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::con(self.n(s), args)
    }

    fn type_param(&self, s: &str) -> TypeParam {
        TypeParam {
            name: self.n(s),
            span: self.span(),
        }
    }

    /// A lambda-encoded case `name: fn(fields..) -> R`.
    pub fn case(&self, name: &str, fields: Vec<TypeExpr>) -> ParamDecl {
        ParamDecl {
            name: self.n(name),
            span: self.span(),
            ty: TypeExpr::func(fields, self.var("R")),
            field_names: Vec::new(),
        }
    }

    /// A case with explicit field names.
    pub fn named_case(&self, name: &str, fields: Vec<(&str, TypeExpr)>) -> ParamDecl {
        let (names, types): (Vec<&str>, Vec<TypeExpr>) = fields.into_iter().unzip();
        ParamDecl {
            field_names: names.iter().map(|n| self.n(n)).collect(),
            ..self.case(name, types)
        }
    }

    pub fn decl(&self, name: &str, type_params: &[&str], cases: Vec<ParamDecl>) -> DataDecl {
        let matcher = MethodDecl {
            name: self.n("match"),
            span: self.span(),
            type_params: vec![self.type_param("R")],
            params: cases,
            ret: self.var("R"),
            is_abstract: true,
        };
        DataDecl {
            name: self.n(name),
            span: self.span(),
            type_params: type_params.iter().map(|p| self.type_param(p)).collect(),
            methods: vec![matcher],
            annotation: DataAnnotation {
                span: self.span(),
                derive: None,
                instances: Vec::new(),
            },
            statics: Vec::new(),
        }
    }

    /// `Expr`: `Const(i32)`, `Add(Expr, Expr)`, `Mult(Expr, Expr)`, `Neg(Expr)`.
    pub fn expr_decl(&self) -> DataDecl {
        let expr = self.atom("Expr");
        self.decl(
            "Expr",
            &[],
            vec![
                self.case("Const", vec![self.atom("i32")]),
                self.case("Add", vec![expr.clone(), expr.clone()]),
                self.case("Mult", vec![expr.clone(), expr.clone()]),
                self.case("Neg", vec![expr]),
            ],
        )
    }

    /// `Term<T>` whose literal cases narrow `T`.
    pub fn term_decl(&self) -> DataDecl {
        let t = self.var("T");
        let term = |arg: TypeExpr| self.con("Term", vec![arg]);
        self.decl(
            "Term",
            &["T"],
            vec![
                self.case(
                    "IntLit",
                    vec![
                        self.atom("i32"),
                        TypeExpr::func(vec![self.atom("i32")], t.clone()),
                    ],
                ),
                self.case(
                    "BoolLit",
                    vec![
                        self.atom("bool"),
                        TypeExpr::func(vec![self.atom("bool")], t.clone()),
                    ],
                ),
                self.case(
                    "If",
                    vec![term(self.atom("bool")), term(t.clone()), term(t)],
                ),
            ],
        )
    }

    /// `Tree<A>`: `Leaf`, `Node(Tree<A>, A, Tree<A>)`.
    pub fn tree_decl(&self) -> DataDecl {
        let tree = self.con("Tree", vec![self.var("A")]);
        self.decl(
            "Tree",
            &["A"],
            vec![
                self.case("Leaf", vec![]),
                self.named_case(
                    "Node",
                    vec![
                        ("left", tree.clone()),
                        ("value", self.var("A")),
                        ("right", tree),
                    ],
                ),
            ],
        )
    }

    /// `Shape<N>` through the visitor `ShapeCases<N, X>`, whose `Tagged`
    /// case carries a case-local `E`.
    pub fn shape(&self) -> (DataDecl, Snapshot) {
        let param = |name: &str, ty: TypeExpr| ParamDecl {
            name: self.n(name),
            span: self.span(),
            ty,
            field_names: Vec::new(),
        };
        let case = |name: &str, params: Vec<ParamDecl>, type_params: Vec<TypeParam>| MethodDecl {
            name: self.n(name),
            span: self.span(),
            type_params,
            params,
            ret: self.var("X"),
            is_abstract: true,
        };
        let interface = InterfaceDecl {
            name: self.n("ShapeCases"),
            span: self.span(),
            type_params: vec![self.type_param("N"), self.type_param("X")],
            methods: vec![
                case("Circle", vec![param("radius", self.var("N"))], vec![]),
                case(
                    "Tagged",
                    vec![param("tag", self.var("E")), param("size", self.var("N"))],
                    vec![self.type_param("E")],
                ),
            ],
        };
        let cases = param(
            "cases",
            self.con("ShapeCases", vec![self.var("N"), self.var("R")]),
        );
        let decl = self.decl("Shape", &["N"], vec![cases]);
        let snapshot = Snapshot {
            interfaces: vec![interface],
            ..Snapshot::default()
        };
        (decl, snapshot)
    }

    pub fn model_in(&self, decl: &DataDecl, snapshot: &Snapshot) -> AlgebraicDataType {
        build_model(decl, snapshot, &self.interner).unwrap()
    }

    pub fn model(&self, decl: &DataDecl) -> AlgebraicDataType {
        build_model(decl, &Snapshot::default(), &self.interner).unwrap()
    }

    pub fn cx<'a>(&'a self, adt: &'a AlgebraicDataType, decl: &DataDecl) -> SynthContext<'a> {
        SynthContext::new(adt, &self.interner, decl.annotation.span)
    }

    pub fn request(&self, class: &str) -> AnnotationValue<Name> {
        AnnotationValue {
            value: self.n(class),
            span: self.span(),
        }
    }

    pub fn field(&self, name: &str, ty: TypeExpr) -> StaticMember {
        StaticMember::Field {
            name: self.n(name),
            span: self.span(),
            ty,
        }
    }

    pub fn method(
        &self,
        name: &str,
        type_params: &[&str],
        params: Vec<TypeExpr>,
        ret: TypeExpr,
    ) -> StaticMember {
        StaticMember::Method {
            name: self.n(name),
            span: self.span(),
            type_params: type_params.iter().map(|p| self.type_param(p)).collect(),
            params,
            ret,
        }
    }
}
