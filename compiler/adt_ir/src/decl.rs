//! Declaration snapshot.
//!
//! The read-only view of the host toolchain's declarations: annotated data
//! declarations, the visitor interfaces they reference, and the static
//! members visible for instance search. Nothing in this module is mutated
//! after loading.

use crate::{Name, Span, TypeExpr};

/// A declared type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParam {
    pub name: Name,
    pub span: Span,
}

/// A method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamDecl {
    pub name: Name,
    pub span: Span,
    pub ty: TypeExpr,
    /// Explicit field names for a function-typed matcher parameter.
    ///
    /// Empty when the parameter carries no field-name annotation.
    pub field_names: Vec<Name>,
}

/// A method signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    pub name: Name,
    pub span: Span,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<ParamDecl>,
    pub ret: TypeExpr,
    pub is_abstract: bool,
}

/// An annotation value together with its own source span.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationValue<T> {
    pub value: T,
    pub span: Span,
}

/// The `@Data`-style annotation on a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DataAnnotation {
    pub span: Span,
    /// Requested derivation names; `None` means "use the configured defaults".
    pub derive: Option<Vec<AnnotationValue<Name>>>,
    /// Requested type-class instances.
    pub instances: Vec<AnnotationValue<Name>>,
}

/// An annotated data declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataDecl {
    pub name: Name,
    pub span: Span,
    pub type_params: Vec<TypeParam>,
    pub methods: Vec<MethodDecl>,
    pub annotation: DataAnnotation,
    /// Static members declared on the data declaration itself.
    pub statics: Vec<StaticMember>,
}

impl DataDecl {
    /// Abstract methods in declaration order.
    pub fn abstract_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_abstract)
    }

    /// The declared type applied to its own type parameters.
    pub fn self_type(&self) -> TypeExpr {
        TypeExpr::con(
            self.name,
            self.type_params
                .iter()
                .map(|p| TypeExpr::var(p.name))
                .collect(),
        )
    }

    /// Whether `name` is one of the declared type parameters.
    pub fn declares(&self, name: Name) -> bool {
        self.type_params.iter().any(|p| p.name == name)
    }
}

/// A visitor interface (the "cases" of a visitor-encoded matcher).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceDecl {
    pub name: Name,
    pub span: Span,
    pub type_params: Vec<TypeParam>,
    pub methods: Vec<MethodDecl>,
}

/// A static member visible for instance search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StaticMember {
    /// A static field of the given type.
    Field { name: Name, span: Span, ty: TypeExpr },
    /// A static factory method.
    Method {
        name: Name,
        span: Span,
        type_params: Vec<TypeParam>,
        params: Vec<TypeExpr>,
        ret: TypeExpr,
    },
}

impl StaticMember {
    pub fn name(&self) -> Name {
        match self {
            StaticMember::Field { name, .. } | StaticMember::Method { name, .. } => *name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            StaticMember::Field { span, .. } | StaticMember::Method { span, .. } => *span,
        }
    }

    /// The type this member provides (field type or method return type).
    pub fn provided_type(&self) -> &TypeExpr {
        match self {
            StaticMember::Field { ty, .. } => ty,
            StaticMember::Method { ret, .. } => ret,
        }
    }
}

/// A named group of static members (a class, module or companion object).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProviderSource {
    pub name: Name,
    pub span: Span,
    pub members: Vec<StaticMember>,
}

/// Everything the host toolchain exposes for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Path of the source file, for diagnostics.
    pub path: Option<String>,
    /// Source text, for line/column rendering.
    pub source: Option<String>,
    pub declarations: Vec<DataDecl>,
    pub interfaces: Vec<InterfaceDecl>,
    pub providers: Vec<ProviderSource>,
    /// Providers searched only after every other provider failed.
    pub low_priority: Vec<Name>,
}

impl Snapshot {
    pub fn interface(&self, name: Name) -> Option<&InterfaceDecl> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn provider(&self, name: Name) -> Option<&ProviderSource> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn declaration(&self, name: Name) -> Option<&DataDecl> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn is_low_priority(&self, provider: Name) -> bool {
        self.low_priority.contains(&provider)
    }
}
