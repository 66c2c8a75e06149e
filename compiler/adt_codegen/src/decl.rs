//! Generated Rust declarations.
//!
//! Derivators build these values; [`crate::render_module`] prints them.
//! Function bodies are kept as pre-formatted lines relative to the body's
//! own indentation.

use std::fmt;

use adt_diagnostic::DeriveMessage;

/// A Rust type in a generated signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RustTy {
    /// A type parameter.
    Param(String),
    /// A named type, possibly applied: `Expr`, `Option<&T>`, `Rc<Expr>`.
    Path { name: String, args: Vec<RustTy> },
    Ref(Box<RustTy>),
    Tuple(Vec<RustTy>),
    /// `impl FnOnce(..) -> R`
    ImplFnOnce { params: Vec<RustTy>, ret: Box<RustTy> },
    /// `&dyn Fn(..) -> R`
    DynFnRef { params: Vec<RustTy>, ret: Box<RustTy> },
    /// `Rc<dyn Fn(..) -> R>`
    SharedFn { params: Vec<RustTy>, ret: Box<RustTy> },
    /// `Box<dyn FnOnce(..) -> R>`
    BoxedFnOnce { params: Vec<RustTy>, ret: Box<RustTy> },
    /// `Rc<dyn Any>`: storage for case-local type variables.
    SharedAny,
}

impl RustTy {
    pub fn param(name: impl Into<String>) -> Self {
        RustTy::Param(name.into())
    }

    pub fn path(name: impl Into<String>, args: Vec<RustTy>) -> Self {
        RustTy::Path {
            name: name.into(),
            args,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::path(name, Vec::new())
    }

    pub fn bool() -> Self {
        Self::named("bool")
    }

    pub fn unit() -> Self {
        RustTy::Tuple(Vec::new())
    }

    pub fn reference(inner: RustTy) -> Self {
        RustTy::Ref(Box::new(inner))
    }

    pub fn option(inner: RustTy) -> Self {
        Self::path("Option", vec![inner])
    }

    pub fn rc(inner: RustTy) -> Self {
        Self::path("Rc", vec![inner])
    }

    pub fn impl_fn_once(params: Vec<RustTy>, ret: RustTy) -> Self {
        RustTy::ImplFnOnce {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn dyn_fn_ref(params: Vec<RustTy>, ret: RustTy) -> Self {
        RustTy::DynFnRef {
            params,
            ret: Box::new(ret),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[RustTy]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_fn(f: &mut fmt::Formatter<'_>, params: &[RustTy], ret: &RustTy) -> fmt::Result {
    f.write_str("(")?;
    write_list(f, params)?;
    f.write_str(")")?;
    if *ret != RustTy::unit() {
        write!(f, " -> {ret}")?;
    }
    Ok(())
}

impl fmt::Display for RustTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RustTy::Param(name) => f.write_str(name),
            RustTy::Path { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            RustTy::Ref(inner) => write!(f, "&{inner}"),
            RustTy::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            RustTy::ImplFnOnce { params, ret } => {
                f.write_str("impl FnOnce")?;
                write_fn(f, params, ret)
            }
            RustTy::DynFnRef { params, ret } => {
                f.write_str("&dyn Fn")?;
                write_fn(f, params, ret)
            }
            RustTy::SharedFn { params, ret } => {
                f.write_str("Rc<dyn Fn")?;
                write_fn(f, params, ret)?;
                f.write_str(">")
            }
            RustTy::BoxedFnOnce { params, ret } => {
                f.write_str("Box<dyn FnOnce")?;
                write_fn(f, params, ret)?;
                f.write_str(">")
            }
            RustTy::SharedAny => f.write_str("Rc<dyn Any>"),
        }
    }
}

/// A generic parameter with its bounds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Generic {
    pub name: String,
    pub bounds: Vec<String>,
}

impl Generic {
    pub fn new(name: impl Into<String>) -> Self {
        Generic {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    #[must_use]
    pub fn bound(mut self, bound: impl Into<String>) -> Self {
        let bound = bound.into();
        if !self.bounds.contains(&bound) {
            self.bounds.push(bound);
        }
        self
    }
}

impl fmt::Display for Generic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.bounds.is_empty() {
            write!(f, ": {}", self.bounds.join(" + "))?;
        }
        Ok(())
    }
}

/// Render `<A, B: Clone>`, or nothing for an empty list.
pub fn generics_text(generics: &[Generic]) -> String {
    if generics.is_empty() {
        return String::new();
    }
    let items: Vec<String> = generics.iter().map(ToString::to_string).collect();
    format!("<{}>", items.join(", "))
}

/// A named, typed slot: function parameter or struct/variant field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub ty: RustTy,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: RustTy) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }
}

/// A generated function or method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FnDecl {
    pub name: String,
    pub doc: Option<String>,
    pub generics: Vec<Generic>,
    /// Takes `&self` (trait and factory methods).
    pub receiver: bool,
    pub params: Vec<Param>,
    pub ret: RustTy,
    /// `None` for a required trait method.
    pub body: Option<Vec<String>>,
}

impl FnDecl {
    pub fn new(name: impl Into<String>, ret: RustTy) -> Self {
        FnDecl {
            name: name.into(),
            doc: None,
            generics: Vec::new(),
            receiver: false,
            params: Vec::new(),
            ret,
            body: None,
        }
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn generics(mut self, generics: Vec<Generic>) -> Self {
        self.generics = generics;
        self
    }

    #[must_use]
    pub fn with_receiver(mut self) -> Self {
        self.receiver = true;
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: RustTy) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    #[must_use]
    pub fn body(mut self, lines: Vec<String>) -> Self {
        self.body = Some(lines);
        self
    }

    /// The signature without visibility: `fn add(expr1: Expr) -> Expr`.
    pub fn signature(&self) -> String {
        let mut params: Vec<String> = Vec::with_capacity(self.params.len() + 1);
        if self.receiver {
            params.push("&self".to_owned());
        }
        params.extend(self.params.iter().map(|p| format!("{}: {}", p.name, p.ty)));
        let mut text = format!(
            "fn {}{}({})",
            self.name,
            generics_text(&self.generics),
            params.join(", ")
        );
        if self.ret != RustTy::unit() {
            text.push_str(&format!(" -> {}", self.ret));
        }
        text
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariantDecl {
    pub name: String,
    pub fields: Vec<Param>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumDecl {
    pub name: String,
    pub doc: Option<String>,
    pub generics: Vec<Generic>,
    pub derives: Vec<&'static str>,
    pub variants: Vec<VariantDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TraitDecl {
    pub name: String,
    pub doc: Option<String>,
    pub generics: Vec<Generic>,
    pub methods: Vec<FnDecl>,
}

/// A struct and its inherent methods.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructDecl {
    pub name: String,
    pub doc: Option<String>,
    pub generics: Vec<Generic>,
    /// Empty for a unit struct.
    pub fields: Vec<Param>,
    pub methods: Vec<FnDecl>,
}

/// A generated type-level declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GenType {
    Enum(EnumDecl),
    Trait(TraitDecl),
    Struct(StructDecl),
}

impl GenType {
    pub fn name(&self) -> &str {
        match self {
            GenType::Enum(decl) => &decl.name,
            GenType::Trait(decl) => &decl.name,
            GenType::Struct(decl) => &decl.name,
        }
    }
}

/// A lazily initialized static (`LazyLock`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StaticDecl {
    pub name: String,
    pub doc: Option<String>,
    pub ty: RustTy,
    /// Initializer expression lines.
    pub init: Vec<String>,
}

/// Everything one or more derivations produce for one ADT.
///
/// Units concatenate; messages survive concatenation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedCodeSpec {
    pub types: Vec<GenType>,
    pub fields: Vec<StaticDecl>,
    /// Free functions of the companion module.
    pub methods: Vec<FnDecl>,
    /// `use` paths the units need, deduplicated in first-use order.
    pub uses: Vec<&'static str>,
    pub infos: Vec<DeriveMessage>,
    pub warnings: Vec<DeriveMessage>,
}

impl DerivedCodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(ty: GenType) -> Self {
        DerivedCodeSpec {
            types: vec![ty],
            ..Self::default()
        }
    }

    pub fn of_methods(methods: Vec<FnDecl>) -> Self {
        DerivedCodeSpec {
            methods,
            ..Self::default()
        }
    }

    /// A unit with no code and one warning.
    pub fn warning(message: DeriveMessage) -> Self {
        DerivedCodeSpec {
            warnings: vec![message],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn using(mut self, path: &'static str) -> Self {
        self.add_use(path);
        self
    }

    pub fn add_use(&mut self, path: &'static str) {
        if !self.uses.contains(&path) {
            self.uses.push(path);
        }
    }

    /// Append `other` after this unit.
    pub fn append(&mut self, other: DerivedCodeSpec) {
        self.types.extend(other.types);
        self.fields.extend(other.fields);
        self.methods.extend(other.methods);
        for path in other.uses {
            self.add_use(path);
        }
        self.infos.extend(other.infos);
        self.warnings.extend(other.warnings);
    }

    pub fn concat(units: impl IntoIterator<Item = DerivedCodeSpec>) -> Self {
        let mut out = DerivedCodeSpec::new();
        for unit in units {
            out.append(unit);
        }
        out
    }

    /// Whether the unit contributes no code.
    pub fn has_no_code(&self) -> bool {
        self.types.is_empty() && self.fields.is_empty() && self.methods.is_empty()
    }
}
