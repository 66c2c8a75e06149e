//! Naming and type mapping shared by every derivator.

use adt_ir::{
    ident::{escape_ident, pascal_case, snake_case},
    is_tuple_name, Name, Span, StringInterner, TypeExpr,
};
use adt_model::{AlgebraicDataType, DataArgument, DataConstructor, TypeRestriction};

use crate::{Generic, Param, RustTy};

/// Read-only context for synthesizing one ADT.
pub struct SynthContext<'a> {
    pub adt: &'a AlgebraicDataType,
    pub interner: &'a StringInterner,
    /// Span of the data annotation, for annotation-level warnings.
    pub annotation: Span,
}

impl<'a> SynthContext<'a> {
    pub fn new(adt: &'a AlgebraicDataType, interner: &'a StringInterner, annotation: Span) -> Self {
        SynthContext {
            adt,
            interner,
            annotation,
        }
    }

    pub fn lookup(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// The ADT's Rust type name.
    pub fn type_name(&self) -> String {
        pascal_case(self.lookup(self.adt.name))
    }

    /// The companion module holding free functions.
    pub fn module_name(&self) -> String {
        escape_ident(&snake_case(self.lookup(self.adt.name)))
    }

    /// `snake_case` of the ADT name without escaping, for prefixes.
    pub fn snake_name(&self) -> String {
        snake_case(self.lookup(self.adt.name))
    }

    pub fn variant_name(&self, ctor: &DataConstructor) -> String {
        pascal_case(self.lookup(ctor.name))
    }

    /// `Expr::Add`
    pub fn variant_path(&self, ctor: &DataConstructor) -> String {
        format!("{}::{}", self.type_name(), self.variant_name(ctor))
    }

    /// Function-style name of a constructor (`IntLit` -> `int_lit`).
    pub fn ctor_fn_name(&self, ctor: &DataConstructor) -> String {
        escape_ident(&self.ctor_snake(ctor))
    }

    pub fn ctor_snake(&self, ctor: &DataConstructor) -> String {
        snake_case(self.lookup(ctor.name))
    }

    pub fn field_name(&self, name: Name) -> String {
        escape_ident(&snake_case(self.lookup(name)))
    }

    /// Unescaped `snake_case` of a field name, for prefixes.
    pub fn field_snake(&self, name: Name) -> String {
        snake_case(self.lookup(name))
    }

    /// Plain mapping of a declared type.
    pub fn rust_ty(&self, ty: &TypeExpr) -> RustTy {
        match ty {
            TypeExpr::Var(name) => RustTy::param(self.lookup(*name)),
            TypeExpr::Con { name, args } => {
                let text = self.lookup(*name);
                let args: Vec<RustTy> = args.iter().map(|a| self.rust_ty(a)).collect();
                if is_tuple_name(text, args.len()) {
                    RustTy::Tuple(args)
                } else {
                    RustTy::path(text, args)
                }
            }
            TypeExpr::Fn { params, ret } => RustTy::SharedFn {
                params: params.iter().map(|p| self.rust_ty(p)).collect(),
                ret: Box::new(self.rust_ty(ret)),
            },
        }
    }

    /// Whether `arg` mentions a case-local type variable of `ctor`.
    pub fn is_existential(&self, ctor: &DataConstructor, arg: &DataArgument) -> bool {
        ctor.existentials.iter().any(|&e| arg.ty.mentions(e))
    }

    /// The type a field is stored as inside the enum.
    pub fn storage_ty(&self, ctor: &DataConstructor, arg: &DataArgument) -> RustTy {
        if self.is_existential(ctor, arg) {
            RustTy::SharedAny
        } else if self.adt.is_recursive_argument(arg) {
            RustTy::rc(self.rust_ty(&arg.ty))
        } else {
            self.rust_ty(&arg.ty)
        }
    }

    /// The type handed out when a field is borrowed.
    pub fn borrowed_ty(&self, ctor: &DataConstructor, arg: &DataArgument) -> RustTy {
        if self.adt.is_recursive_argument(arg) && !self.is_existential(ctor, arg) {
            RustTy::reference(self.rust_ty(&arg.ty))
        } else {
            RustTy::reference(self.storage_ty(ctor, arg))
        }
    }

    /// [`Self::borrowed_ty`] inside a function taking the constructor's
    /// narrowed type, where restricted parameters are already fixed.
    pub fn narrowed_borrowed_ty(&self, ctor: &DataConstructor, arg: &DataArgument) -> RustTy {
        if ctor.is_witness(arg) {
            RustTy::reference(self.rust_ty(&ctor.narrow(&arg.ty)))
        } else {
            self.borrowed_ty(ctor, arg)
        }
    }

    /// Expression borrowing a field from a pattern binding of `&Storage`.
    pub fn borrow_expr(&self, ctor: &DataConstructor, arg: &DataArgument, binding: &str) -> String {
        if self.adt.is_recursive_argument(arg) && !self.is_existential(ctor, arg) {
            format!("&**{binding}")
        } else {
            binding.to_owned()
        }
    }

    /// Expression turning a declared-type value into its storage form.
    pub fn store_expr(&self, ctor: &DataConstructor, arg: &DataArgument, value: &str) -> String {
        if self.is_existential(ctor, arg) || self.adt.is_recursive_argument(arg) {
            format!("Rc::new({value})")
        } else {
            value.to_owned()
        }
    }

    pub fn self_ty(&self) -> RustTy {
        self.rust_ty(&self.adt.self_type())
    }

    /// The narrowed type of values built by `ctor`.
    pub fn result_ty(&self, ctor: &DataConstructor) -> RustTy {
        self.rust_ty(&self.adt.result_type(ctor))
    }

    pub fn adt_generics(&self) -> Vec<Generic> {
        self.adt
            .type_params
            .iter()
            .map(|&p| Generic::new(self.lookup(p)))
            .collect()
    }

    /// Generics of a function specialized to one constructor: its visible
    /// type parameters, existentials bounded by `Any`.
    ///
    /// Erasing a case-local value into `Rc<dyn Any>` needs everything it
    /// mentions to be `'static`, so the other parameters of such a case
    /// carry that bound too.
    pub fn ctor_generics(&self, ctor: &DataConstructor) -> Vec<Generic> {
        let erases = !ctor.existentials.is_empty();
        ctor.type_params
            .iter()
            .map(|&p| {
                let generic = Generic::new(self.lookup(p));
                if ctor.existentials.contains(&p) {
                    generic.bound("Any")
                } else if erases {
                    generic.bound("'static")
                } else {
                    generic
                }
            })
            .collect()
    }

    /// Generics of a constructor-specific function that does not bind the
    /// existentials (they stay erased behind `Rc<dyn Any>`).
    pub fn ctor_generics_without_existentials(&self, ctor: &DataConstructor) -> Vec<Generic> {
        ctor.type_params
            .iter()
            .filter(|p| !ctor.existentials.contains(p))
            .map(|&p| Generic::new(self.lookup(p)))
            .collect()
    }

    /// Every enum field of a variant in declaration order, type-equality
    /// witnesses included.
    pub fn variant_fields(&self, ctor: &DataConstructor) -> Vec<Param> {
        ctor.case_fields()
            .iter()
            .map(|a| Param::new(self.field_name(a.name), self.storage_ty(ctor, a)))
            .collect()
    }

    /// `Expr::Add { expr1: l0, expr2: l1, .. }` binding every argument
    /// with `bind(position)`; unit variants print bare.
    pub fn pattern(&self, ctor: &DataConstructor, bind: impl Fn(usize) -> String) -> String {
        let path = self.variant_path(ctor);
        if is_unit_variant(ctor) {
            return path;
        }
        let mut parts: Vec<String> = ctor
            .arguments
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let field = self.field_name(a.name);
                let binding = bind(i);
                if binding == field {
                    field
                } else {
                    format!("{field}: {binding}")
                }
            })
            .collect();
        parts.push("..".to_owned());
        format!("{path} {{ {} }}", parts.join(", "))
    }

    /// `Expr::Add { .. }`, or the bare path for unit variants.
    pub fn wildcard_pattern(&self, ctor: &DataConstructor) -> String {
        let path = self.variant_path(ctor);
        if is_unit_variant(ctor) {
            path
        } else {
            format!("{path} {{ .. }}")
        }
    }

    /// Pattern binding only the argument at `position`.
    pub fn single_field_pattern(&self, ctor: &DataConstructor, position: usize, binding: &str) -> String {
        let path = self.variant_path(ctor);
        match ctor.arguments.get(position) {
            Some(arg) => {
                let field = self.field_name(arg.name);
                if field == binding {
                    format!("{path} {{ {field}, .. }}")
                } else {
                    format!("{path} {{ {field}: {binding}, .. }}")
                }
            }
            None => format!("{path} {{ .. }}"),
        }
    }

    /// Name of the generic result parameter (the matcher's own variable).
    pub fn result_param(&self) -> String {
        self.lookup(self.adt.result_var).to_owned()
    }

    /// Pattern binding every field, witnesses included, under its own name.
    pub fn field_pattern(&self, ctor: &DataConstructor) -> String {
        let path = self.variant_path(ctor);
        if is_unit_variant(ctor) {
            return path;
        }
        let mut parts: Vec<String> = ctor
            .case_fields()
            .iter()
            .map(|a| self.field_name(a.name))
            .collect();
        parts.push("..".to_owned());
        format!("{path} {{ {} }}", parts.join(", "))
    }

    /// Construct `ctor` from argument expressions already in storage form.
    /// Witness fields take the binding of the same name.
    pub fn construct(&self, ctor: &DataConstructor, values: &[String]) -> String {
        self.construct_with(ctor, values, |r| self.field_name(r.witness.name))
    }

    /// Construct `ctor` from parameters named after its fields, wrapping
    /// recursive and case-local fields. Witnesses start as the identity.
    pub fn construct_from_fields(&self, ctor: &DataConstructor) -> String {
        let values: Vec<String> = ctor
            .arguments
            .iter()
            .map(|a| self.store_expr(ctor, a, &self.field_name(a.name)))
            .collect();
        self.construct_with(ctor, &values, |r| {
            format!("Rc::new(|v: {}| v)", self.rust_ty(&r.ty))
        })
    }

    fn construct_with(
        &self,
        ctor: &DataConstructor,
        values: &[String],
        witness: impl Fn(&TypeRestriction) -> String,
    ) -> String {
        let path = self.variant_path(ctor);
        if is_unit_variant(ctor) {
            return path;
        }
        let mut values = values.iter();
        let parts: Vec<String> = ctor
            .case_fields()
            .iter()
            .filter_map(|a| {
                let field = self.field_name(a.name);
                let value = match ctor.restrictions.iter().find(|r| r.witness.name == a.name) {
                    Some(restriction) => witness(restriction),
                    None => values.next()?.clone(),
                };
                Some(if value == field {
                    field
                } else {
                    format!("{field}: {value}")
                })
            })
            .collect();
        format!("{path} {{ {} }}", parts.join(", "))
    }

    /// Constructor parameters in declared form.
    pub fn ctor_params(&self, ctor: &DataConstructor) -> Vec<Param> {
        ctor.arguments
            .iter()
            .map(|a| Param::new(self.field_name(a.name), self.rust_ty(&a.ty)))
            .collect()
    }

    /// `use` paths implied by the enum's storage.
    pub fn storage_uses(&self) -> Vec<&'static str> {
        let mut uses = Vec::new();
        let ctors = &self.adt.constructors;
        let needs_rc = ctors.iter().any(|c| {
            c.case_fields().iter().any(|a| {
                self.adt.is_recursive_argument(a)
                    || self.is_existential(c, a)
                    || contains_fn(&a.ty)
            })
        });
        if needs_rc {
            uses.push("std::rc::Rc");
        }
        if ctors
            .iter()
            .any(|c| c.arguments.iter().any(|a| self.is_existential(c, a)))
        {
            uses.push("std::any::Any");
        }
        uses
    }
}

/// Whether the variant has no fields at all (not even witnesses).
pub fn is_unit_variant(ctor: &DataConstructor) -> bool {
    ctor.arguments.is_empty() && ctor.restrictions.is_empty()
}

fn contains_fn(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Var(_) => false,
        TypeExpr::Con { args, .. } => args.iter().any(contains_fn),
        TypeExpr::Fn { .. } => true,
    }
}
