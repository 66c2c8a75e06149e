//! The canonical ADT model.

use adt_ir::{Name, Span, TypeExpr};
use adt_types::{substitute, Substitution};

use crate::FieldIndex;

/// How the matcher method enumerates its cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatcherEncoding {
    /// One function-typed parameter per case.
    Lambdas,
    /// A single parameter typed with a visitor interface.
    Visitor { interface: Name, param: Name },
}

/// One field of a constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataArgument {
    pub name: Name,
    pub span: Span,
    pub ty: TypeExpr,
}

/// A type-equality witness narrowing one declaration variable inside one
/// constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRestriction {
    /// The declaration type parameter being narrowed.
    pub var: Name,
    /// What `var` is fixed to within the constructor.
    pub ty: TypeExpr,
    /// The witness argument exactly as declared (`fn(ty) -> var`).
    pub witness: DataArgument,
    /// Index of the witness among the case's declared parameters.
    pub position: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataConstructor {
    pub name: Name,
    pub span: Span,
    /// Position among the ADT's constructors.
    pub index: usize,
    /// Fields in declaration order, witnesses removed.
    pub arguments: Vec<DataArgument>,
    pub restrictions: Vec<TypeRestriction>,
    /// Case-local type variables (visitor-encoded cases only).
    pub existentials: Vec<Name>,
    /// Externally visible type parameters: declaration parameters that are
    /// not restricted here, then the existentials.
    pub type_params: Vec<Name>,
}

impl DataConstructor {
    #[inline]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn argument(&self, name: Name) -> Option<&DataArgument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    pub fn restriction(&self, var: Name) -> Option<&TypeRestriction> {
        self.restrictions.iter().find(|r| r.var == var)
    }

    /// Whether this constructor narrows any declaration variable.
    pub fn is_restricted(&self) -> bool {
        !self.restrictions.is_empty()
    }

    /// The narrowing as a substitution (`var := ty` per restriction).
    pub fn restriction_subst(&self) -> Substitution {
        Substitution::from_pairs(self.restrictions.iter().map(|r| (r.var, r.ty.clone())))
    }

    /// `ty` as seen through a value built by this constructor.
    pub fn narrow(&self, ty: &TypeExpr) -> TypeExpr {
        if self.restrictions.is_empty() {
            return ty.clone();
        }
        substitute(ty, &self.restriction_subst())
    }

    /// Whether `arg` is the witness of one of the restrictions.
    pub fn is_witness(&self, arg: &DataArgument) -> bool {
        self.restrictions.iter().any(|r| r.witness.name == arg.name)
    }

    /// All declared case parameters, witnesses back in their positions.
    pub fn case_fields(&self) -> Vec<DataArgument> {
        let total = self.arguments.len() + self.restrictions.len();
        let mut plain = self.arguments.iter();
        let mut fields = Vec::with_capacity(total);
        for position in 0..total {
            let next = match self.restrictions.iter().find(|r| r.position == position) {
                Some(restriction) => Some(&restriction.witness),
                None => plain.next(),
            };
            fields.extend(next.cloned());
        }
        fields
    }
}

/// One case of the matcher, as it is (or would be) declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaseSignature {
    pub name: Name,
    pub span: Span,
    pub fields: Vec<DataArgument>,
    pub existentials: Vec<Name>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgebraicDataType {
    pub name: Name,
    pub span: Span,
    pub type_params: Vec<Name>,
    pub constructors: Vec<DataConstructor>,
    /// Name of the abstract matcher method.
    pub matcher: Name,
    /// The matcher's own result type variable.
    pub result_var: Name,
    pub encoding: MatcherEncoding,
}

impl AlgebraicDataType {
    /// The declared type applied to its own parameters.
    pub fn self_type(&self) -> TypeExpr {
        TypeExpr::con(
            self.name,
            self.type_params.iter().map(|&p| TypeExpr::var(p)).collect(),
        )
    }

    /// The type a value built by `ctor` has, after its restrictions.
    pub fn result_type(&self, ctor: &DataConstructor) -> TypeExpr {
        if ctor.restrictions.is_empty() {
            return self.self_type();
        }
        substitute(&self.self_type(), &ctor.restriction_subst())
    }

    /// Whether a field refers back to this ADT.
    pub fn is_recursive_argument(&self, arg: &DataArgument) -> bool {
        arg.ty.head() == Some(self.name)
    }

    /// Whether any constructor has a recursive field.
    pub fn is_recursive(&self) -> bool {
        self.constructors
            .iter()
            .flat_map(|c| &c.arguments)
            .any(|a| self.is_recursive_argument(a))
    }

    pub fn constructor(&self, name: Name) -> Option<&DataConstructor> {
        self.constructors.iter().find(|c| c.name == name)
    }

    #[inline]
    pub fn is_single_case(&self) -> bool {
        self.constructors.len() == 1
    }

    #[inline]
    pub fn is_parametric(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Whether any constructor carries a type restriction.
    pub fn has_restrictions(&self) -> bool {
        self.constructors.iter().any(DataConstructor::is_restricted)
    }

    /// Re-derive the matcher's case list from the model.
    pub fn matcher_signature(&self) -> Vec<CaseSignature> {
        self.constructors
            .iter()
            .map(|c| CaseSignature {
                name: c.name,
                span: c.span,
                fields: c.case_fields(),
                existentials: c.existentials.clone(),
            })
            .collect()
    }

    /// Field name -> per-constructor presence and type.
    pub fn field_index(&self) -> FieldIndex {
        FieldIndex::build(self)
    }
}
