//! Type expressions.
//!
//! A `TypeExpr` is the syntactic type of a field, parameter or static member
//! as the host toolchain reports it. Free variables are the type parameters
//! bound by the enclosing declaration or method.

use std::fmt;

use crate::{Name, StringInterner};

/// A type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeExpr {
    /// A type variable (`A`, `R`).
    Var(Name),
    /// A type constructor applied to arguments (`i32`, `Option<A>`).
    Con { name: Name, args: Vec<TypeExpr> },
    /// A function type (`fn(A, B) -> R`).
    Fn {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
}

impl TypeExpr {
    #[inline]
    pub fn var(name: Name) -> Self {
        TypeExpr::Var(name)
    }

    #[inline]
    pub fn con(name: Name, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Con { name, args }
    }

    /// A nullary type constructor.
    #[inline]
    pub fn atom(name: Name) -> Self {
        TypeExpr::Con {
            name,
            args: Vec::new(),
        }
    }

    pub fn func(params: Vec<TypeExpr>, ret: TypeExpr) -> Self {
        TypeExpr::Fn {
            params,
            ret: Box::new(ret),
        }
    }

    /// The variable name if this is a bare variable.
    #[inline]
    pub fn as_var(&self) -> Option<Name> {
        match self {
            TypeExpr::Var(name) => Some(*name),
            _ => None,
        }
    }

    /// The head constructor name of an applied type.
    #[inline]
    pub fn head(&self) -> Option<Name> {
        match self {
            TypeExpr::Con { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Free variables in first-occurrence order, without duplicates.
    pub fn free_vars(&self) -> Vec<Name> {
        let mut out = Vec::new();
        self.collect_free_vars(&mut out);
        out
    }

    fn collect_free_vars(&self, out: &mut Vec<Name>) {
        match self {
            TypeExpr::Var(name) => {
                if !out.contains(name) {
                    out.push(*name);
                }
            }
            TypeExpr::Con { args, .. } => {
                for arg in args {
                    arg.collect_free_vars(out);
                }
            }
            TypeExpr::Fn { params, ret } => {
                for param in params {
                    param.collect_free_vars(out);
                }
                ret.collect_free_vars(out);
            }
        }
    }

    /// Whether `var` occurs anywhere in this type.
    pub fn mentions(&self, var: Name) -> bool {
        match self {
            TypeExpr::Var(name) => *name == var,
            TypeExpr::Con { args, .. } => args.iter().any(|a| a.mentions(var)),
            TypeExpr::Fn { params, ret } => {
                params.iter().any(|p| p.mentions(var)) || ret.mentions(var)
            }
        }
    }

    /// Whether this type contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            TypeExpr::Var(_) => false,
            TypeExpr::Con { args, .. } => args.iter().all(TypeExpr::is_ground),
            TypeExpr::Fn { params, ret } => {
                params.iter().all(TypeExpr::is_ground) && ret.is_ground()
            }
        }
    }

    /// Number of non-variable nodes; a larger count means a more specific type.
    pub fn concrete_nodes(&self) -> u32 {
        match self {
            TypeExpr::Var(_) => 0,
            TypeExpr::Con { args, .. } => 1 + args.iter().map(TypeExpr::concrete_nodes).sum::<u32>(),
            TypeExpr::Fn { params, ret } => {
                1 + params.iter().map(TypeExpr::concrete_nodes).sum::<u32>() + ret.concrete_nodes()
            }
        }
    }

    /// Type constructor names in first-occurrence order.
    pub fn constructors(&self) -> Vec<Name> {
        fn walk(ty: &TypeExpr, out: &mut Vec<Name>) {
            match ty {
                TypeExpr::Var(_) => {}
                TypeExpr::Con { name, args } => {
                    if !out.contains(name) {
                        out.push(*name);
                    }
                    for arg in args {
                        walk(arg, out);
                    }
                }
                TypeExpr::Fn { params, ret } => {
                    for param in params {
                        walk(param, out);
                    }
                    walk(ret, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    /// Render with names looked up in `interner`.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, interner }
    }
}

/// Display adapter for [`TypeExpr`].
///
/// `TupleN` constructors with `N` arguments print as `(A, B)`.
pub struct TypeDisplay<'a> {
    ty: &'a TypeExpr,
    interner: &'a StringInterner,
}

impl TypeDisplay<'_> {
    fn write_list(&self, f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item.display(self.interner))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            TypeExpr::Var(name) => f.write_str(self.interner.lookup(*name)),
            TypeExpr::Con { name, args } => {
                let text = self.interner.lookup(*name);
                if args.is_empty() {
                    return f.write_str(text);
                }
                if is_tuple_name(text, args.len()) {
                    f.write_str("(")?;
                    self.write_list(f, args)?;
                    return f.write_str(")");
                }
                write!(f, "{text}<")?;
                self.write_list(f, args)?;
                f.write_str(">")
            }
            TypeExpr::Fn { params, ret } => {
                f.write_str("fn(")?;
                self.write_list(f, params)?;
                write!(f, ") -> {}", ret.display(self.interner))
            }
        }
    }
}

/// Whether `name` is the tuple constructor for `arity` elements.
pub fn is_tuple_name(name: &str, arity: usize) -> bool {
    arity >= 2 && name.strip_prefix("Tuple") == Some(arity.to_string().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn free_vars_in_first_occurrence_order() {
        let interner = StringInterner::new();
        let a = interner.intern("A");
        let b = interner.intern("B");
        let map = interner.intern("Map");
        let ty = TypeExpr::func(
            vec![TypeExpr::con(map, vec![TypeExpr::var(b), TypeExpr::var(a)])],
            TypeExpr::var(b),
        );
        assert_eq!(ty.free_vars(), vec![b, a]);
        assert!(ty.mentions(a));
        assert!(!ty.is_ground());
    }

    #[test]
    fn concrete_nodes_rank_specificity() {
        let interner = StringInterner::new();
        let option = interner.intern("Option");
        let int = TypeExpr::atom(interner.intern("i32"));
        let generic = TypeExpr::con(option, vec![TypeExpr::var(interner.intern("A"))]);
        let concrete = TypeExpr::con(option, vec![int]);
        assert!(concrete.concrete_nodes() > generic.concrete_nodes());
    }

    #[test]
    fn display_renders_applied_function_and_tuple_types() {
        let interner = StringInterner::new();
        let a = TypeExpr::var(interner.intern("A"));
        let r = TypeExpr::var(interner.intern("R"));
        let option = TypeExpr::con(interner.intern("Option"), vec![a.clone()]);
        let pair = TypeExpr::con(interner.intern("Tuple2"), vec![a.clone(), option.clone()]);
        assert_eq!(option.display(&interner).to_string(), "Option<A>");
        assert_eq!(pair.display(&interner).to_string(), "(A, Option<A>)");
        assert_eq!(
            TypeExpr::func(vec![a, option], r).display(&interner).to_string(),
            "fn(A, Option<A>) -> R"
        );
    }

    #[test]
    fn constructors_are_deduplicated() {
        let interner = StringInterner::new();
        let list = interner.intern("List");
        let int = interner.intern("i32");
        let ty = TypeExpr::con(
            list,
            vec![TypeExpr::con(list, vec![TypeExpr::atom(int)])],
        );
        assert_eq!(ty.constructors(), vec![list, int]);
    }
}
