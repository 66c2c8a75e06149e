//! Type strings in snapshot files.
//!
//! ```text
//! type  := "fn" "(" [type ("," type)*] ")" "->" type
//!        | "(" type ")"
//!        | "(" type ("," type)+ ")"          // TupleN<..>
//!        | ident ["<" type ("," type)* ">"]
//! ident := segment ("::" segment)*
//! ```
//!
//! An identifier that names a type parameter in scope is a variable;
//! everything else is a constructor.

use adt_ir::{Name, StringInterner, TypeExpr};

use crate::{DriverError, DriverResult};

/// Parse `text` with `scope` as the type parameters in scope.
pub fn parse_type(text: &str, scope: &[Name], interner: &StringInterner) -> DriverResult<TypeExpr> {
    let mut parser = TypeParser {
        text,
        pos: 0,
        scope,
        interner,
    };
    let ty = parser.ty()?;
    parser.skip_ws();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct TypeParser<'t, 's> {
    text: &'t str,
    pos: usize,
    scope: &'s [Name],
    interner: &'s StringInterner,
}

impl<'t> TypeParser<'t, '_> {
    fn error(&self, message: &str) -> DriverError {
        DriverError::TypeSyntax {
            text: self.text.to_owned(),
            offset: self.pos,
            message: message.to_owned(),
        }
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    /// Consume `token` after optional whitespace.
    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> DriverResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{token}`")))
        }
    }

    fn ty(&mut self) -> DriverResult<TypeExpr> {
        self.skip_ws();
        if self.rest().starts_with('(') {
            return self.parenthesized();
        }
        let ident = self.ident()?;
        if ident == "fn" && self.rest().trim_start().starts_with('(') {
            return self.function();
        }
        let name = self.interner.try_intern(ident)?;
        if self.eat("<") {
            let args = self.list(">")?;
            if args.is_empty() {
                return Err(self.error("empty type argument list"));
            }
            return Ok(TypeExpr::con(name, args));
        }
        if self.scope.contains(&name) {
            Ok(TypeExpr::var(name))
        } else {
            Ok(TypeExpr::atom(name))
        }
    }

    fn function(&mut self) -> DriverResult<TypeExpr> {
        self.expect("(")?;
        let params = self.list(")")?;
        self.expect("->")?;
        let ret = self.ty()?;
        Ok(TypeExpr::func(params, ret))
    }

    fn parenthesized(&mut self) -> DriverResult<TypeExpr> {
        self.expect("(")?;
        let mut items = self.list(")")?;
        match items.len() {
            0 => Err(self.error("empty parentheses")),
            1 => Ok(items.remove(0)),
            n => {
                let tuple = self.interner.try_intern(&format!("Tuple{n}"))?;
                Ok(TypeExpr::con(tuple, items))
            }
        }
    }

    /// Comma-separated types up to and including `close`.
    fn list(&mut self, close: &str) -> DriverResult<Vec<TypeExpr>> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.ty()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(",")?;
        }
    }

    fn ident(&mut self) -> DriverResult<&'t str> {
        self.skip_ws();
        let start = self.pos;
        loop {
            let segment = self
                .rest()
                .char_indices()
                .take_while(|&(i, c)| {
                    c == '_' || (c.is_alphanumeric() && (i > 0 || !c.is_numeric()))
                })
                .map(|(i, c)| i + c.len_utf8())
                .last()
                .unwrap_or(0);
            if segment == 0 {
                return Err(self.error("expected a type name"));
            }
            self.pos += segment;
            if self.rest().starts_with("::") {
                self.pos += 2;
            } else {
                break;
            }
        }
        let text: &'t str = self.text;
        Ok(&text[start..self.pos])
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn show(text: &str, scope: &[&str]) -> String {
        let interner = StringInterner::new();
        let scope: Vec<Name> = scope.iter().map(|s| interner.intern(s)).collect();
        let ty = parse_type(text, &scope, &interner).unwrap();
        ty.display(&interner).to_string()
    }

    #[test]
    fn scope_decides_variables() {
        let interner = StringInterner::new();
        let t = interner.intern("T");
        let var = parse_type("T", &[t], &interner).unwrap();
        assert_eq!(var.as_var(), Some(t));
        let atom = parse_type("T", &[], &interner).unwrap();
        assert_eq!(atom.as_var(), None);
        assert_eq!(atom.head(), Some(t));
    }

    #[test]
    fn applications_functions_and_tuples() {
        assert_eq!(show("Option<Term<T>>", &["T"]), "Option<Term<T>>");
        assert_eq!(show("fn(i32, Expr) -> R", &["R"]), "fn(i32, Expr) -> R");
        assert_eq!(show("fn() -> R", &["R"]), "fn() -> R");
        assert_eq!(show("(A, B)", &["A", "B"]), "(A, B)");
        assert_eq!(show("( i32 )", &[]), "i32");
        assert_eq!(show("std::rc::Rc<Expr>", &[]), "std::rc::Rc<Expr>");
    }

    #[test]
    fn errors_carry_the_offset() {
        let interner = StringInterner::new();
        let err = parse_type("Option<i32", &[], &interner).unwrap_err();
        let DriverError::TypeSyntax { offset, message, .. } = &err else {
            panic!("expected a syntax error, got {err:?}");
        };
        assert_eq!(*offset, 10);
        assert_eq!(message, "expected `,`");

        for bad in ["", "Option<>", "i32 i64", "fn(i32) R", "()", "9lives"] {
            assert!(parse_type(bad, &[], &interner).is_err(), "{bad}");
        }
    }
}
