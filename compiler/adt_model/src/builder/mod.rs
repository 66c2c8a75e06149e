//! Building an [`AlgebraicDataType`] from an annotated declaration.
//!
//! The declaration's single abstract method is the matcher. Its cases are
//! read either from function-typed parameters (lambda encoding) or from the
//! abstract methods of a visitor interface (visitor encoding), then checked
//! against the declaration's type parameters. Every failure is fatal for
//! the declaration and localized on the offending element.

use adt_diagnostic::{DeriveMessage, DeriveResult, ErrorCode, MessageLocalization};
use adt_ir::{
    DataDecl, InterfaceDecl, MethodDecl, Name, ParamDecl, Snapshot, Span, StringInterner,
    TypeExpr,
};
use adt_types::{resolve, substitute, unify, Substitution};

use crate::{
    derive_field_names, AlgebraicDataType, CaseSignature, DataArgument, DataConstructor,
    MatcherEncoding, TypeRestriction,
};

/// Build the ADT model of `decl`.
#[tracing::instrument(level = "debug", skip_all, fields(decl = interner.lookup(decl.name)))]
pub fn build_model(
    decl: &DataDecl,
    snapshot: &Snapshot,
    interner: &StringInterner,
) -> DeriveResult<AlgebraicDataType> {
    let builder = ModelBuilder {
        decl,
        snapshot,
        interner,
    };
    let adt = builder.build()?;
    tracing::debug!(
        constructors = adt.constructors.len(),
        restricted = adt.has_restrictions(),
        "built ADT model"
    );
    Ok(adt)
}

/// The matcher cases exactly as `decl` declares them.
pub fn declared_cases(
    decl: &DataDecl,
    snapshot: &Snapshot,
    interner: &StringInterner,
) -> DeriveResult<Vec<CaseSignature>> {
    let builder = ModelBuilder {
        decl,
        snapshot,
        interner,
    };
    let matcher = builder.matcher()?;
    let result_var = builder.result_var(matcher)?;
    let (_, cases) = builder.read_cases(matcher, result_var)?;
    Ok(cases)
}

struct ModelBuilder<'a> {
    decl: &'a DataDecl,
    snapshot: &'a Snapshot,
    interner: &'a StringInterner,
}

impl<'a> ModelBuilder<'a> {
    fn build(&self) -> DeriveResult<AlgebraicDataType> {
        let matcher = self.matcher()?;
        let result_var = self.result_var(matcher)?;
        let (encoding, cases) = self.read_cases(matcher, result_var)?;
        if cases.is_empty() {
            return Err(self.error(
                ErrorCode::E1012,
                matcher.span,
                format!("matcher `{}` declares no cases", self.lookup(matcher.name)),
            ));
        }
        self.check_unique_names(&cases)?;

        let constructors: Vec<DataConstructor> = cases
            .into_iter()
            .enumerate()
            .map(|(index, case)| self.constructor(index, case))
            .collect();
        self.check_type_params(&constructors)?;

        Ok(AlgebraicDataType {
            name: self.decl.name,
            span: self.decl.span,
            type_params: self.decl.type_params.iter().map(|p| p.name).collect(),
            constructors,
            matcher: matcher.name,
            result_var,
            encoding,
        })
    }

    fn lookup(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn display(&self, ty: &TypeExpr) -> String {
        ty.display(self.interner).to_string()
    }

    fn error(&self, code: ErrorCode, span: Span, text: String) -> DeriveMessage {
        DeriveMessage::at(
            code,
            text,
            MessageLocalization::on_declaration(self.decl.name, span),
        )
    }

    fn matcher(&self) -> DeriveResult<&'a MethodDecl> {
        let mut abstract_methods = self.decl.abstract_methods();
        match (abstract_methods.next(), abstract_methods.next()) {
            (Some(matcher), None) => Ok(matcher),
            (None, _) => Err(self.error(
                ErrorCode::E1001,
                self.decl.span,
                format!(
                    "`{}` declares no abstract matcher method",
                    self.lookup(self.decl.name)
                ),
            )),
            (Some(first), Some(second)) => {
                let extra = abstract_methods
                    .map(|m| MessageLocalization::on_declaration(self.decl.name, m.span));
                Err(self
                    .error(
                        ErrorCode::E1002,
                        first.span,
                        format!(
                            "`{}` declares more than one abstract method",
                            self.lookup(self.decl.name)
                        ),
                    )
                    .with_localization(MessageLocalization::on_declaration(
                        self.decl.name,
                        second.span,
                    ))
                    .with_localizations(extra))
            }
        }
    }

    fn result_var(&self, matcher: &MethodDecl) -> DeriveResult<Name> {
        let Some(var) = matcher.ret.as_var() else {
            return Err(self.error(
                ErrorCode::E1003,
                matcher.span,
                format!(
                    "matcher `{}` must return a type variable, found `{}`",
                    self.lookup(matcher.name),
                    self.display(&matcher.ret)
                ),
            ));
        };
        if !matcher.type_params.iter().any(|p| p.name == var) {
            return Err(self.error(
                ErrorCode::E1003,
                matcher.span,
                format!(
                    "matcher `{}` must be generic in its result type `{}`",
                    self.lookup(matcher.name),
                    self.lookup(var)
                ),
            ));
        }
        if self.decl.declares(var) {
            return Err(self.error(
                ErrorCode::E1003,
                matcher.span,
                format!(
                    "result type `{}` of matcher `{}` shadows a type parameter of `{}`",
                    self.lookup(var),
                    self.lookup(matcher.name),
                    self.lookup(self.decl.name)
                ),
            ));
        }
        Ok(var)
    }

    fn read_cases(
        &self,
        matcher: &MethodDecl,
        result_var: Name,
    ) -> DeriveResult<(MatcherEncoding, Vec<CaseSignature>)> {
        if let [param] = matcher.params.as_slice() {
            if let TypeExpr::Con { name, args } = &param.ty {
                if args.iter().any(|a| a.mentions(result_var)) {
                    let Some(interface) = self.snapshot.interface(*name) else {
                        return Err(self.error(
                            ErrorCode::E1009,
                            param.span,
                            format!("visitor interface `{}` is not in scope", self.lookup(*name)),
                        ));
                    };
                    let cases = self.visitor_cases(param, interface, args, result_var)?;
                    let encoding = MatcherEncoding::Visitor {
                        interface: *name,
                        param: param.name,
                    };
                    return Ok((encoding, cases));
                }
            }
        }
        let cases = matcher
            .params
            .iter()
            .map(|p| self.lambda_case(p, result_var))
            .collect::<DeriveResult<Vec<_>>>()?;
        Ok((MatcherEncoding::Lambdas, cases))
    }

    fn lambda_case(&self, param: &ParamDecl, result_var: Name) -> DeriveResult<CaseSignature> {
        let not_a_case = || {
            self.error(
                ErrorCode::E1004,
                param.span,
                format!(
                    "case `{}` must be a function returning `{}`, found `{}`",
                    self.lookup(param.name),
                    self.lookup(result_var),
                    self.display(&param.ty)
                ),
            )
        };
        let TypeExpr::Fn { params, ret } = &param.ty else {
            return Err(not_a_case());
        };
        if ret.as_var() != Some(result_var) {
            return Err(not_a_case());
        }

        let names = if param.field_names.is_empty() {
            derive_field_names(params, self.interner)
        } else if param.field_names.len() == params.len() {
            param.field_names.clone()
        } else {
            return Err(self.error(
                ErrorCode::E1008,
                param.span,
                format!(
                    "case `{}` names {} field(s) but takes {} argument(s)",
                    self.lookup(param.name),
                    param.field_names.len(),
                    params.len()
                ),
            ));
        };

        Ok(CaseSignature {
            name: param.name,
            span: param.span,
            fields: names
                .into_iter()
                .zip(params)
                .map(|(name, ty)| DataArgument {
                    name,
                    span: param.span,
                    ty: ty.clone(),
                })
                .collect(),
            existentials: Vec::new(),
        })
    }

    fn visitor_cases(
        &self,
        param: &ParamDecl,
        interface: &InterfaceDecl,
        args: &[TypeExpr],
        result_var: Name,
    ) -> DeriveResult<Vec<CaseSignature>> {
        if interface.type_params.len() != args.len() {
            return Err(self.error(
                ErrorCode::E1009,
                param.span,
                format!(
                    "visitor interface `{}` takes {} type argument(s), found {}",
                    self.lookup(interface.name),
                    interface.type_params.len(),
                    args.len()
                ),
            ));
        }
        let applied = Substitution::from_pairs(
            interface
                .type_params
                .iter()
                .map(|p| p.name)
                .zip(args.iter().cloned()),
        );

        interface
            .methods
            .iter()
            .filter(|m| m.is_abstract)
            .map(|method| {
                let existentials: Vec<Name> = method.type_params.iter().map(|p| p.name).collect();
                let local = applied.without(&existentials);
                let ret = substitute(&method.ret, &local);
                if ret.as_var() != Some(result_var) {
                    return Err(self.error(
                        ErrorCode::E1004,
                        method.span,
                        format!(
                            "case `{}` must return `{}`, found `{}`",
                            self.lookup(method.name),
                            self.lookup(result_var),
                            self.display(&ret)
                        ),
                    ));
                }
                Ok(CaseSignature {
                    name: method.name,
                    span: method.span,
                    fields: method
                        .params
                        .iter()
                        .map(|p| DataArgument {
                            name: p.name,
                            span: p.span,
                            ty: substitute(&p.ty, &local),
                        })
                        .collect(),
                    existentials,
                })
            })
            .collect()
    }

    fn check_unique_names(&self, cases: &[CaseSignature]) -> DeriveResult<()> {
        for (i, case) in cases.iter().enumerate() {
            if let Some(first) = cases[..i].iter().find(|c| c.name == case.name) {
                return Err(self
                    .error(
                        ErrorCode::E1007,
                        case.span,
                        format!("duplicate constructor `{}`", self.lookup(case.name)),
                    )
                    .with_localization(MessageLocalization::on_declaration(
                        self.decl.name,
                        first.span,
                    )));
            }
            for (j, field) in case.fields.iter().enumerate() {
                if case.fields[..j].iter().any(|f| f.name == field.name) {
                    return Err(self.error(
                        ErrorCode::E1010,
                        field.span,
                        format!(
                            "constructor `{}` has two fields named `{}`",
                            self.lookup(case.name),
                            self.lookup(field.name)
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    fn constructor(&self, index: usize, case: CaseSignature) -> DataConstructor {
        let mut restrictions: Vec<TypeRestriction> = Vec::new();
        let mut arguments = Vec::with_capacity(case.fields.len());
        for (position, field) in case.fields.iter().enumerate() {
            match self.witness(&case, position, field, &restrictions) {
                Some(restriction) => restrictions.push(restriction),
                None => arguments.push(field.clone()),
            }
        }
        for r in &restrictions {
            tracing::trace!(
                constructor = self.lookup(case.name),
                var = self.lookup(r.var),
                ty = %r.ty.display(self.interner),
                "type restriction"
            );
        }

        let type_params = self
            .decl
            .type_params
            .iter()
            .map(|p| p.name)
            .filter(|&p| !restrictions.iter().any(|r| r.var == p))
            .chain(case.existentials.iter().copied())
            .collect();

        DataConstructor {
            name: case.name,
            span: case.span,
            index,
            arguments,
            restrictions,
            existentials: case.existentials,
            type_params,
        }
    }

    /// Recognize `field` as a type-equality witness `fn(C) -> T`.
    ///
    /// `C` must be concrete in the declaration's scope: a bare variable or a
    /// type over the case's own variables makes `field` an ordinary function
    /// argument.
    fn witness(
        &self,
        case: &CaseSignature,
        position: usize,
        field: &DataArgument,
        found: &[TypeRestriction],
    ) -> Option<TypeRestriction> {
        let TypeExpr::Fn { params, ret } = &field.ty else {
            return None;
        };
        let ([input], Some(var)) = (params.as_slice(), ret.as_var()) else {
            return None;
        };
        if !self.decl.declares(var) || found.iter().any(|r| r.var == var) {
            return None;
        }
        let elsewhere = case
            .fields
            .iter()
            .enumerate()
            .any(|(i, f)| i != position && f.ty.mentions(var));
        if elsewhere {
            return None;
        }
        let subst = unify(&TypeExpr::var(var), input)?;
        let bound = resolve(&TypeExpr::var(var), &subst);
        if bound.as_var().is_some() || case.existentials.iter().any(|&e| bound.mentions(e)) {
            return None;
        }
        Some(TypeRestriction {
            var,
            ty: bound,
            witness: field.clone(),
            position,
        })
    }

    fn check_type_params(&self, constructors: &[DataConstructor]) -> DeriveResult<()> {
        let mut used: Vec<Name> = Vec::new();
        for ctor in constructors {
            for field in ctor.case_fields() {
                for var in field.ty.free_vars() {
                    if ctor.existentials.contains(&var) {
                        continue;
                    }
                    if !self.decl.declares(var) {
                        return Err(self.error(
                            ErrorCode::E1005,
                            field.span,
                            format!(
                                "type variable `{}` in constructor `{}` is not declared on `{}`",
                                self.lookup(var),
                                self.lookup(ctor.name),
                                self.lookup(self.decl.name)
                            ),
                        ));
                    }
                    if !used.contains(&var) {
                        used.push(var);
                    }
                }
            }
        }
        match self.decl.type_params.iter().find(|p| !used.contains(&p.name)) {
            Some(unused) => Err(self.error(
                ErrorCode::E1006,
                unused.span,
                format!(
                    "type parameter `{}` of `{}` is not used by any constructor",
                    self.lookup(unused.name),
                    self.lookup(self.decl.name)
                ),
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
