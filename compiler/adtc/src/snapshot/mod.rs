//! Snapshot files: the host toolchain's declarations as JSON.
//!
//! ```json
//! {
//!   "path": "src/expr.java",
//!   "source": "...",
//!   "declarations": [{
//!     "name": "Expr", "span": [10, 14],
//!     "annotation": { "span": [0, 5], "derive": ["constructors"], "instances": ["Eq"] },
//!     "methods": [{
//!       "name": "match", "type_params": ["R"], "returns": "R",
//!       "params": [{ "name": "Const", "type": "fn(i32) -> R", "fields": ["value"] }]
//!     }]
//!   }],
//!   "interfaces": [],
//!   "providers": [{ "name": "Instances", "members": [
//!     { "kind": "field", "name": "int_eq", "type": "Eq<i32>" }
//!   ]}],
//!   "low_priority": []
//! }
//! ```
//!
//! Spans are `[start, end]` byte offsets into `source` and default to
//! `[0, 0]`. Named items (type parameters, annotation values) are either a
//! bare string or `{ "name": .., "span": .. }`.

mod types;

use std::path::Path;

use adt_ir::{
    AnnotationValue, DataAnnotation, DataDecl, InterfaceDecl, MethodDecl, Name, ParamDecl,
    ProviderSource, Snapshot, Span, StaticMember, StringInterner, TypeParam,
};
use serde::Deserialize;

use crate::{DriverError, DriverResult};

pub use types::parse_type;

type RawSpan = [u32; 2];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSnapshot {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    declarations: Vec<RawDeclaration>,
    #[serde(default)]
    interfaces: Vec<RawInterface>,
    #[serde(default)]
    providers: Vec<RawProvider>,
    #[serde(default)]
    low_priority: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNamed {
    Bare(String),
    Spanned {
        name: String,
        #[serde(default)]
        span: RawSpan,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnnotation {
    #[serde(default)]
    span: RawSpan,
    #[serde(default)]
    derive: Option<Vec<RawNamed>>,
    #[serde(default)]
    instances: Vec<RawNamed>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    name: String,
    #[serde(default)]
    span: RawSpan,
    #[serde(default)]
    type_params: Vec<RawNamed>,
    #[serde(default)]
    annotation: RawAnnotation,
    #[serde(default)]
    methods: Vec<RawMethod>,
    #[serde(default)]
    statics: Vec<RawStatic>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMethod {
    name: String,
    #[serde(default)]
    span: RawSpan,
    #[serde(default)]
    type_params: Vec<RawNamed>,
    #[serde(default)]
    params: Vec<RawParam>,
    returns: String,
    #[serde(rename = "abstract", default = "default_abstract")]
    is_abstract: bool,
}

fn default_abstract() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParam {
    name: String,
    #[serde(default)]
    span: RawSpan,
    #[serde(rename = "type")]
    ty: String,
    /// Field names of a function-typed case.
    #[serde(default)]
    fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInterface {
    name: String,
    #[serde(default)]
    span: RawSpan,
    #[serde(default)]
    type_params: Vec<RawNamed>,
    #[serde(default)]
    methods: Vec<RawMethod>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawStatic {
    Field {
        name: String,
        #[serde(default)]
        span: RawSpan,
        #[serde(rename = "type")]
        ty: String,
    },
    Method {
        name: String,
        #[serde(default)]
        span: RawSpan,
        #[serde(default)]
        type_params: Vec<RawNamed>,
        #[serde(default)]
        params: Vec<String>,
        returns: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProvider {
    name: String,
    #[serde(default)]
    span: RawSpan,
    #[serde(default)]
    members: Vec<RawStatic>,
}

/// Parse snapshot JSON.
pub fn load_snapshot(text: &str, interner: &StringInterner) -> DriverResult<Snapshot> {
    let raw: RawSnapshot = serde_json::from_str(text)?;
    Lowering { interner }.snapshot(raw)
}

/// Read and parse a snapshot file.
///
/// The file's own path stands in when the snapshot names no source path.
#[tracing::instrument(level = "debug", skip(interner))]
pub fn read_snapshot(path: &Path, interner: &StringInterner) -> DriverResult<Snapshot> {
    let text = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_owned(),
        source,
    })?;
    let mut snapshot = load_snapshot(&text, interner)?;
    if snapshot.path.is_none() {
        snapshot.path = Some(path.display().to_string());
    }
    tracing::debug!(
        declarations = snapshot.declarations.len(),
        interfaces = snapshot.interfaces.len(),
        providers = snapshot.providers.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

struct Lowering<'i> {
    interner: &'i StringInterner,
}

impl Lowering<'_> {
    fn snapshot(&self, raw: RawSnapshot) -> DriverResult<Snapshot> {
        Ok(Snapshot {
            path: raw.path,
            source: raw.source,
            declarations: raw
                .declarations
                .into_iter()
                .map(|d| self.declaration(d))
                .collect::<DriverResult<_>>()?,
            interfaces: raw
                .interfaces
                .into_iter()
                .map(|i| self.interface(i))
                .collect::<DriverResult<_>>()?,
            providers: raw
                .providers
                .into_iter()
                .map(|p| self.provider(p))
                .collect::<DriverResult<_>>()?,
            low_priority: raw
                .low_priority
                .iter()
                .map(|n| self.name(n))
                .collect::<DriverResult<_>>()?,
        })
    }

    fn name(&self, text: &str) -> DriverResult<Name> {
        Ok(self.interner.try_intern(text)?)
    }

    fn span(&self, [start, end]: RawSpan, owner: &str) -> DriverResult<Span> {
        if start > end {
            return Err(DriverError::Span {
                name: owner.to_owned(),
                start,
                end,
            });
        }
        Ok(Span::new(start, end))
    }

    fn named(&self, raw: &RawNamed) -> DriverResult<AnnotationValue<Name>> {
        match raw {
            RawNamed::Bare(name) => Ok(AnnotationValue {
                value: self.name(name)?,
                span: Span::DUMMY,
            }),
            RawNamed::Spanned { name, span } => Ok(AnnotationValue {
                value: self.name(name)?,
                span: self.span(*span, name)?,
            }),
        }
    }

    fn type_params(&self, raw: &[RawNamed]) -> DriverResult<Vec<TypeParam>> {
        raw.iter()
            .map(|p| {
                let named = self.named(p)?;
                Ok(TypeParam {
                    name: named.value,
                    span: named.span,
                })
            })
            .collect()
    }

    fn declaration(&self, raw: RawDeclaration) -> DriverResult<DataDecl> {
        let type_params = self.type_params(&raw.type_params)?;
        let scope: Vec<Name> = type_params.iter().map(|p| p.name).collect();
        let derive = match &raw.annotation.derive {
            Some(values) => Some(
                values
                    .iter()
                    .map(|v| self.named(v))
                    .collect::<DriverResult<_>>()?,
            ),
            None => None,
        };
        Ok(DataDecl {
            name: self.name(&raw.name)?,
            span: self.span(raw.span, &raw.name)?,
            methods: raw
                .methods
                .iter()
                .map(|m| self.method(m, &scope))
                .collect::<DriverResult<_>>()?,
            annotation: DataAnnotation {
                span: self.span(raw.annotation.span, &raw.name)?,
                derive,
                instances: raw
                    .annotation
                    .instances
                    .iter()
                    .map(|v| self.named(v))
                    .collect::<DriverResult<_>>()?,
            },
            statics: raw
                .statics
                .iter()
                .map(|s| self.static_member(s))
                .collect::<DriverResult<_>>()?,
            type_params,
        })
    }

    /// A method whose types see `outer` plus its own type parameters.
    fn method(&self, raw: &RawMethod, outer: &[Name]) -> DriverResult<MethodDecl> {
        let type_params = self.type_params(&raw.type_params)?;
        let mut scope = outer.to_vec();
        scope.extend(type_params.iter().map(|p| p.name));
        let params = raw
            .params
            .iter()
            .map(|p| {
                Ok(ParamDecl {
                    name: self.name(&p.name)?,
                    span: self.span(p.span, &p.name)?,
                    ty: parse_type(&p.ty, &scope, self.interner)?,
                    field_names: p
                        .fields
                        .iter()
                        .map(|f| self.name(f))
                        .collect::<DriverResult<_>>()?,
                })
            })
            .collect::<DriverResult<_>>()?;
        Ok(MethodDecl {
            name: self.name(&raw.name)?,
            span: self.span(raw.span, &raw.name)?,
            ret: parse_type(&raw.returns, &scope, self.interner)?,
            type_params,
            params,
            is_abstract: raw.is_abstract,
        })
    }

    fn interface(&self, raw: RawInterface) -> DriverResult<InterfaceDecl> {
        let type_params = self.type_params(&raw.type_params)?;
        let scope: Vec<Name> = type_params.iter().map(|p| p.name).collect();
        Ok(InterfaceDecl {
            name: self.name(&raw.name)?,
            span: self.span(raw.span, &raw.name)?,
            methods: raw
                .methods
                .iter()
                .map(|m| self.method(m, &scope))
                .collect::<DriverResult<_>>()?,
            type_params,
        })
    }

    fn static_member(&self, raw: &RawStatic) -> DriverResult<StaticMember> {
        match raw {
            RawStatic::Field { name, span, ty } => Ok(StaticMember::Field {
                name: self.name(name)?,
                span: self.span(*span, name)?,
                ty: parse_type(ty, &[], self.interner)?,
            }),
            RawStatic::Method {
                name,
                span,
                type_params,
                params,
                returns,
            } => {
                let type_params = self.type_params(type_params)?;
                let scope: Vec<Name> = type_params.iter().map(|p| p.name).collect();
                Ok(StaticMember::Method {
                    name: self.name(name)?,
                    span: self.span(*span, name)?,
                    params: params
                        .iter()
                        .map(|p| parse_type(p, &scope, self.interner))
                        .collect::<DriverResult<_>>()?,
                    ret: parse_type(returns, &scope, self.interner)?,
                    type_params,
                })
            }
        }
    }

    fn provider(&self, raw: RawProvider) -> DriverResult<ProviderSource> {
        Ok(ProviderSource {
            name: self.name(&raw.name)?,
            span: self.span(raw.span, &raw.name)?,
            members: raw
                .members
                .iter()
                .map(|m| self.static_member(m))
                .collect::<DriverResult<_>>()?,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
