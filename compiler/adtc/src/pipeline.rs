//! The per-declaration pipeline: model, derivations, instances, rendering.
//!
//! Declarations are independent. A fatal message stops only the
//! declaration that raised it; nothing is rendered for that declaration and
//! the run carries on with the next one.

use adt_codegen::{derive_instances, generate, render_module, GeneratorRegistry, SynthContext};
use adt_diagnostic::{DeriveMessage, DeriveResult, ErrorCode, MessageLocalization};
use adt_ir::{DataDecl, DerivationKind, Snapshot, StringInterner};
use adt_model::build_model;

use crate::DriverConfig;

/// The rendered module of one declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Rust name of the generated type.
    pub type_name: String,
    /// `snake_case` file stem for `-o` output.
    pub file_stem: String,
    pub source: String,
}

/// A successful declaration: its module plus infos and warnings.
#[derive(Clone, Debug)]
pub struct DeclarationOutput {
    pub module: GeneratedModule,
    pub messages: Vec<DeriveMessage>,
}

/// Everything a run produced, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    pub modules: Vec<GeneratedModule>,
    /// Fatal messages of failed declarations interleaved with the infos and
    /// warnings of successful ones.
    pub messages: Vec<DeriveMessage>,
}

impl RunOutput {
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(DeriveMessage::is_fatal)
    }

    pub fn module(&self, type_name: &str) -> Option<&GeneratedModule> {
        self.modules.iter().find(|m| m.type_name == type_name)
    }

    /// All modules in one text, separated by a blank line.
    pub fn combined_source(&self) -> String {
        let sources: Vec<&str> = self.modules.iter().map(|m| m.source.as_str()).collect();
        sources.join("\n")
    }
}

pub struct Pipeline<'a> {
    snapshot: &'a Snapshot,
    interner: &'a StringInterner,
    config: &'a DriverConfig,
    registry: GeneratorRegistry,
}

impl<'a> Pipeline<'a> {
    /// A pipeline using the built-in instance generators.
    pub fn new(
        snapshot: &'a Snapshot,
        interner: &'a StringInterner,
        config: &'a DriverConfig,
    ) -> Self {
        Pipeline {
            snapshot,
            interner,
            config,
            registry: GeneratorRegistry::with_builtins(),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Run every declaration of the snapshot.
    pub fn run(&self) -> RunOutput {
        let mut out = RunOutput::default();
        for decl in &self.snapshot.declarations {
            match self.derive_declaration(decl) {
                Ok(done) => {
                    out.messages.extend(done.messages);
                    out.modules.push(done.module);
                }
                Err(message) => {
                    tracing::debug!(
                        decl = self.interner.lookup(decl.name),
                        code = %message.code,
                        "declaration failed"
                    );
                    out.messages.push(message);
                }
            }
        }
        out
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(decl = self.interner.lookup(decl.name))
    )]
    pub fn derive_declaration(&self, decl: &DataDecl) -> DeriveResult<DeclarationOutput> {
        let kinds = self.requested_kinds(decl)?;
        let adt = build_model(decl, self.snapshot, self.interner)?;
        let cx = SynthContext::new(&adt, self.interner, decl.annotation.span);
        let mut spec = generate(&cx, &kinds)?;
        spec.append(derive_instances(&cx, decl, self.snapshot, &self.registry)?);
        let source = render_module(&adt, &spec, self.interner);
        tracing::debug!(
            types = spec.types.len(),
            functions = spec.methods.len(),
            instances = spec.fields.len(),
            "rendered"
        );

        let mut messages = spec.infos;
        messages.extend(spec.warnings);
        Ok(DeclarationOutput {
            module: GeneratedModule {
                type_name: cx.type_name(),
                file_stem: cx.snake_name(),
                source,
            },
            messages,
        })
    }

    /// The annotation's derivations, or the configured defaults when it
    /// lists none.
    fn requested_kinds(&self, decl: &DataDecl) -> DeriveResult<Vec<DerivationKind>> {
        let Some(values) = &decl.annotation.derive else {
            return Ok(self.config.derive_defaults.clone());
        };
        values
            .iter()
            .map(|value| {
                let name = self.interner.lookup(value.value);
                DerivationKind::from_name(name).ok_or_else(|| {
                    let known: Vec<&str> =
                        DerivationKind::ALL.iter().map(|k| k.name()).collect();
                    DeriveMessage::at(
                        ErrorCode::E1011,
                        format!(
                            "unknown derivation `{name}` on `{}` (known: {})",
                            self.interner.lookup(decl.name),
                            known.join(", ")
                        ),
                        MessageLocalization::on_annotation_value(
                            decl.name,
                            decl.annotation.span,
                            value.span,
                        ),
                    )
                })
            })
            .collect()
    }
}
