#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end runs: snapshot JSON through the pipeline to rendered modules
//! and reported diagnostics.

use adt_diagnostic::ErrorCode;
use adt_ir::{DerivationKind, StringInterner};
use adtc::{load_snapshot, report, DriverConfig, OutputFormat, Pipeline, RunOutput};
use pretty_assertions::assert_eq;

const EXPR_CASES: &str = r#"[
    { "name": "Const", "type": "fn(i32) -> R" },
    { "name": "Add", "type": "fn(Expr, Expr) -> R" },
    { "name": "Mult", "type": "fn(Expr, Expr) -> R" },
    { "name": "Neg", "type": "fn(Expr) -> R" }
]"#;

fn expr_snapshot(derive: &str, instances: &str, extra_decls: &str) -> String {
    format!(
        r#"{{
  "declarations": [{{
    "name": "Expr",
    "span": [30, 34],
    "annotation": {{ "span": [0, 5], "derive": {derive}, "instances": {instances} }},
    "methods": [{{ "name": "match", "type_params": ["R"], "returns": "R", "params": {EXPR_CASES} }}]
  }}{extra_decls}],
  "providers": [{{
    "name": "Instances",
    "members": [{{ "kind": "field", "name": "int_eq", "type": "Eq<i32>" }}]
  }}]
}}"#
    )
}

fn run(text: &str, config: &DriverConfig) -> RunOutput {
    let interner = StringInterner::new();
    let snapshot = load_snapshot(text, &interner).unwrap();
    Pipeline::new(&snapshot, &interner, config).run()
}

fn codes(run: &RunOutput) -> Vec<ErrorCode> {
    run.messages.iter().map(|m| m.code).collect()
}

#[test]
fn constructors_for_a_recursive_type() {
    let out = run(
        &expr_snapshot(r#"["constructors"]"#, "[]", ""),
        &DriverConfig::default(),
    );
    assert!(!out.has_errors());
    assert_eq!(out.modules.len(), 1);
    let module = out.module("Expr").unwrap();
    assert_eq!(module.file_stem, "expr");
    assert!(module.source.contains("pub enum Expr {"));
    assert!(module
        .source
        .contains("    pub fn add(expr1: Expr, expr2: Expr) -> Expr {\n"));
    assert!(!module.source.contains("trait ExprCases"));
}

#[test]
fn eq_instance_uses_the_provider() {
    let out = run(
        &expr_snapshot(r#"["constructors"]"#, r#"["Eq"]"#, ""),
        &DriverConfig::default(),
    );
    assert!(!out.has_errors(), "{:?}", out.messages);
    let source = &out.module("Expr").unwrap().source;
    assert!(source.contains("use std::sync::LazyLock;"));
    assert!(source.contains("EXPR_EQ"));
    assert!(source.contains("Instances::int_eq.eq(l0, r0)"));
}

#[test]
fn a_failing_declaration_does_not_stop_the_others() {
    let broken = r#", {
    "name": "Broken",
    "span": [60, 66],
    "annotation": { "span": [40, 45], "derive": [{ "name": "sideways", "span": [47, 55] }] },
    "methods": [{ "name": "match", "type_params": ["R"], "returns": "R",
                  "params": [{ "name": "Only", "type": "fn(i32) -> R" }] }]
  }"#;
    let out = run(
        &expr_snapshot(r#"["constructors"]"#, "[]", broken),
        &DriverConfig::default(),
    );
    assert!(out.has_errors());
    assert_eq!(codes(&out), vec![ErrorCode::E1011]);
    assert!(out.messages[0].text.contains("`sideways`"));
    assert!(out.module("Broken").is_none());
    assert!(out.module("Expr").is_some());
}

#[test]
fn missing_instance_fails_only_that_declaration() {
    let out = run(
        &expr_snapshot(r#"["constructors"]"#, r#"["Show"]"#, ""),
        &DriverConfig::default(),
    );
    assert_eq!(codes(&out), vec![ErrorCode::E2001]);
    assert!(out.modules.is_empty());
}

#[test]
fn annotations_without_a_list_use_the_configured_defaults() {
    let point = r#"{
  "declarations": [{
    "name": "Point",
    "methods": [{ "name": "match", "type_params": ["R"], "returns": "R", "params": [
      { "name": "Point", "type": "fn(i32, i32) -> R", "fields": ["x", "y"] }
    ] }]
  }]
}"#;
    let config = DriverConfig {
        derive_defaults: vec![DerivationKind::Getters],
        ..DriverConfig::default()
    };
    let out = run(point, &config);
    assert!(!out.has_errors());
    let source = &out.module("Point").unwrap().source;
    assert!(source.contains("get_x"));
    assert!(source.contains("get_y"));
    assert!(!source.contains("pub fn point("));
}

#[test]
fn warnings_keep_the_declaration() {
    let out = run(
        &expr_snapshot(r#"["constructors", "destructure"]"#, "[]", ""),
        &DriverConfig::default(),
    );
    assert!(!out.has_errors());
    assert_eq!(codes(&out), vec![ErrorCode::W3001]);
    assert_eq!(out.modules.len(), 1);
}

#[test]
fn json_report_lists_every_message() {
    let interner = StringInterner::new();
    let broken = r#", { "name": "Broken", "annotation": { "derive": ["sideways"] } }"#;
    let snapshot = load_snapshot(
        &expr_snapshot(r#"["destructure"]"#, "[]", broken),
        &interner,
    )
    .unwrap();
    let config = DriverConfig {
        format: OutputFormat::Json,
        ..DriverConfig::default()
    };
    let out = Pipeline::new(&snapshot, &interner, &config).run();

    let mut buffer = Vec::new();
    let summary = report(&out.messages, &snapshot, &config, &mut buffer, false);
    assert_eq!((summary.errors, summary.warnings), (1, 1));

    let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    let mut reported: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    reported.sort_unstable();
    assert_eq!(reported, vec!["E1011", "W3001"]);
}

#[test]
fn mapping_functions_stay_constructor_parameters() {
    let mapped = r#"{
  "declarations": [{
    "name": "Mapped",
    "type_params": [{ "name": "A" }, { "name": "B" }],
    "annotation": { "derive": ["constructors"] },
    "methods": [{ "name": "match", "type_params": ["R"], "returns": "R", "params": [
      { "name": "Mapped", "type": "fn(B, fn(B) -> A) -> R", "fields": ["source", "f"] },
      { "name": "Plain", "type": "fn(A, B) -> R", "fields": ["a", "b"] }
    ] }]
  }]
}"#;
    let out = run(mapped, &DriverConfig::default());
    assert!(!out.has_errors(), "{:?}", out.messages);
    let source = &out.module("Mapped").unwrap().source;
    assert!(source.contains("pub fn mapped<A, B>(source: B, f: Rc<dyn Fn(B) -> A>) -> Mapped<A, B> {"));
    assert!(!source.contains("Mapped<B, B>"));
}
