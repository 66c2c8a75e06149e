use super::*;
use pretty_assertions::assert_eq;

const TERM: &str = r#"{
  "declarations": [{
    "name": "Term",
    "span": [40, 44],
    "type_params": [{ "name": "T", "span": [45, 46] }],
    "annotation": {
      "span": [0, 5],
      "derive": [{ "name": "constructors", "span": [7, 19] }],
      "instances": ["Eq"]
    },
    "methods": [{
      "name": "match",
      "type_params": ["R"],
      "returns": "R",
      "params": [
        { "name": "IntLit", "type": "fn(i32, fn(i32) -> T) -> R", "fields": ["value", "id"] },
        { "name": "If", "type": "fn(Term<bool>, Term<T>, Term<T>) -> R" }
      ]
    }]
  }],
  "providers": [{
    "name": "Instances",
    "members": [
      { "kind": "field", "name": "int_eq", "type": "Eq<i32>" },
      { "kind": "method", "name": "option_eq", "type_params": ["A"],
        "params": ["Eq<A>"], "returns": "Eq<Option<A>>" }
    ]
  }],
  "low_priority": ["Instances"]
}"#;

#[test]
fn declarations_are_lowered_with_scoped_variables() {
    let interner = StringInterner::new();
    let snapshot = load_snapshot(TERM, &interner).unwrap();
    let term = &snapshot.declarations[0];
    let t = interner.intern("T");
    let r = interner.intern("R");

    assert_eq!(term.span, Span::new(40, 44));
    assert_eq!(term.type_params[0].span, Span::new(45, 46));
    let derive = term.annotation.derive.as_ref().unwrap();
    assert_eq!(interner.lookup(derive[0].value), "constructors");
    assert_eq!(derive[0].span, Span::new(7, 19));
    assert_eq!(term.annotation.instances[0].span, Span::DUMMY);

    let matcher = &term.methods[0];
    assert!(matcher.is_abstract);
    assert_eq!(matcher.ret.as_var(), Some(r));
    let int_lit = &matcher.params[0];
    assert_eq!(
        int_lit.ty.display(&interner).to_string(),
        "fn(i32, fn(i32) -> T) -> R"
    );
    assert!(int_lit.ty.mentions(t));
    assert_eq!(
        int_lit
            .field_names
            .iter()
            .map(|n| interner.lookup(*n))
            .collect::<Vec<_>>(),
        vec!["value", "id"]
    );
    assert!(matcher.params[1].field_names.is_empty());
}

#[test]
fn providers_keep_member_order_and_priority() {
    let interner = StringInterner::new();
    let snapshot = load_snapshot(TERM, &interner).unwrap();
    let instances = interner.intern("Instances");
    assert!(snapshot.is_low_priority(instances));

    let members = &snapshot.providers[0].members;
    assert!(matches!(members[0], StaticMember::Field { .. }));
    let StaticMember::Method {
        type_params,
        params,
        ret,
        ..
    } = &members[1]
    else {
        panic!("expected a method, got {:?}", members[1]);
    };
    let a = type_params[0].name;
    assert!(params[0].mentions(a));
    assert_eq!(ret.display(&interner).to_string(), "Eq<Option<A>>");
}

#[test]
fn missing_derive_list_means_defaults() {
    let interner = StringInterner::new();
    let snapshot = load_snapshot(
        r#"{ "declarations": [{ "name": "Unit", "methods": [
            { "name": "match", "type_params": ["R"], "returns": "R",
              "params": [{ "name": "Unit", "type": "fn() -> R" }] }
        ] }] }"#,
        &interner,
    )
    .unwrap();
    assert_eq!(snapshot.declarations[0].annotation.derive, None);
    assert_eq!(snapshot.path, None);
}

#[test]
fn malformed_input_is_rejected() {
    let interner = StringInterner::new();
    let err = load_snapshot(r#"{ "declarations": 3 }"#, &interner).unwrap_err();
    assert!(matches!(err, DriverError::Json(_)), "{err}");

    let err = load_snapshot(r#"{ "declaration": [] }"#, &interner).unwrap_err();
    assert!(matches!(err, DriverError::Json(_)), "{err}");

    let err = load_snapshot(
        r#"{ "providers": [{ "name": "P", "members": [
            { "kind": "field", "name": "f", "type": "Eq<" }
        ] }] }"#,
        &interner,
    )
    .unwrap_err();
    assert!(matches!(err, DriverError::TypeSyntax { .. }), "{err}");

    let err = load_snapshot(r#"{ "declarations": [{ "name": "X", "span": [9, 2] }] }"#, &interner)
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid span [9, 2] on `X`");
}
