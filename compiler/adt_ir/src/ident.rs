//! Identifier spelling helpers shared by the model builder and synthesizer.

/// Convert `IntLit` / `intLit` / `HTTPCode` to `int_lit` / `int_lit` / `http_code`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert `int_lit` / `intLit` to `IntLit`; `self` becomes `Self_`.
pub fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    if cannot_be_raw(&out) {
        out.push('_');
    }
    out
}

/// Whether `name` is a reserved word in generated Rust code.
pub fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "yield"
    )
}

/// Keywords that stay reserved even as raw identifiers.
fn cannot_be_raw(name: &str) -> bool {
    matches!(name, "self" | "Self" | "super" | "crate")
}

/// Escape a keyword as a raw identifier (`const` -> `r#const`), or with a
/// trailing underscore where `r#` is not allowed (`self` -> `self_`).
pub fn escape_ident(name: &str) -> String {
    if cannot_be_raw(name) {
        format!("{name}_")
    } else if is_rust_keyword(name) {
        format!("r#{name}")
    } else {
        name.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("IntLit"), "int_lit");
        assert_eq!(snake_case("intLit"), "int_lit");
        assert_eq!(snake_case("HTTPCode"), "http_code");
        assert_eq!(snake_case("Const"), "const");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("Tuple2"), "tuple2");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("int_lit"), "IntLit");
        assert_eq!(pascal_case("Add"), "Add");
        assert_eq!(pascal_case("self"), "Self_");
        assert_eq!(pascal_case("Self"), "Self_");
    }

    #[test]
    fn test_escape_ident() {
        assert_eq!(escape_ident("const"), "r#const");
        assert_eq!(escape_ident("add"), "add");
    }

    #[test]
    fn path_keywords_get_a_suffix() {
        for keyword in ["self", "Self", "super", "crate"] {
            assert_eq!(escape_ident(keyword), format!("{keyword}_"));
        }
        assert_eq!(escape_ident(&snake_case("Super")), "super_");
    }
}
