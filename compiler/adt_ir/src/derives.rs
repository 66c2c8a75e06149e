//! Derivation targets an annotation can request.

/// One kind of generated code for an algebraic data type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivationKind {
    /// Visitor trait plus lambda-accepting matcher.
    Matcher,
    /// One construction function per case.
    Constructors,
    /// Deferred construction of a value.
    Lazy,
    /// Per-case narrowed matchers (`is_x`, `if_x`).
    CaseOf,
    /// Tuple destructuring of a single-case type.
    Destructure,
    /// Field getters.
    Getters,
    /// Field setters and modifiers.
    Modifiers,
    /// Structural fold.
    Catamorphism,
    /// Struct whose methods construct each case.
    Factory,
}

impl DerivationKind {
    /// Every kind, in canonical order.
    pub const ALL: [DerivationKind; 9] = [
        DerivationKind::Matcher,
        DerivationKind::Constructors,
        DerivationKind::Lazy,
        DerivationKind::CaseOf,
        DerivationKind::Destructure,
        DerivationKind::Getters,
        DerivationKind::Modifiers,
        DerivationKind::Catamorphism,
        DerivationKind::Factory,
    ];

    /// Parse an annotation value into a `DerivationKind`.
    pub fn from_name(s: &str) -> Option<DerivationKind> {
        match s {
            "matcher" => Some(DerivationKind::Matcher),
            "constructors" => Some(DerivationKind::Constructors),
            "lazy" => Some(DerivationKind::Lazy),
            "case_of" => Some(DerivationKind::CaseOf),
            "destructure" => Some(DerivationKind::Destructure),
            "getters" => Some(DerivationKind::Getters),
            "modifiers" => Some(DerivationKind::Modifiers),
            "catamorphism" => Some(DerivationKind::Catamorphism),
            "factory" => Some(DerivationKind::Factory),
            _ => None,
        }
    }

    /// The annotation spelling of this kind.
    pub fn name(self) -> &'static str {
        match self {
            DerivationKind::Matcher => "matcher",
            DerivationKind::Constructors => "constructors",
            DerivationKind::Lazy => "lazy",
            DerivationKind::CaseOf => "case_of",
            DerivationKind::Destructure => "destructure",
            DerivationKind::Getters => "getters",
            DerivationKind::Modifiers => "modifiers",
            DerivationKind::Catamorphism => "catamorphism",
            DerivationKind::Factory => "factory",
        }
    }
}
