//! Parsed (unresolved) type references.
//!
//! These are the type annotations exactly as the parser saw them: names
//! are not yet checked against the registry. Semantic resolution turns
//! them into resolved `TypeRef` values.

use std::fmt;

use crate::Span;

/// A type reference as written in source, before resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParsedType {
    /// A simple named reference: `Int`, `Wallet?`.
    Simple {
        name: String,
        optional: bool,
        span: Span,
    },

    /// A map from one named type to another: `map<Int, Wallet>`.
    Map {
        key: String,
        value: String,
        span: Span,
    },

    /// A truncated-message reference: `bounced<Transfer>`.
    Bounced { name: String, span: Span },
}

impl ParsedType {
    /// Source location of this reference.
    pub fn span(&self) -> Span {
        match self {
            ParsedType::Simple { span, .. }
            | ParsedType::Map { span, .. }
            | ParsedType::Bounced { span, .. } => *span,
        }
    }

    /// Convenience constructor for a non-optional simple reference.
    pub fn simple(name: impl Into<String>, span: Span) -> Self {
        ParsedType::Simple {
            name: name.into(),
            optional: false,
            span,
        }
    }

    /// Convenience constructor for an optional simple reference.
    pub fn optional(name: impl Into<String>, span: Span) -> Self {
        ParsedType::Simple {
            name: name.into(),
            optional: true,
            span,
        }
    }
}

impl fmt::Display for ParsedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedType::Simple { name, optional, .. } => {
                write!(f, "{name}{}", if *optional { "?" } else { "" })
            }
            ParsedType::Map { key, value, .. } => write!(f, "map<{key}, {value}>"),
            ParsedType::Bounced { name, .. } => write!(f, "bounced<{name}>"),
        }
    }
}
