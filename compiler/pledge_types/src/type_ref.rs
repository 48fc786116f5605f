//! Resolved type references.

use std::fmt;

/// A resolved reference to a type, as stored on descriptors.
///
/// Unlike [`pledge_ir::ParsedType`], every name here has been checked
/// against the registry. Equality is structural: two references are
/// equal when their tags and payloads match, regardless of which
/// descriptor they were resolved through.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A (possibly optional) reference to a named type.
    Ref { name: String, optional: bool },

    /// A map from one named type to another.
    Map { key: String, value: String },

    /// A truncated (bounced) view of a message struct.
    Bounced { name: String },

    /// The absence of a value; the return type of a procedure.
    Void,
}

impl TypeRef {
    /// Non-optional reference to `name`.
    pub fn ref_to(name: impl Into<String>) -> Self {
        TypeRef::Ref {
            name: name.into(),
            optional: false,
        }
    }

    /// Optional reference to `name`.
    pub fn optional_ref_to(name: impl Into<String>) -> Self {
        TypeRef::Ref {
            name: name.into(),
            optional: true,
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Ref { name, optional } => {
                write!(f, "{name}{}", if *optional { "?" } else { "" })
            }
            TypeRef::Map { key, value } => write!(f, "map<{key}, {value}>"),
            TypeRef::Bounced { name } => write!(f, "bounced<{name}>"),
            TypeRef::Void => write!(f, "void"),
        }
    }
}
