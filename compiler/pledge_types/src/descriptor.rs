//! Resolved descriptors.
//!
//! One descriptor per declaration, distinct from its syntax node.
//! Descriptors are created empty at registry time, filled in additively
//! by the pipeline stages, and become immutable once published into the
//! [`crate::CompilerContext`]. Cross-descriptor references (`traits`,
//! `depends_on`) are stored as type names and resolved through the
//! context, so a descriptor never owns another.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use pledge_ir::ast::{self, TypeOrigin};
use pledge_ir::Span;
use smallvec::SmallVec;

use crate::{AbiType, TypeRef};

/// The four kinds of declared types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Struct,
    Contract,
    Trait,
}

impl TypeKind {
    #[inline]
    pub fn is_contract(self) -> bool {
        matches!(self, TypeKind::Contract)
    }

    #[inline]
    pub fn is_trait(self) -> bool {
        matches!(self, TypeKind::Trait)
    }

    #[inline]
    pub fn is_struct(self) -> bool {
        matches!(self, TypeKind::Struct)
    }

    #[inline]
    pub fn is_primitive(self) -> bool {
        matches!(self, TypeKind::Primitive)
    }
}

/// A fully resolved type: primitive, struct, trait or contract.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDescription {
    pub kind: TypeKind,
    pub origin: TypeOrigin,
    pub name: String,
    /// Compact 16-bit identifier, collision-resolved at registry time.
    pub uid: u16,
    /// Fields in declaration order; `index` is stable.
    pub fields: Vec<FieldDescription>,
    /// Flattened trait names, discovery order.
    pub traits: Vec<String>,
    /// Functions owned by this type, including trait copies.
    pub functions: BTreeMap<String, FunctionDescription>,
    /// Message handlers, including trait copies.
    pub receivers: Vec<ReceiverDescription>,
    /// Constants in declaration order, names disjoint from `fields`.
    pub constants: Vec<ConstantDescription>,
    /// Interface tags, declared directly or contributed by traits.
    pub interfaces: Vec<String>,
    /// Contract names this type may instantiate, transitively closed.
    pub depends_on: Vec<String>,
    /// Constructor; present on every resolved contract.
    pub init: Option<InitDescription>,
    /// Longest field prefix recoverable from a bounced message.
    pub partial_fields: Vec<FieldDescription>,
    /// The declaration this descriptor was resolved from.
    pub ast: Arc<ast::TypeDecl>,
}

impl TypeDescription {
    /// Look up an own field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up an own constant by name.
    pub fn constant(&self, name: &str) -> Option<&ConstantDescription> {
        self.constants.iter().find(|c| c.name == name)
    }

    /// Whether this is a struct declared as a message (wire header tag).
    pub fn is_message(&self) -> bool {
        matches!(&*self.ast, ast::TypeDecl::Struct(s) if s.message)
    }
}

/// A resolved field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescription {
    pub name: String,
    pub ty: TypeRef,
    /// Position in declaration order.
    pub index: usize,
    /// Resolved default value, if the declaration had one.
    pub default: Option<Value>,
    /// Raw serialization hint from the `as` clause.
    pub serialization: Option<String>,
    /// Resolved on-wire shape.
    pub abi: AbiType,
    pub span: Span,
}

/// A resolved constant.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantDescription {
    pub name: String,
    pub ty: TypeRef,
    pub value: Value,
    pub span: Span,
}

/// A resolved literal value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i128),
    Bool(bool),
    Str(String),
    /// A raw address in its friendly textual form.
    Address(String),
    /// An opaque cell payload, base64-encoded.
    Cell(String),
    Null,
}

bitflags! {
    /// Function modifier set, checked by the resolution rule table.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u8 {
        /// Callable from other contracts.
        const PUBLIC = 1 << 0;
        /// Off-chain read accessor.
        const GETTER = 1 << 1;
        /// May change `self`; forced on for every type-bound function.
        const MUTATING = 1 << 2;
        /// Trait function a deriving contract may replace.
        const VIRTUAL = 1 << 3;
        /// Contract function replacing a trait original.
        const OVERRIDES = 1 << 4;
        /// Inlined at call sites by codegen.
        const INLINE = 1 << 5;
    }
}

/// A resolved function argument.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionArg {
    pub name: String,
    pub ty: TypeRef,
    pub span: Span,
}

/// A resolved function, free or owned by a type.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDescription {
    pub name: String,
    /// Owning type name; `None` for free (static) functions.
    pub owner: Option<String>,
    pub origin: TypeOrigin,
    pub args: SmallVec<[FunctionArg; 4]>,
    pub returns: TypeRef,
    pub flags: FunctionFlags,
    pub ast: Arc<ast::FunctionDecl>,
}

impl FunctionDescription {
    #[inline]
    pub fn is_getter(&self) -> bool {
        self.flags.contains(FunctionFlags::GETTER)
    }

    #[inline]
    pub fn is_mutating(&self) -> bool {
        self.flags.contains(FunctionFlags::MUTATING)
    }

    #[inline]
    pub fn is_overrides(&self) -> bool {
        self.flags.contains(FunctionFlags::OVERRIDES)
    }
}

/// A resolved contract constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct InitDescription {
    pub args: SmallVec<[FunctionArg; 4]>,
    pub ast: Arc<ast::InitDecl>,
}

/// A resolved message handler.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiverDescription {
    pub selector: ReceiverSelector,
    pub ast: Arc<ast::ReceiverDecl>,
}

/// The dispatch selector a receiver was classified into.
///
/// `binding` is the argument name the handler body sees; it plays no
/// part in dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum ReceiverSelector {
    /// Internal message of a specific message-struct type.
    InternalBinary { binding: String, ty: String },
    /// Internal message whose comment text matches a literal.
    InternalComment { comment: String },
    /// Internal message with any comment text.
    InternalCommentFallback { binding: String },
    /// Catch-all raw handler for internal messages.
    InternalFallback { binding: String },
    /// Internal message with an empty body.
    InternalEmpty,
    /// Bounced message: raw (`ty` is a plain reference) or a truncated
    /// view of a specific message struct (`ty` is `Bounced`).
    InternalBounce { binding: String, ty: TypeRef },
    /// External counterparts, resolvable only when enabled by config.
    ExternalBinary { binding: String, ty: String },
    ExternalComment { comment: String },
    ExternalCommentFallback { binding: String },
    ExternalFallback { binding: String },
    ExternalEmpty,
}

impl ReceiverSelector {
    /// Whether two selectors occupy the same dispatch slot.
    ///
    /// Comment selectors compare literal text, binary/bounce selectors
    /// compare the named type, everything else compares kind only.
    pub fn same_dispatch(&self, other: &ReceiverSelector) -> bool {
        use ReceiverSelector as S;
        match (self, other) {
            (S::InternalBinary { ty: a, .. }, S::InternalBinary { ty: b, .. })
            | (S::ExternalBinary { ty: a, .. }, S::ExternalBinary { ty: b, .. }) => a == b,
            (S::InternalComment { comment: a }, S::InternalComment { comment: b })
            | (S::ExternalComment { comment: a }, S::ExternalComment { comment: b }) => a == b,
            (S::InternalBounce { ty: a, .. }, S::InternalBounce { ty: b, .. }) => a == b,
            (S::InternalCommentFallback { .. }, S::InternalCommentFallback { .. })
            | (S::ExternalCommentFallback { .. }, S::ExternalCommentFallback { .. })
            | (S::InternalFallback { .. }, S::InternalFallback { .. })
            | (S::ExternalFallback { .. }, S::ExternalFallback { .. })
            | (S::InternalEmpty, S::InternalEmpty)
            | (S::ExternalEmpty, S::ExternalEmpty) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ReceiverSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ReceiverSelector as S;
        match self {
            S::InternalBinary { ty, .. } => write!(f, "internal-binary({ty})"),
            S::InternalComment { comment } => write!(f, "internal-comment(\"{comment}\")"),
            S::InternalCommentFallback { .. } => write!(f, "internal-comment-fallback"),
            S::InternalFallback { .. } => write!(f, "internal-fallback"),
            S::InternalEmpty => write!(f, "internal-empty"),
            S::InternalBounce { ty, .. } => write!(f, "internal-bounce({ty})"),
            S::ExternalBinary { ty, .. } => write!(f, "external-binary({ty})"),
            S::ExternalComment { comment } => write!(f, "external-comment(\"{comment}\")"),
            S::ExternalCommentFallback { .. } => write!(f, "external-comment-fallback"),
            S::ExternalFallback { .. } => write!(f, "external-fallback"),
            S::ExternalEmpty => write!(f, "external-empty"),
        }
    }
}
