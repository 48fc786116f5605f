//! AST node types.
//!
//! One node per source declaration form. Every node carries a `Span` so
//! diagnostics can point back at the offending source. Nodes are plain
//! owned data; semantic resolution keeps `Arc` handles to the ones it
//! needs for later passes (function bodies, receivers, init).

use crate::{ParsedType, Span};

/// A parsed compilation unit: all top-level declarations of a program,
/// prelude included, in declaration order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Module {
    pub types: Vec<TypeDecl>,
    pub functions: Vec<FunctionDecl>,
    pub constants: Vec<ConstDecl>,
}

/// Which package a declaration came from.
///
/// The driver concatenates the standard library with user sources into
/// one module; origin lets later passes keep them apart (codegen
/// ordering, ABI reports).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeOrigin {
    Stdlib,
    User,
}

/// A top-level type declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDecl {
    Primitive(PrimitiveDecl),
    Struct(StructDecl),
    Contract(ContractDecl),
    Trait(TraitDecl),
}

impl TypeDecl {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Primitive(d) => &d.name,
            TypeDecl::Struct(d) => &d.name,
            TypeDecl::Contract(d) => &d.name,
            TypeDecl::Trait(d) => &d.name,
        }
    }

    /// Source location of the declaration.
    pub fn span(&self) -> Span {
        match self {
            TypeDecl::Primitive(d) => d.span,
            TypeDecl::Struct(d) => d.span,
            TypeDecl::Contract(d) => d.span,
            TypeDecl::Trait(d) => d.span,
        }
    }

    /// Which package the declaration came from.
    pub fn origin(&self) -> TypeOrigin {
        match self {
            TypeDecl::Primitive(d) => d.origin,
            TypeDecl::Struct(d) => d.origin,
            TypeDecl::Contract(d) => d.origin,
            TypeDecl::Trait(d) => d.origin,
        }
    }
}

/// A builtin primitive declaration (prelude only): `primitive Int;`.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveDecl {
    pub name: String,
    pub origin: TypeOrigin,
    pub span: Span,
}

/// A struct or message declaration.
///
/// `message` structs carry a numeric header tag on the wire and are the
/// only struct kind receivers may bind to.
#[derive(Clone, Debug, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub message: bool,
    pub fields: Vec<FieldDecl>,
    pub origin: TypeOrigin,
    pub span: Span,
}

/// A contract declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractDecl {
    pub name: String,
    /// Trait names from the `with` clause, in source order.
    pub traits: Vec<Ident>,
    pub attributes: Vec<TypeAttribute>,
    pub declarations: Vec<Item>,
    pub origin: TypeOrigin,
    pub span: Span,
}

/// A trait declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct TraitDecl {
    pub name: String,
    /// Trait names from the `with` clause, in source order.
    pub traits: Vec<Ident>,
    pub attributes: Vec<TypeAttribute>,
    pub declarations: Vec<Item>,
    pub origin: TypeOrigin,
    pub span: Span,
}

/// An attribute attached to a contract or trait declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAttribute {
    /// `@interface("...")` — a published interface tag.
    Interface { name: StringLit, span: Span },
}

/// A declaration inside a contract or trait body.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Field(FieldDecl),
    Constant(ConstDecl),
    Function(FunctionDecl),
    Init(InitDecl),
    Receiver(ReceiverDecl),
}

/// A field declaration: `balance: Int as coins = 0;`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: ParsedType,
    /// Default value expression, if any.
    pub init: Option<Expr>,
    /// Serialization hint from the `as` clause.
    pub serialization: Option<String>,
    pub span: Span,
}

/// A constant declaration, free or inside a contract/trait.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: ParsedType,
    pub value: Expr,
    pub span: Span,
}

/// A function declaration, free or inside a contract/trait.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub attributes: Vec<FunctionAttribute>,
    pub args: Vec<Param>,
    pub returns: Option<ParsedType>,
    pub body: FunctionBody,
    pub origin: TypeOrigin,
    pub span: Span,
}

impl FunctionDecl {
    /// Whether this is a native (VM-builtin-backed) function.
    pub fn is_native(&self) -> bool {
        matches!(self.body, FunctionBody::Native { .. })
    }

    /// Find an attribute of the given kind.
    pub fn attribute(&self, kind: FunctionAttributeKind) -> Option<&FunctionAttribute> {
        self.attributes.iter().find(|a| a.kind == kind)
    }
}

/// The body of a function declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    /// Ordinary function with statements.
    Block(Vec<Stmt>),
    /// Native function bound to a VM builtin by name.
    Native { builtin: String },
}

/// A single function modifier with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionAttribute {
    pub kind: FunctionAttributeKind,
    pub span: Span,
}

/// The fixed set of function modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionAttributeKind {
    Public,
    Getter,
    Mutating,
    Extends,
    Virtual,
    Overrides,
    Inline,
}

/// A function or init argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: ParsedType,
    pub span: Span,
}

/// A contract `init` declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct InitDecl {
    pub args: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A message-handler declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiverDecl {
    pub source: ReceiverSource,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Which channel a receiver listens on, and its argument shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ReceiverSource {
    /// `receive(...)` — ordinary internal messages.
    Internal(ReceiverBinding),
    /// `external(...)` — off-chain messages; gated by configuration.
    External(ReceiverBinding),
    /// `bounced(arg)` — truncated echoes of failed outbound messages.
    Bounce(Param),
}

/// Argument shape of an internal/external receiver.
#[derive(Clone, Debug, PartialEq)]
pub enum ReceiverBinding {
    /// A single typed argument.
    Simple(Param),
    /// A literal comment-text match.
    Comment(StringLit),
    /// No argument.
    Empty,
}

/// An identifier with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

/// A string literal with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct StringLit {
    pub value: String,
    pub span: Span,
}

impl StringLit {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        StringLit {
            value: value.into(),
            span,
        }
    }
}

/// A statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let {
        name: String,
        ty: Option<ParsedType>,
        value: Expr,
        span: Span,
    },
    Assign {
        target: Expr,
        value: Expr,
        span: Span,
    },
    Expression {
        expr: Expr,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Condition {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number {
        value: i128,
        span: Span,
    },
    Bool {
        value: bool,
        span: Span,
    },
    Str {
        value: String,
        span: Span,
    },
    Null {
        span: Span,
    },
    Id {
        name: String,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Field {
        base: Box<Expr>,
        name: String,
        span: Span,
    },
    StaticCall {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    MethodCall {
        base: Box<Expr>,
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    StructInit {
        name: String,
        fields: Vec<FieldInit>,
        span: Span,
    },
    /// `initOf Name(args)` — the state-init of a contract, the expression
    /// form that makes one contract deploy another.
    InitOf {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    /// Source location of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { span, .. }
            | Expr::Bool { span, .. }
            | Expr::Str { span, .. }
            | Expr::Null { span }
            | Expr::Id { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Field { span, .. }
            | Expr::StaticCall { span, .. }
            | Expr::MethodCall { span, .. }
            | Expr::StructInit { span, .. }
            | Expr::InitOf { span, .. } => *span,
        }
    }
}

/// A field initializer inside a struct-instance expression.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// Unary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}
