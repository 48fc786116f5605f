#![expect(clippy::unwrap_used, reason = "test code unwraps for clarity")]

//! Pipeline tests.
//!
//! Fixtures build AST values directly; the parser is a separate crate.
//! Every module is resolved on top of the builtin prelude the driver
//! would normally feed in first.

mod receiver_tests;

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::ast::{
    ConstDecl, ContractDecl, Expr, FieldDecl, FunctionAttribute, FunctionAttributeKind,
    FunctionBody, FunctionDecl, Ident, InitDecl, Item, Module, Param, PrimitiveDecl, ReceiverDecl,
    ReceiverSource, StringLit, Stmt, StructDecl, TraitDecl, TypeAttribute, TypeDecl, TypeOrigin,
};
use pledge_ir::{ParsedType, Span};
use pretty_assertions::assert_eq;

use crate::{
    resolve_descriptors, resolve_type_ref, to_bounced, CompilerContext, TypeKind, TypeRef, Value,
};

// === Fixture builders ===

fn prim(name: &str) -> TypeDecl {
    TypeDecl::Primitive(PrimitiveDecl {
        name: name.into(),
        origin: TypeOrigin::Stdlib,
        span: Span::DUMMY,
    })
}

/// The builtin primitives the driver registers before user code.
fn prelude() -> Vec<TypeDecl> {
    ["Int", "Bool", "String", "Slice", "Cell", "Builder", "Address"]
        .into_iter()
        .map(prim)
        .collect()
}

fn simple(name: &str) -> ParsedType {
    ParsedType::simple(name, Span::DUMMY)
}

fn field(name: &str, ty: &str) -> FieldDecl {
    FieldDecl {
        name: name.into(),
        ty: simple(ty),
        init: None,
        serialization: None,
        span: Span::DUMMY,
    }
}

fn field_as(name: &str, ty: &str, hint: &str) -> FieldDecl {
    FieldDecl {
        serialization: Some(hint.into()),
        ..field(name, ty)
    }
}

fn strukt(name: &str, fields: Vec<FieldDecl>) -> TypeDecl {
    TypeDecl::Struct(StructDecl {
        name: name.into(),
        message: false,
        fields,
        origin: TypeOrigin::User,
        span: Span::DUMMY,
    })
}

fn message(name: &str, fields: Vec<FieldDecl>) -> TypeDecl {
    TypeDecl::Struct(StructDecl {
        name: name.into(),
        message: true,
        fields,
        origin: TypeOrigin::User,
        span: Span::DUMMY,
    })
}

fn empty_init() -> Item {
    Item::Init(InitDecl {
        args: vec![],
        body: vec![],
        span: Span::DUMMY,
    })
}

fn contract(name: &str, traits: &[&str], declarations: Vec<Item>) -> TypeDecl {
    TypeDecl::Contract(ContractDecl {
        name: name.into(),
        traits: traits.iter().map(|t| Ident::new(*t, Span::DUMMY)).collect(),
        attributes: vec![],
        declarations,
        origin: TypeOrigin::User,
        span: Span::DUMMY,
    })
}

fn trait_decl(name: &str, traits: &[&str], declarations: Vec<Item>) -> TypeDecl {
    TypeDecl::Trait(TraitDecl {
        name: name.into(),
        traits: traits.iter().map(|t| Ident::new(*t, Span::DUMMY)).collect(),
        attributes: vec![],
        declarations,
        origin: TypeOrigin::User,
        span: Span::DUMMY,
    })
}

fn interface(tag: &str) -> TypeAttribute {
    TypeAttribute::Interface {
        name: StringLit::new(tag, Span::DUMMY),
        span: Span::DUMMY,
    }
}

fn param(name: &str, ty: &str) -> Param {
    Param {
        name: name.into(),
        ty: simple(ty),
        span: Span::DUMMY,
    }
}

fn func(name: &str, attrs: &[FunctionAttributeKind], args: Vec<Param>) -> FunctionDecl {
    FunctionDecl {
        name: name.into(),
        attributes: attrs
            .iter()
            .map(|kind| FunctionAttribute {
                kind: *kind,
                span: Span::DUMMY,
            })
            .collect(),
        args,
        returns: None,
        body: FunctionBody::Block(vec![]),
        origin: TypeOrigin::User,
        span: Span::DUMMY,
    }
}

fn func_returning(
    name: &str,
    attrs: &[FunctionAttributeKind],
    args: Vec<Param>,
    returns: &str,
) -> FunctionDecl {
    FunctionDecl {
        returns: Some(simple(returns)),
        ..func(name, attrs, args)
    }
}

fn func_with_body(name: &str, body: Vec<Stmt>) -> FunctionDecl {
    FunctionDecl {
        body: FunctionBody::Block(body),
        ..func(name, &[], vec![])
    }
}

fn native(name: &str, attrs: &[FunctionAttributeKind], args: Vec<Param>) -> FunctionDecl {
    FunctionDecl {
        body: FunctionBody::Native {
            builtin: name.into(),
        },
        ..func(name, attrs, args)
    }
}

fn receiver(source: ReceiverSource) -> Item {
    Item::Receiver(ReceiverDecl {
        source,
        body: vec![],
        span: Span::DUMMY,
    })
}

fn receiver_with_body(source: ReceiverSource, body: Vec<Stmt>) -> Item {
    Item::Receiver(ReceiverDecl {
        source,
        body,
        span: Span::DUMMY,
    })
}

fn number(value: i128) -> Expr {
    Expr::Number {
        value,
        span: Span::DUMMY,
    }
}

fn init_of(name: &str) -> Stmt {
    Stmt::Expression {
        expr: Expr::InitOf {
            name: name.into(),
            args: vec![],
            span: Span::DUMMY,
        },
        span: Span::DUMMY,
    }
}

fn module(types: Vec<TypeDecl>) -> Module {
    let mut all = prelude();
    all.extend(types);
    Module {
        types: all,
        functions: vec![],
        constants: vec![],
    }
}

fn resolve(module: &Module) -> Result<CompilerContext, Diagnostic> {
    resolve_descriptors(&CompilerContext::new(), module)
}

fn resolve_err(module: &Module) -> Diagnostic {
    resolve(module).unwrap_err()
}

// === Registry and structural checks ===

#[test]
fn duplicate_type_is_rejected() {
    let m = module(vec![
        strukt("Point", vec![field("x", "Int")]),
        strukt("Point", vec![field("y", "Int")]),
    ]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2001);
    assert_eq!(err.message, "Type Point already exists");
}

#[test]
fn uids_are_unique_across_types() {
    let m = module(vec![
        strukt("A", vec![field("x", "Int")]),
        strukt("B", vec![field("x", "Int")]),
        strukt("C", vec![field("x", "Int")]),
        contract("D", &[], vec![empty_init()]),
    ]);
    let ctx = resolve(&m).unwrap();
    let mut uids: Vec<u16> = ctx.all_types().map(|t| t.uid).collect();
    let count = uids.len();
    uids.sort_unstable();
    uids.dedup();
    assert_eq!(uids.len(), count);
}

#[test]
fn contract_without_init_is_rejected() {
    let m = module(vec![contract("Wallet", &[], vec![])]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2017);
    assert_eq!(err.message, "Contract Wallet does not have an init function");
}

#[test]
fn second_init_is_rejected() {
    let m = module(vec![contract("Wallet", &[], vec![empty_init(), empty_init()])]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2016);
}

#[test]
fn struct_without_fields_is_rejected() {
    let m = module(vec![strukt("Empty", vec![])]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2018);
    assert_eq!(err.message, "Struct Empty does not have any fields");
}

#[test]
fn field_name_collision_is_rejected() {
    let m = module(vec![strukt(
        "Point",
        vec![field("x", "Int"), field("x", "Int")],
    )]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2003);
}

#[test]
fn field_and_constant_collision_is_rejected() {
    let m = module(vec![contract(
        "Wallet",
        &[],
        vec![
            Item::Field(field("limit", "Int")),
            Item::Constant(ConstDecl {
                name: "limit".into(),
                ty: simple("Int"),
                value: number(10),
                span: Span::DUMMY,
            }),
            empty_init(),
        ],
    )]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2003);
    assert_eq!(err.message, "Field limit already exists");
}

#[test]
fn unknown_field_type_is_rejected() {
    let m = module(vec![strukt("Point", vec![field("x", "Coordinate")])]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2002);
    assert_eq!(err.message, "Type Coordinate not found");
}

#[test]
fn trait_field_serialization_hint_is_rejected() {
    let m = module(vec![trait_decl(
        "Funded",
        &[],
        vec![Item::Field(field_as("balance", "Int", "coins"))],
    )]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2005);
}

#[test]
fn field_default_value_is_resolved() {
    let m = module(vec![strukt(
        "Counter",
        vec![FieldDecl {
            init: Some(number(7)),
            ..field("value", "Int")
        }],
    )]);
    let ctx = resolve(&m).unwrap();
    let t = ctx.get_type("Counter").unwrap();
    assert_eq!(t.fields[0].default, Some(Value::Int(7)));
    assert_eq!(t.fields[0].index, 0);
}

#[test]
fn contract_constant_is_resolved() {
    let m = module(vec![contract(
        "Wallet",
        &[],
        vec![
            Item::Constant(ConstDecl {
                name: "LIMIT".into(),
                ty: simple("Int"),
                value: number(100),
                span: Span::DUMMY,
            }),
            empty_init(),
        ],
    )]);
    let ctx = resolve(&m).unwrap();
    let t = ctx.get_type("Wallet").unwrap();
    assert_eq!(t.constant("LIMIT").unwrap().value, Value::Int(100));
}

#[test]
fn interface_tags_are_collected() {
    let decl = TypeDecl::Contract(ContractDecl {
        name: "Wallet".into(),
        traits: vec![],
        attributes: vec![interface("org.example.wallet")],
        declarations: vec![empty_init()],
        origin: TypeOrigin::User,
        span: Span::DUMMY,
    });
    let ctx = resolve(&module(vec![decl])).unwrap();
    let t = ctx.get_type("Wallet").unwrap();
    assert_eq!(t.interfaces, vec!["org.example.wallet".to_string()]);
}

// === Published context ===

#[test]
fn published_kinds_and_contract_listing() {
    let m = module(vec![
        strukt("Point", vec![field("x", "Int")]),
        contract("Wallet", &[], vec![empty_init()]),
        trait_decl("Ownable", &[], vec![]),
    ]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(ctx.get_type("Int").unwrap().kind, TypeKind::Primitive);
    assert_eq!(ctx.get_type("Point").unwrap().kind, TypeKind::Struct);
    assert_eq!(ctx.get_type("Wallet").unwrap().kind, TypeKind::Contract);
    assert_eq!(ctx.get_type("Ownable").unwrap().kind, TypeKind::Trait);
    assert_eq!(ctx.contracts(), vec!["Wallet"]);
}

#[test]
fn resolve_type_ref_round_trips() {
    let m = module(vec![strukt("Point", vec![field("x", "Int")])]);
    let ctx = resolve(&m).unwrap();

    let r = resolve_type_ref(&ctx, &ParsedType::optional("Point", Span::DUMMY)).unwrap();
    assert_eq!(
        r,
        TypeRef::Ref {
            name: "Point".into(),
            optional: true
        }
    );

    let r = resolve_type_ref(
        &ctx,
        &ParsedType::Map {
            key: "Int".into(),
            value: "Point".into(),
            span: Span::DUMMY,
        },
    )
    .unwrap();
    assert_eq!(
        r,
        TypeRef::Map {
            key: "Int".into(),
            value: "Point".into()
        }
    );

    let err = resolve_type_ref(&ctx, &simple("Missing")).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2002);

    let err = resolve_type_ref(
        &ctx,
        &ParsedType::Bounced {
            name: "Point".into(),
            span: Span::DUMMY,
        },
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::E2014);
}

#[test]
fn bounced_name_mangling() {
    assert_eq!(to_bounced("Transfer"), "Transfer%%BOUNCED%%");
}
