//! Receiver classification and duplicate-detection tests.

use super::*;
use pretty_assertions::assert_eq;
use crate::ReceiverSelector;
use pledge_ir::ast::ReceiverBinding;

fn internal(binding: ReceiverBinding) -> ReceiverSource {
    ReceiverSource::Internal(binding)
}

fn external(binding: ReceiverBinding) -> ReceiverSource {
    ReceiverSource::External(binding)
}

fn comment(text: &str) -> ReceiverBinding {
    ReceiverBinding::Comment(StringLit::new(text, Span::DUMMY))
}

fn wallet_with(receivers: Vec<Item>) -> Module {
    let mut items = receivers;
    items.push(empty_init());
    module(vec![
        message("Transfer", vec![field("amount", "Int")]),
        message("Burn", vec![field("amount", "Int")]),
        strukt("Plain", vec![field("x", "Int")]),
        contract("Wallet", &[], items),
    ])
}

fn wallet_selectors(ctx: &CompilerContext) -> Vec<ReceiverSelector> {
    ctx.get_type("Wallet")
        .unwrap()
        .receivers
        .iter()
        .map(|r| r.selector.clone())
        .collect()
}

#[test]
fn binary_receiver_is_classified_by_message_type() {
    let m = wallet_with(vec![receiver(internal(ReceiverBinding::Simple(param(
        "msg", "Transfer",
    ))))]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(
        wallet_selectors(&ctx),
        vec![ReceiverSelector::InternalBinary {
            binding: "msg".into(),
            ty: "Transfer".into()
        }]
    );
}

#[test]
fn optional_receiver_argument_is_rejected() {
    let m = wallet_with(vec![receiver(internal(ReceiverBinding::Simple(Param {
        name: "msg".into(),
        ty: ParsedType::optional("Transfer", Span::DUMMY),
        span: Span::DUMMY,
    })))]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2019);
}

#[test]
fn plain_struct_argument_is_rejected() {
    let m = wallet_with(vec![receiver(internal(ReceiverBinding::Simple(param(
        "msg", "Plain",
    ))))]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2019);
    assert_eq!(err.message, "Receive function can only accept a message");
}

#[test]
fn unknown_argument_type_is_rejected() {
    let m = wallet_with(vec![receiver(internal(ReceiverBinding::Simple(param(
        "msg", "Missing",
    ))))]);
    assert_eq!(resolve_err(&m).code, ErrorCode::E2002);
}

#[test]
fn raw_primitive_becomes_fallback() {
    let m = wallet_with(vec![receiver(internal(ReceiverBinding::Simple(param(
        "raw", "Slice",
    ))))]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(
        wallet_selectors(&ctx),
        vec![ReceiverSelector::InternalFallback {
            binding: "raw".into()
        }]
    );
}

#[test]
fn text_primitive_becomes_comment_fallback() {
    let m = wallet_with(vec![receiver(internal(ReceiverBinding::Simple(param(
        "text", "String",
    ))))]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(
        wallet_selectors(&ctx),
        vec![ReceiverSelector::InternalCommentFallback {
            binding: "text".into()
        }]
    );
}

#[test]
fn other_primitives_are_rejected() {
    let m = wallet_with(vec![receiver(internal(ReceiverBinding::Simple(param(
        "x", "Int",
    ))))]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2019);
    assert_eq!(
        err.message,
        "Receive function can only accept message, Slice or String"
    );
}

#[test]
fn duplicate_fallback_is_rejected() {
    let m = wallet_with(vec![
        receiver(internal(ReceiverBinding::Simple(param("a", "Slice")))),
        receiver(internal(ReceiverBinding::Simple(param("b", "Slice")))),
    ]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2020);
    assert_eq!(err.message, "Fallback receive function already exists");
}

#[test]
fn duplicate_binary_receiver_is_rejected() {
    let m = wallet_with(vec![
        receiver(internal(ReceiverBinding::Simple(param("a", "Transfer")))),
        receiver(internal(ReceiverBinding::Simple(param("b", "Transfer")))),
    ]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2020);
    assert_eq!(err.message, "Receive function for Transfer already exists");
}

#[test]
fn binary_receivers_for_different_messages_coexist() {
    let m = wallet_with(vec![
        receiver(internal(ReceiverBinding::Simple(param("a", "Transfer")))),
        receiver(internal(ReceiverBinding::Simple(param("b", "Burn")))),
    ]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(wallet_selectors(&ctx).len(), 2);
}

#[test]
fn comment_receivers_with_same_text_collide() {
    let m = wallet_with(vec![
        receiver(internal(comment("ping"))),
        receiver(internal(comment("ping"))),
    ]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2020);
    assert_eq!(err.message, "Receive function for \"ping\" already exists");
}

#[test]
fn comment_receivers_with_different_text_coexist() {
    let m = wallet_with(vec![
        receiver(internal(comment("ping"))),
        receiver(internal(comment("pong"))),
    ]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(wallet_selectors(&ctx).len(), 2);
}

#[test]
fn empty_comment_text_is_rejected() {
    let m = wallet_with(vec![receiver(internal(comment("")))]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2022);
}

#[test]
fn duplicate_empty_receiver_is_rejected() {
    let m = wallet_with(vec![
        receiver(internal(ReceiverBinding::Empty)),
        receiver(internal(ReceiverBinding::Empty)),
    ]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2020);
    assert_eq!(err.message, "Empty receive function already exists");
}

#[test]
fn external_receivers_require_the_feature() {
    let m = wallet_with(vec![receiver(external(ReceiverBinding::Empty))]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2021);

    let ctx = resolve_descriptors(
        &CompilerContext::new().with_feature(crate::FEATURE_EXTERNALS),
        &m,
    )
    .unwrap();
    assert_eq!(wallet_selectors(&ctx), vec![ReceiverSelector::ExternalEmpty]);
}

#[test]
fn internal_and_external_selectors_do_not_collide() {
    let m = wallet_with(vec![
        receiver(internal(ReceiverBinding::Empty)),
        receiver(external(ReceiverBinding::Empty)),
    ]);
    let ctx = resolve_descriptors(
        &CompilerContext::new().with_feature(crate::FEATURE_EXTERNALS),
        &m,
    )
    .unwrap();
    assert_eq!(wallet_selectors(&ctx).len(), 2);
}

#[test]
fn bounce_receiver_accepts_raw_slice() {
    let m = wallet_with(vec![receiver(ReceiverSource::Bounce(param("raw", "Slice")))]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(
        wallet_selectors(&ctx),
        vec![ReceiverSelector::InternalBounce {
            binding: "raw".into(),
            ty: TypeRef::ref_to("Slice"),
        }]
    );
}

#[test]
fn bounce_receiver_accepts_bounced_message() {
    let m = wallet_with(vec![receiver(ReceiverSource::Bounce(Param {
        name: "msg".into(),
        ty: ParsedType::Bounced {
            name: "Transfer".into(),
            span: Span::DUMMY,
        },
        span: Span::DUMMY,
    }))]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(
        wallet_selectors(&ctx),
        vec![ReceiverSelector::InternalBounce {
            binding: "msg".into(),
            ty: TypeRef::Bounced {
                name: "Transfer".into()
            },
        }]
    );
}

#[test]
fn bounce_receiver_accepts_plain_message_reference() {
    let m = wallet_with(vec![receiver(ReceiverSource::Bounce(param(
        "msg", "Transfer",
    )))]);
    let ctx = resolve(&m).unwrap();
    // A plain message reference resolves to its truncated view.
    assert_eq!(
        wallet_selectors(&ctx),
        vec![ReceiverSelector::InternalBounce {
            binding: "msg".into(),
            ty: TypeRef::Bounced {
                name: "Transfer".into()
            },
        }]
    );
}

#[test]
fn duplicate_bounce_receiver_is_rejected() {
    let m = wallet_with(vec![
        receiver(ReceiverSource::Bounce(param("a", "Transfer"))),
        receiver(ReceiverSource::Bounce(Param {
            name: "b".into(),
            ty: ParsedType::Bounced {
                name: "Transfer".into(),
                span: Span::DUMMY,
            },
            span: Span::DUMMY,
        })),
    ]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2020);
    assert_eq!(
        err.message,
        "Bounce receive function for bounced<Transfer> already exists"
    );
}

#[test]
fn raw_and_typed_bounce_receivers_coexist() {
    let m = wallet_with(vec![
        receiver(ReceiverSource::Bounce(param("raw", "Slice"))),
        receiver(ReceiverSource::Bounce(param("msg", "Transfer"))),
    ]);
    let ctx = resolve(&m).unwrap();
    assert_eq!(wallet_selectors(&ctx).len(), 2);
}

#[test]
fn optional_bounce_argument_is_rejected() {
    let m = wallet_with(vec![receiver(ReceiverSource::Bounce(Param {
        name: "msg".into(),
        ty: ParsedType::optional("Transfer", Span::DUMMY),
        span: Span::DUMMY,
    }))]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2019);
}

#[test]
fn bounce_of_plain_struct_is_rejected() {
    let m = wallet_with(vec![receiver(ReceiverSource::Bounce(param("x", "Plain")))]);
    let err = resolve_err(&m);
    assert_eq!(err.code, ErrorCode::E2019);
    assert_eq!(
        err.message,
        "Bounce receive function can only accept a message struct"
    );
}
