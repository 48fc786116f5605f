//! Constant expression evaluation.
//!
//! Field defaults and constant declarations must reduce to a literal at
//! compile time. The evaluator checks the expression against the
//! expected resolved type and produces a [`Value`]; anything that is
//! not a literal of the expected type is a hard error at the
//! expression's location.

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::ast::{Expr, UnaryOp};

use crate::{CompilerContext, TypeRef, Value};

/// Evaluate a constant expression against its expected type.
pub fn resolve_constant_value(
    expected: &TypeRef,
    expr: &Expr,
    _ctx: &CompilerContext,
) -> Result<Value, Diagnostic> {
    let TypeRef::Ref { name, optional } = expected else {
        return Err(Diagnostic::error(
            ErrorCode::E2029,
            format!("Constant of type {expected} is not supported"),
            expr.span(),
        ));
    };

    if let Expr::Null { span } = expr {
        if *optional {
            return Ok(Value::Null);
        }
        return Err(Diagnostic::error(
            ErrorCode::E2029,
            format!("null is not assignable to non-optional type {name}"),
            *span,
        ));
    }

    match name.as_str() {
        "Int" => match expr {
            Expr::Number { value, .. } => Ok(Value::Int(*value)),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand,
                ..
            } => match operand.as_ref() {
                Expr::Number { value, .. } => Ok(Value::Int(-value)),
                _ => Err(mismatch(name, expr)),
            },
            _ => Err(mismatch(name, expr)),
        },
        "Bool" => match expr {
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            _ => Err(mismatch(name, expr)),
        },
        "String" => match expr {
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            _ => Err(mismatch(name, expr)),
        },
        "Address" => match builtin_call(expr, "address") {
            Some(raw) => Ok(Value::Address(raw.to_string())),
            None => Err(mismatch(name, expr)),
        },
        "Cell" => match builtin_call(expr, "cell") {
            Some(raw) => Ok(Value::Cell(raw.to_string())),
            None => Err(mismatch(name, expr)),
        },
        _ => Err(Diagnostic::error(
            ErrorCode::E2029,
            format!("Constant of type {name} is not supported"),
            expr.span(),
        )),
    }
}

/// Match `name("literal")` builtin constructor calls.
fn builtin_call<'a>(expr: &'a Expr, name: &str) -> Option<&'a str> {
    if let Expr::StaticCall {
        name: callee, args, ..
    } = expr
    {
        if callee == name {
            if let [Expr::Str { value, .. }] = args.as_slice() {
                return Some(value);
            }
        }
    }
    None
}

fn mismatch(expected: &str, expr: &Expr) -> Diagnostic {
    Diagnostic::error(
        ErrorCode::E2029,
        format!("Expected a constant {expected} value"),
        expr.span(),
    )
}
